//! String lookup for user-visible text

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Result;

pub trait Localizer: Send + Sync {
    /// Translate `key`, falling back to the key itself
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityLocalizer;

impl Localizer for IdentityLocalizer {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// In-memory string table for one locale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    locale: String,
    strings: HashMap<String, String>,
}

impl Catalog {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            strings: HashMap::new(),
        }
    }

    /// Load a flat `{ "key": "translation" }` JSON object
    pub fn from_json_str(locale: impl Into<String>, json: &str) -> Result<Self> {
        let strings: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self {
            locale: locale.into(),
            strings,
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Localizer for Catalog {
    fn translate(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.clone(),
            None => {
                tracing::trace!(locale = %self.locale, key = %key, "Missing translation");
                key.to_string()
            }
        }
    }
}
