//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use kestrel_utils::{UrlPrefixResolver, BLANK_PAGE, DEFAULT_SCHEME, DEFAULT_SEARCH_TEMPLATE};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of open tabs; creation beyond this is refused
    pub max_tabs: usize,
    /// Let the engine render load errors instead of the custom error page
    pub use_built_in_error_pages: bool,
    /// Search engine URL template
    pub search_engine: String,
    /// Scheme prepended to bare host names
    pub default_scheme: String,
    /// Homepage URL
    pub homepage: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tabs: 12,
            use_built_in_error_pages: false,
            search_engine: DEFAULT_SEARCH_TEMPLATE.to_string(),
            default_scheme: DEFAULT_SCHEME.to_string(),
            homepage: BLANK_PAGE.to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;

        tracing::info!(path = %path.as_ref().display(), "Loaded configuration");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tabs == 0 {
            return Err(CoreError::Config("max_tabs must be at least 1".to_string()));
        }
        if !self.search_engine.contains("%s") {
            return Err(CoreError::Config(format!(
                "search_engine template has no %s placeholder: {}",
                self.search_engine
            )));
        }
        if !self.default_scheme.ends_with("://") {
            return Err(CoreError::Config(format!(
                "default_scheme must end with ://: {}",
                self.default_scheme
            )));
        }
        Ok(())
    }

    /// Address bar resolver for this configuration
    pub fn url_resolver(&self) -> UrlPrefixResolver {
        UrlPrefixResolver::with_search_engine(self.search_engine.clone())
            .with_default_scheme(self.default_scheme.clone())
    }
}
