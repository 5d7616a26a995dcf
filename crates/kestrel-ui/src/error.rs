//! UI error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Tab error: {0}")]
    Tab(#[from] kestrel_tabs::TabError),

    #[error("Invalid string catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
