//! Navigation state and load error classification
//!
//! Errors are set by the content engine and only mapped to UI here:
//! ```text
//! None               → page shown
//! PAGE_UNRESPONSIVE  → Wait / Stop dialog
//! RENDERER_CRASHED   → engine's own error UI
//! anything else      → custom error page
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub is_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TabErrorKind {
    /// Page stopped responding; recoverable
    PageUnresponsive,
    /// Content process died for this load
    RendererCrashed,
    /// Any other navigation error code
    Other(String),
}

impl TabErrorKind {
    pub const PAGE_UNRESPONSIVE: &'static str = "PAGE_UNRESPONSIVE";
    pub const RENDERER_CRASHED: &'static str = "RENDERER_CRASHED";

    pub fn as_str(&self) -> &str {
        match self {
            TabErrorKind::PageUnresponsive => Self::PAGE_UNRESPONSIVE,
            TabErrorKind::RendererCrashed => Self::RENDERER_CRASHED,
            TabErrorKind::Other(code) => code,
        }
    }
}

impl From<String> for TabErrorKind {
    fn from(code: String) -> Self {
        match code.as_str() {
            Self::PAGE_UNRESPONSIVE => TabErrorKind::PageUnresponsive,
            Self::RENDERER_CRASHED => TabErrorKind::RendererCrashed,
            _ => TabErrorKind::Other(code),
        }
    }
}

impl From<&str> for TabErrorKind {
    fn from(code: &str) -> Self {
        TabErrorKind::from(code.to_string())
    }
}

impl From<TabErrorKind> for String {
    fn from(kind: TabErrorKind) -> Self {
        match kind {
            TabErrorKind::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TabErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabErrorKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TabErrorKind::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            TabErrorKind::from("PAGE_UNRESPONSIVE"),
            TabErrorKind::PageUnresponsive
        );
        assert_eq!(
            TabErrorKind::from("RENDERER_CRASHED"),
            TabErrorKind::RendererCrashed
        );
        assert_eq!(
            TabErrorKind::from("ERR_NAME_NOT_RESOLVED"),
            TabErrorKind::Other("ERR_NAME_NOT_RESOLVED".to_string())
        );
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Some(TabErrorKind::PageUnresponsive)).unwrap();
        assert_eq!(json, "\"PAGE_UNRESPONSIVE\"");

        let parsed: Option<TabErrorKind> = serde_json::from_str("\"ERR_FAILED\"").unwrap();
        assert_eq!(parsed, Some(TabErrorKind::Other("ERR_FAILED".to_string())));
    }
}
