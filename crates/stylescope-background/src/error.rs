//! Host errors.

use stylescope_protocols::TabId;
use thiserror::Error;

/// Failure reported by the browser host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("No tab with id: {0}")]
    TabNotFound(TabId),

    #[error("Tab query failed: {0}")]
    Query(String),

    /// The host refused to run the agent script in the tab.
    #[error("{0}")]
    Injection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(HostError::TabNotFound(7).to_string(), "No tab with id: 7");
        assert_eq!(
            HostError::Injection("Cannot access contents of the page".to_string()).to_string(),
            "Cannot access contents of the page"
        );
        assert!(HostError::Query("window closed".to_string())
            .to_string()
            .contains("window closed"));
    }
}
