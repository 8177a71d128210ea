use std::path::PathBuf;
use thiserror::Error;

/// Core error types for nftsync
///
/// Every variant is raised while loading inputs or rendering output. The
/// reconciliation itself is total over well-formed documents and never fails.
#[derive(Debug, Error)]
pub enum Error {
    /// An input document could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input document is not the expected JSON structure
    #[error("Malformed input in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot document has the wrong shape
    #[error("Invalid snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },

    /// Verb and supplied inputs do not fit together
    #[error("Usage error: {0}")]
    Usage(String),

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Snapshot-specific errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("missing top-level \"nftables\" array")]
    MissingNftables,

    #[error("entry {index}: invalid {kind}: {source}")]
    InvalidEntry {
        index: usize,
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns true for errors caused by how the tool was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Malformed {
            path: PathBuf::from("/tmp/hooks.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/hooks.json"));
        assert!(msg.starts_with("Malformed input"));
        assert!(!err.is_usage());
    }

    #[test]
    fn test_usage_error() {
        let err = Error::Usage("remove-chains requires --chains".to_string());
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            "Usage error: remove-chains requires --chains"
        );
    }

    #[test]
    fn test_snapshot_entry_error() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = Error::Snapshot {
            path: PathBuf::from("/tmp/state.json"),
            source: SnapshotError::InvalidEntry {
                index: 3,
                kind: "rule",
                source,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/state.json"));
        assert!(msg.contains("entry 3"));
        assert!(msg.contains("invalid rule"));
    }

    #[test]
    fn test_missing_nftables_message() {
        let err = SnapshotError::MissingNftables;
        assert!(err.to_string().contains("nftables"));
    }
}
