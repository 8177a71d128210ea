/// Audit logging of reconciliation runs
///
/// When enabled in the config, every invocation appends one JSON-lines
/// record describing what was planned against which snapshot.
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Verb that was run
    pub verb: String,

    /// Whether the run produced a plan
    pub success: bool,

    /// Number of commands emitted
    pub command_count: usize,

    /// SHA-256 of the snapshot the plan was computed from, if it was loaded
    pub snapshot_sha256: Option<String>,

    /// Error message if the run failed
    pub error: Option<String>,
}

impl AuditEvent {
    pub fn success(verb: impl Into<String>, command_count: usize, snapshot_sha256: String) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            verb: verb.into(),
            success: true,
            command_count,
            snapshot_sha256: Some(snapshot_sha256),
            error: None,
        }
    }

    pub fn failure(verb: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            verb: verb.into(),
            success: false,
            command_count: 0,
            snapshot_sha256: None,
            error: Some(error.into()),
        }
    }
}

/// Audit log writer
pub struct AuditLog {
    log_path: PathBuf,
}

impl AuditLog {
    /// Creates an audit log in the state directory
    ///
    /// # Errors
    ///
    /// Returns `Err` if the state directory cannot be determined or created
    pub fn new() -> std::io::Result<Self> {
        let mut log_path = crate::utils::ensure_state_dir()?.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "State directory not found")
        })?;
        log_path.push("audit.log");

        Ok(Self { log_path })
    }

    pub fn with_path(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Appends an event to the audit log
    ///
    /// Events are written as JSON-lines format (one JSON object per line)
    ///
    /// # Errors
    ///
    /// Returns `Err` if file cannot be opened or written
    pub fn log(&self, event: &AuditEvent) -> std::io::Result<()> {
        let json = serde_json::to_string(event)?;

        let mut options = std::fs::OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.log_path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        Ok(())
    }

    /// Reads the most recent events from the log, newest first
    ///
    /// Lines that fail to parse are skipped.
    ///
    /// ```
    /// use nftsync::audit::{AuditEvent, AuditLog};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let log = AuditLog::with_path(dir.path().join("audit.log"));
    /// log.log(&AuditEvent::success("remove-chains", 3, String::new())).unwrap();
    /// log.log(&AuditEvent::failure("ensure-hooks", "missing --hooks")).unwrap();
    ///
    /// let recent = log.read_recent(1).unwrap();
    /// assert_eq!(recent.len(), 1);
    /// assert_eq!(recent[0].verb, "ensure-hooks");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` if file cannot be read
    pub fn read_recent(&self, count: usize) -> std::io::Result<Vec<AuditEvent>> {
        let content = std::fs::read_to_string(&self.log_path)?;

        Ok(content
            .lines()
            .rev()
            .take(count)
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}
