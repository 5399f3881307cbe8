//! Invocation audit log.
//!
//! Every public operation records one line (operation name and, for query,
//! the literal SQL) to an append-only collaborator. The collaborator is an
//! injected trait rather than a process-wide singleton so tests can
//! substitute an in-memory recorder. Write failures must never affect the
//! operation's own result; they are swallowed and reported via tracing.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only recorder for operation invocations.
pub trait AuditLog: Send + Sync {
    /// Record a single invocation event.
    fn record(&self, event: &str);
}

/// File-backed audit log. One timestamped line per event.
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    /// Create a file audit log. The file is created on first write;
    /// parent directories are created eagerly so a bad path surfaces
    /// at startup rather than silently on every call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), error = %e, "Failed to create audit log directory");
                }
            }
        }
        Self { path }
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{timestamp}] {event}")
    }
}

impl AuditLog for FileAuditLog {
    fn record(&self, event: &str) {
        if let Err(e) = self.append(event) {
            warn!(path = %self.path.display(), error = %e, "Failed to write audit log");
        }
    }
}

/// Audit log that discards every event.
pub struct NoopAuditLog;

impl AuditLog for NoopAuditLog {
    fn record(&self, _event: &str) {}
}

/// In-memory audit log for tests.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<String>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, event: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.to_string());
        }
    }
}
