//! Logging seam for cache repair.
//!
//! Repair messages go to an injected [`CacheLog`] collaborator rather than
//! a process-wide logger, so embedders route them into their own reporting
//! and tests observe them directly.

use std::error::Error;
use std::sync::Mutex;

/// Sink for repair log messages.
///
/// Fire-and-forget: implementations must never fail the caller.
pub trait CacheLog {
    /// Records a message, with the error that prompted it when there is one.
    fn log(&self, message: &str, error: Option<&dyn Error>);
}

/// Logs every message to standard error.
pub struct StderrLog;

impl CacheLog for StderrLog {
    fn log(&self, message: &str, error: Option<&dyn Error>) {
        match error {
            Some(e) => eprintln!("dexmend: {message}: {e}"),
            None => eprintln!("dexmend: {message}"),
        }
    }
}

/// Discards every message.
pub struct NullLog;

impl CacheLog for NullLog {
    fn log(&self, _message: &str, _error: Option<&dyn Error>) {}
}

/// Accumulates rendered messages in memory.
///
/// Used by tests to assert on repair output, and by embedders that forward
/// repair logs into their own channels after the fact.
#[derive(Default)]
pub struct MemoryLog {
    messages: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded messages.
    pub fn messages(&self) -> Vec<String> {
        let messages = self.messages.lock().unwrap();
        messages.clone()
    }
}

impl CacheLog for MemoryLog {
    fn log(&self, message: &str, error: Option<&dyn Error>) {
        let rendered = match error {
            Some(e) => format!("{message}: {e}"),
            None => message.to_string(),
        };
        let mut messages = self.messages.lock().unwrap();
        messages.push(rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_records_in_order() {
        let log = MemoryLog::new();
        log.log("first", None);
        log.log("second", None);
        assert_eq!(log.messages(), vec!["first", "second"]);
    }

    #[test]
    fn memory_log_appends_error() {
        let log = MemoryLog::new();
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        log.log("delete failed", Some(&err));
        assert_eq!(log.messages(), vec!["delete failed: denied"]);
    }

    #[test]
    fn null_log_discards() {
        // Only checks that the calls are accepted.
        NullLog.log("anything", None);
        let err = std::io::Error::new(std::io::ErrorKind::Interrupted, "ignored");
        NullLog.log("anything", Some(&err));
    }
}
