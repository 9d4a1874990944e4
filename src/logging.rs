//! Injected logging interface
//!
//! The core never formats or routes logs itself; it calls a [`Logger`]
//! handed in by the caller. The binary uses [`TracingLogger`], which
//! forwards to `tracing` so the subscriber decides filtering and output.

use std::sync::Mutex;

/// Severity-tagged progress and failure reporting
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Forwards to `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn debug(&self, _: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Keeps messages in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }

    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }
}
