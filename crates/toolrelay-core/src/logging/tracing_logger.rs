//! Logger that forwards to the `tracing` ecosystem
//!
//! Hosts install whatever subscriber they like (fmt, JSON, OpenTelemetry);
//! every record is emitted under the `toolrelay` target so it can be filtered
//! with `RUST_LOG=toolrelay=debug`.

use super::traits::Logger;

/// Logger backed by `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "toolrelay", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "toolrelay", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "toolrelay", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "toolrelay", "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // No subscriber installed: records are dropped, nothing panics
        let logger = TracingLogger::new();
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
