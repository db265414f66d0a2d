//! Logger trait definition

use std::sync::Arc;

/// Logger abstraction shared by every component of the relay
///
/// Components log through `Arc<dyn Logger>` and prefix messages with their
/// own name in brackets, e.g. `[ConnectionRegistry] connected: fs (3 tools)`.
///
/// Implementations:
/// - `NoOpLogger`: Silent logger
/// - `TracingLogger`: Forwards to the `tracing` ecosystem
/// - `MemoryLogger`: Keeps records in memory (tests, diagnostics panels)
pub trait Logger: Send + Sync {
    /// Log a debug message
    fn debug(&self, message: &str);

    /// Log an info message
    fn info(&self, message: &str);

    /// Log a warning message
    fn warn(&self, message: &str);

    /// Log an error message
    fn error(&self, message: &str);
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Convenience macros for logging with format arguments
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
    };
}
