//! What happens after a fatal or panic record has been written

use super::log_level::LogLevel;

/// Policy invoked once a `Fatal` or `Panic` record is written and flushed
///
/// The default [`ProcessTerminator`] exits or panics. Tests and embedders can
/// install their own to observe the event instead.
pub trait Terminator: Send + Sync {
    /// Called after a `Fatal` record; the default exits the process
    fn fatal(&self, message: &str);

    /// Called after a `Panic` record; the default unwinds
    fn panic(&self, message: &str);

    fn terminate(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Fatal => self.fatal(message),
            LogLevel::Panic => self.panic(message),
            _ => {}
        }
    }
}

/// Exit status used by [`ProcessTerminator::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn fatal(&self, _message: &str) {
        std::process::exit(FATAL_EXIT_CODE);
    }

    fn panic(&self, message: &str) {
        panic!("{}", message);
    }
}
