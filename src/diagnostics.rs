//! Injected diagnostic sink.
//!
//! Replaces a process-wide logger singleton with a sink passed in at
//! construction, so the core has no global state and tests can use a
//! `NullSink` instead of initializing a real logger.

/// Severity of a diagnostic message, mirroring `log::Level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// A process-wide collaborator that accepts level-tagged diagnostic text.
/// Must be safe to call from the single driver thread described in spec.md
/// §5; no locking is required by implementors used only from that thread.
pub trait DiagnosticSink {
    fn log(&self, level: Level, message: &str);
}

/// Forwards diagnostics to the `log` crate's global facade.
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn log(&self, level: Level, message: &str) {
        let level = match level {
            Level::Error => log::Level::Error,
            Level::Warn => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
            Level::Trace => log::Level::Trace,
        };
        log::log!(level, "{}", message);
    }
}

/// Discards every diagnostic. Default sink for tests and for
/// `FilterState::new()` when no sink is supplied.
#[derive(Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _level: Level, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_every_level() {
        let sink = NullSink;
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
            sink.log(level, "ignored");
        }
    }
}
