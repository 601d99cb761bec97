// trigl
// copyright zipxing@hotmail.com 2022~2024

//! Leveled diagnostics for the render pipeline.
//!
//! The renderer never reaches for an ambient global logger; it is handed a
//! [`DiagnosticsSink`] at init time so hosts and tests decide where pipeline
//! messages go. Sinks flush per call and keep no queue across frames.

use log::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    Warning,
    Info,
    Debug,
}

pub trait DiagnosticsSink {
    /// Emit one message. Must not panic; may be called many times per frame.
    fn log_out(&self, level: DiagLevel, message: &str);
}

/// Forwards every message to the matching `log` crate macro, so whatever
/// config `init_log` installed governs the output.
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn log_out(&self, level: DiagLevel, message: &str) {
        match level {
            DiagLevel::Error => error!("{}", message),
            DiagLevel::Warning => warn!("{}", message),
            DiagLevel::Info => info!("{}", message),
            DiagLevel::Debug => debug!("{}", message),
        }
    }
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for std::rc::Rc<T> {
    fn log_out(&self, level: DiagLevel, message: &str) {
        (**self).log_out(level, message);
    }
}

/// Test sink recording every message it receives, in order.
#[cfg(test)]
pub struct CaptureSink {
    pub lines: std::cell::RefCell<Vec<(DiagLevel, String)>>,
}

#[cfg(test)]
impl CaptureSink {
    pub fn new() -> Self {
        Self {
            lines: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(lvl, _)| *lvl == DiagLevel::Error)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

#[cfg(test)]
impl DiagnosticsSink for CaptureSink {
    fn log_out(&self, level: DiagLevel, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn capture_sink_records_in_order() {
        let sink = CaptureSink::new();
        sink.log_out(DiagLevel::Info, "first");
        sink.log_out(DiagLevel::Error, "second");
        sink.log_out(DiagLevel::Debug, "third");

        let lines = sink.lines.borrow();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], (DiagLevel::Info, "first".to_string()));
        assert_eq!(lines[1], (DiagLevel::Error, "second".to_string()));
        assert_eq!(lines[2], (DiagLevel::Debug, "third".to_string()));
    }

    #[test]
    fn rc_sink_forwards_to_inner() {
        let sink = Rc::new(CaptureSink::new());
        let shared = sink.clone();
        shared.log_out(DiagLevel::Warning, "via rc");

        assert_eq!(sink.lines.borrow().len(), 1);
        assert_eq!(sink.errors().len(), 0);
    }
}
