//! Streaming UI component for real-time model output
//!
//! Model output goes to stderr while it arrives, so stdout only carries the
//! final result.

use std::io::{stderr, Write};

use mailmind_ollama::{StreamCallback, StreamEvent};

use crate::cli::ui::StatusPrinter;

pub struct StreamingDisplay {
    printer: StatusPrinter,
}

impl StreamingDisplay {
    pub fn new() -> Self {
        Self {
            printer: StatusPrinter::new(),
        }
    }

    /// Text written to stderr for an output event, if any
    fn render(event: &StreamEvent) -> Option<String> {
        match event {
            StreamEvent::Started { model } => Some(format!("🤖 [Streaming response from {}]:\n", model)),
            StreamEvent::Text(line) => Some(format!("{}\n", line)),
            StreamEvent::Complete { .. } | StreamEvent::Error(_) => None,
        }
    }
}

impl Default for StreamingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamCallback for StreamingDisplay {
    fn on_event(&self, event: StreamEvent) {
        if let Some(text) = Self::render(&event) {
            let mut err = stderr().lock();
            let _ = err.write_all(text.as_bytes());
            let _ = err.flush();
            return;
        }

        match event {
            StreamEvent::Complete { duration_ms } => {
                self.printer.dim(&format!("completed in {}ms", duration_ms));
            }
            StreamEvent::Error(err) => {
                self.printer.error("Error", &err);
            }
            _ => {}
        }
    }
}
