//! Mock UI implementation for testing.
//!
//! # Example
//!
//! ```
//! use eltflow::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Starting workflow");
//! ui.success("Done!");
//!
//! assert!(ui.messages().contains(&"Starting workflow".to_string()));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use std::sync::{Arc, Mutex};

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Captures all UI interactions for later assertion.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    outputs: Vec<(String, String)>,
    spinners: Arc<Mutex<Vec<String>>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Captured `(label, output)` pairs.
    pub fn outputs(&self) -> &[(String, String)] {
        &self.outputs
    }

    /// Spinner events, e.g. `start:dbt_run`, `ok:dbt_run`, `err:dbt_run`.
    pub fn spinner_events(&self) -> Vec<String> {
        self.spinners.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Check if any captured text contains `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .chain(&self.headers)
            .any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if let Ok(mut events) = self.spinners.lock() {
            events.push(format!("start:{}", message));
        }
        Box::new(MockSpinner {
            events: Arc::clone(&self.spinners),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_output(&mut self, label: &str, output: &str) {
        self.outputs.push((label.to_string(), output.to_string()));
    }
}

/// Spinner that records its lifecycle into the owning [`MockUI`].
pub struct MockSpinner {
    events: Arc<Mutex<Vec<String>>>,
}

impl MockSpinner {
    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.record(format!("msg:{}", msg));
    }

    fn finish_success(&mut self, msg: &str) {
        self.record(format!("ok:{}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.record(format!("err:{}", msg));
    }
}
