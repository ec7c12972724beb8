//! Non-interactive UI for CI/headless environments.

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Line-oriented output with no spinners or colors.
///
/// Status goes to stdout, warnings and errors to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(LineSpinner {
            show: self.mode.shows_status(),
        })
        .started(message)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n=== {} ===\n", title);
        }
    }

    fn show_output(&mut self, label: &str, output: &str) {
        let output = output.trim_end();
        if output.is_empty() {
            return;
        }
        println!("--- {} ---", label);
        println!("{}", output);
    }
}

/// Prints start/finish lines instead of animating.
struct LineSpinner {
    show: bool,
}

impl LineSpinner {
    fn started(self: Box<Self>, message: &str) -> Box<dyn SpinnerHandle> {
        if self.show {
            println!("{}", message);
        }
        self
    }
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}
