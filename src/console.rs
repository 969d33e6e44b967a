//! A terminal host: prints every request the engine makes

use std::io::Write;
use std::time::Duration;

use crate::keymap::{BindingReport, Host, KeyAction, KeyEvent};

/// Host that writes one line per collaborator call
pub struct ConsoleHost<W: Write> {
    out: W,
    writable: bool,
    caret_browsing: bool,
}

impl<W: Write> ConsoleHost<W> {
    pub fn new(out: W, writable: bool, caret_browsing: bool) -> Self {
        Self {
            out,
            writable,
            caret_browsing,
        }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("console write failed: {}", e);
        }
    }

    /// Report how the engine handled `key`
    pub fn action(&mut self, key: &str, action: KeyAction) {
        let outcome = match action {
            KeyAction::Executed => "executed",
            KeyAction::AwaitMore => "waiting",
            KeyAction::Consumed => "consumed",
            KeyAction::PassThrough => "passed through",
        };
        self.line(format_args!("{:<8} {}", key, outcome));
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Host for ConsoleHost<W> {
    fn is_writable(&self) -> bool {
        self.writable
    }

    fn is_caret_browsing(&self) -> bool {
        self.caret_browsing
    }

    fn suppress_default_action(&mut self, _event: &KeyEvent) {}

    fn notify(&mut self, text: &str, duration: Option<Duration>) {
        if text.is_empty() {
            return;
        }
        match duration {
            Some(d) => self.line(format_args!("  [status] {} ({}ms)", text, d.as_millis())),
            None => self.line(format_args!("  [status] {}", text)),
        }
    }

    fn run_hook(&mut self, name: &str, event: &KeyEvent) {
        self.line(format_args!("  [hook] {} ({})", name, event.to_token()));
    }

    fn insert_repeated(&mut self, text: &str, count: usize) {
        self.line(format_args!("  [insert] {:?} x{}", text, count));
    }

    fn dispatch_synthetic(&mut self, event: &KeyEvent, suppress_reentry: bool) {
        let marker = if suppress_reentry { " (no re-entry)" } else { "" };
        self.line(format_args!("  [key] {}{}", event.to_token(), marker));
    }

    fn show_help(&mut self, report: &BindingReport) {
        self.line(format_args!("{}", report));
    }

    fn alert(&mut self, text: &str) {
        self.line(format_args!("  [alert] {}", text));
    }
}
