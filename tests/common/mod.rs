//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use keyseq::keymap::{
    parse_sequence, BindingReport, Command, Engine, Host, KeyAction, KeyEvent, Mode,
};

/// Host double that records every call the engine makes
#[derive(Default)]
pub struct RecordingHost {
    pub writable: bool,
    pub caret: bool,
    pub notices: Vec<String>,
    pub suppressed: Vec<KeyEvent>,
    pub hooks: Vec<String>,
    pub inserted: Vec<(String, usize)>,
    pub synthetic: Vec<(KeyEvent, bool)>,
    pub help: Vec<BindingReport>,
    pub alerts: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writable() -> Self {
        Self {
            writable: true,
            ..Default::default()
        }
    }

    pub fn last_notice(&self) -> &str {
        self.notices.last().map(String::as_str).unwrap_or_default()
    }
}

impl Host for RecordingHost {
    fn is_writable(&self) -> bool {
        self.writable
    }
    fn is_caret_browsing(&self) -> bool {
        self.caret
    }
    fn suppress_default_action(&mut self, event: &KeyEvent) {
        self.suppressed.push(*event);
    }
    fn notify(&mut self, text: &str, _duration: Option<Duration>) {
        self.notices.push(text.to_string());
    }
    fn run_hook(&mut self, name: &str, _event: &KeyEvent) {
        self.hooks.push(name.to_string());
    }
    fn insert_repeated(&mut self, text: &str, count: usize) {
        self.inserted.push((text.to_string(), count));
    }
    fn dispatch_synthetic(&mut self, event: &KeyEvent, suppress_reentry: bool) {
        self.synthetic.push((*event, suppress_reentry));
    }
    fn show_help(&mut self, report: &BindingReport) {
        self.help.push(report.clone());
    }
    fn alert(&mut self, text: &str) {
        self.alerts.push(text.to_string());
    }
}

/// Every invocation's prefix argument, in call order
pub type CallLog = Rc<RefCell<Vec<Option<i64>>>>;

/// A command that appends its argument to a shared log
pub fn logging_command(description: &str) -> (Command, CallLog) {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let command = Command::new(description, move |_host, _event, arg| {
        sink.borrow_mut().push(arg);
    });
    (command, log)
}

/// Engine with a single logging command bound to `keys` in `mode`
pub fn engine_with(mode: Mode, keys: &str) -> (Engine, CallLog) {
    let (command, log) = logging_command(keys);
    let mut engine = Engine::new();
    engine
        .bind(mode, parse_sequence(keys).unwrap(), command)
        .unwrap();
    (engine, log)
}

pub fn key(token: &str) -> KeyEvent {
    token.parse().unwrap()
}

/// Feed space separated tokens through the engine
pub fn press(engine: &mut Engine, host: &mut RecordingHost, keys: &str) -> Vec<KeyAction> {
    keys.split_whitespace()
        .map(|token| engine.handle_event(&mut *host, &key(token)))
        .collect()
}
