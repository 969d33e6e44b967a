//! The host side of the engine: everything the dispatcher needs from the
//! surrounding application, and nothing else.

use std::time::Duration;

use super::context::KeyContext;
use super::help::BindingReport;
use super::types::KeyEvent;

/// Capabilities the dispatch engine consumes from its host
///
/// Commands receive the same `&mut dyn Host` when they run, so this is also
/// the service surface bound commands act on.
pub trait Host {
    /// Whether the focused target accepts text
    fn is_writable(&self) -> bool;

    /// Whether caret browsing is switched on
    fn is_caret_browsing(&self) -> bool;

    /// Stop the host from also handling an event the engine consumed
    fn suppress_default_action(&mut self, event: &KeyEvent);

    /// Transient status feedback. An empty `text` clears the status area.
    fn notify(&mut self, text: &str, duration: Option<Duration>);

    /// Fire a named extension point
    fn run_hook(&mut self, name: &str, event: &KeyEvent);

    /// Insert `text` into the focused target `count` times
    fn insert_repeated(&mut self, text: &str, count: usize);

    /// Inject a synthetic key event into the host
    ///
    /// When `suppress_reentry` is set the host must not feed the event back
    /// into the engine (see `Engine::handle_synthetic`).
    fn dispatch_synthetic(&mut self, event: &KeyEvent, suppress_reentry: bool);

    /// Present a binding report (interactive help)
    fn show_help(&mut self, report: &BindingReport);

    /// Blocking notice. Only used when enabling the engine with no bindings.
    fn alert(&mut self, text: &str) {
        self.notify(text, None);
    }

    /// Snapshot of the mode-selection signals
    fn context(&self) -> KeyContext {
        KeyContext {
            writable: self.is_writable(),
            caret_browsing: self.is_caret_browsing(),
        }
    }
}
