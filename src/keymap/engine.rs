//! The dispatch engine: one key event in, at most one command out
//!
//! The engine owns the keymap registry, the reserved keys and all transient
//! interpretation state. Hosts feed it events through [`Engine::handle_event`]
//! and act on the returned [`KeyAction`].

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{EngineConfig, MagicKeys};

use super::binding::KeySpec;
use super::command::{repeat_count, Command, CommandTable, QUIT_HOOK};
use super::config::{KeymapError, KeymapFile};
use super::context::Mode;
use super::help::{BindingReport, ReportSection, SpecialKeyRow};
use super::host::Host;
use super::keymap::{Entry, KeyMap, Override};
use super::prefix::{continues_prefix_argument, is_prefix_argument_key, parse_prefix_argument};
use super::recorder::MacroRecorder;
use super::registry::KeymapRegistry;
use super::types::{display_sequence, KeyEvent, KeyToken};

/// How long transient notices stay in the status area
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// What the engine did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// A bound command ran
    Executed,
    /// The event extended a sequence or a prefix argument
    AwaitMore,
    /// The event was swallowed without running a command
    Consumed,
    /// The host should handle the event itself
    PassThrough,
}

impl KeyAction {
    /// Whether the host's default handling was suppressed
    pub fn is_consumed(self) -> bool {
        !matches!(self, KeyAction::PassThrough)
    }
}

/// Where an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Delivered by the host's event stream
    Host,
    /// Re-dispatched from the macro buffer
    Replay,
}

/// Transient interpretation state, cleared by every return to neutral
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchState {
    /// Root the current trie position hangs from
    pub keymap: Mode,
    /// Tokens consumed since the last reset (prefix-argument keys while collecting)
    pub sequence: Vec<KeyToken>,
    pub prefix_arg: Option<i64>,
    /// Collected argument keys, kept for the status line
    pub prefix_arg_string: Option<String>,
    pub collecting_prefix_arg: bool,
    pub escape_pending: bool,
}

enum Lookup {
    Command(Command),
    Prefix,
    Missing,
    /// Not even the global map can follow the sequence
    Lost,
}

/// Modal key-sequence dispatcher
#[derive(Debug)]
pub struct Engine {
    registry: KeymapRegistry,
    keys: MagicKeys,
    state: DispatchState,
    recorder: MacroRecorder,
    enabled: bool,
    /// Where the enabled flag is persisted, if anywhere
    preferences: Option<PathBuf>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Enabled engine with default reserved keys and empty keymaps
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: KeymapRegistry::new(),
            keys: config.keys,
            state: DispatchState::default(),
            recorder: MacroRecorder::new(),
            enabled: config.enabled,
            preferences: None,
        }
    }

    /// Load config from `path` and persist the enabled flag back to it
    pub fn with_preferences(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut engine = Self::with_config(EngineConfig::load_from(&path));
        engine.preferences = Some(path);
        engine
    }

    // === Registration ===

    pub fn registry(&self) -> &KeymapRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut KeymapRegistry {
        &mut self.registry
    }

    /// Bind keys in `mode` (see [`KeymapRegistry::bind`])
    pub fn bind(
        &mut self,
        mode: Mode,
        keys: impl Into<KeySpec>,
        command: Command,
    ) -> Result<Vec<Override>, KeymapError> {
        self.registry.bind(mode, keys, command)
    }

    /// Install a parsed keymap file (see [`KeymapRegistry::load`])
    pub fn load_keymap(
        &mut self,
        file: &KeymapFile,
        commands: &CommandTable,
    ) -> Result<Vec<Override>, KeymapError> {
        self.registry.load(file, commands)
    }

    // === State accessors ===

    pub fn keys(&self) -> &MagicKeys {
        &self.keys
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_recording_macro(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn macro_events(&self) -> &[KeyEvent] {
        self.recorder.events()
    }

    /// Current trie position, if the sequence can still be followed
    pub fn cursor(&self) -> Option<&KeyMap> {
        self.registry
            .root(self.state.keymap)?
            .trail(&self.state.sequence)
    }

    // === Lifecycle ===

    /// Attach to the host's event stream and persist the flag
    pub fn start(&mut self) {
        self.enabled = true;
        tracing::info!("key handling enabled");
        self.persist();
    }

    /// Detach, drop any partial interpretation, and persist the flag
    pub fn stop(&mut self) {
        self.enabled = false;
        self.reset();
        tracing::info!("key handling disabled");
        self.persist();
    }

    /// Stop when running; otherwise start, provided any binding is loaded
    pub fn toggle_status(&mut self, host: &mut dyn Host) {
        if self.enabled {
            self.stop();
        } else if !self.registry.is_empty() {
            self.start();
        } else {
            tracing::warn!("refusing to enable key handling without bindings");
            host.alert("No bindings loaded");
            self.enabled = false;
        }
    }

    fn persist(&self) {
        let Some(path) = &self.preferences else {
            return;
        };
        let config = EngineConfig {
            enabled: self.enabled,
            keys: self.keys.clone(),
        };
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Failed to persist enabled flag: {}", e);
        }
    }

    // === Dispatch ===

    /// Handle one event from the host's event stream
    pub fn handle_event(&mut self, host: &mut dyn Host, event: &KeyEvent) -> KeyAction {
        if !self.enabled {
            return KeyAction::PassThrough;
        }
        self.dispatch(host, event, Origin::Host)
    }

    /// Handle an event the host generated itself
    ///
    /// Events injected with `no_handle` set are never interpreted; this is
    /// what keeps replayed and re-injected keys from looping back in.
    pub fn handle_synthetic(
        &mut self,
        host: &mut dyn Host,
        event: &KeyEvent,
        no_handle: bool,
    ) -> KeyAction {
        if no_handle {
            return KeyAction::PassThrough;
        }
        self.handle_event(host, event)
    }

    /// Simulate a key press in the host
    pub fn generate_key(&self, host: &mut dyn Host, event: &KeyEvent, no_handle: bool) {
        host.dispatch_synthetic(event, no_handle);
    }

    fn dispatch(&mut self, host: &mut dyn Host, event: &KeyEvent, origin: Origin) -> KeyAction {
        if self.state.escape_pending {
            tracing::debug!("escaped key passed through");
            self.back_to_neutral(host, "Escaped", Some(NOTICE_DURATION));
            return self.pass_through(host, event, origin);
        }

        let token = event.to_token();

        if origin == Origin::Host {
            self.recorder.record(*event);
        }

        if let Some(action) = self.handle_magic_key(host, event, &token, origin) {
            return action;
        }

        if self.state.collecting_prefix_arg {
            if continues_prefix_argument(&token, event) {
                self.state.sequence.push(token);
                host.notify(&display_sequence(&self.state.sequence), None);
                return self.consume(host, event, origin, KeyAction::AwaitMore);
            }
            self.finish_prefix_argument();
        }

        if self.state.sequence.is_empty() {
            if is_prefix_argument_key(&token, event) {
                tracing::debug!(key = %token, "collecting prefix argument");
                host.notify(token.as_str(), None);
                self.state.sequence.push(token);
                self.state.collecting_prefix_arg = true;
                return self.consume(host, event, origin, KeyAction::AwaitMore);
            }

            let mode = Mode::for_context(&host.context());
            tracing::trace!(mode = %mode, "sequence started");
            self.state.keymap = mode;
        } else if token == self.keys.help {
            let report = self.interactive_help();
            host.show_help(&report);
            self.back_to_neutral(host, "", None);
            return self.consume(host, event, origin, KeyAction::Consumed);
        }

        match self.resolve(&token) {
            Lookup::Command(command) => {
                let arg = self.state.prefix_arg;
                let action = self.consume(host, event, origin, KeyAction::Executed);
                self.back_to_neutral(host, "", None);
                tracing::debug!(command = command.description(), arg = ?arg, "executing");
                command.execute(host, event, arg);
                action
            }
            Lookup::Prefix => {
                let action = self.consume(host, event, origin, KeyAction::AwaitMore);
                self.state.sequence.push(token);
                let status = format!(
                    "{}{}",
                    self.state.prefix_arg_string.as_deref().unwrap_or_default(),
                    display_sequence(&self.state.sequence)
                );
                host.notify(&status, None);
                action
            }
            Lookup::Missing if !self.state.sequence.is_empty() => {
                let action = self.consume(host, event, origin, KeyAction::Consumed);
                let message = format!(
                    "{} {} is undefined",
                    display_sequence(&self.state.sequence),
                    token
                );
                self.back_to_neutral(host, &message, Some(NOTICE_DURATION));
                action
            }
            Lookup::Missing => {
                let repeat = self.state.prefix_arg.filter(|&n| n > 0);
                match (repeat, event.printable()) {
                    (Some(n), Some(c)) if host.is_writable() => {
                        let action = self.consume(host, event, origin, KeyAction::Consumed);
                        host.insert_repeated(&c.to_string(), repeat_count(n));
                        self.back_to_neutral(host, "", None);
                        action
                    }
                    _ => {
                        self.back_to_neutral(host, "", None);
                        self.pass_through(host, event, origin)
                    }
                }
            }
            Lookup::Lost => {
                tracing::trace!(key = %token, "no keymap follows the sequence");
                self.back_to_neutral(host, "", None);
                self.pass_through(host, event, origin)
            }
        }
    }

    /// Reserved keys, checked before any keymap
    fn handle_magic_key(
        &mut self,
        host: &mut dyn Host,
        event: &KeyEvent,
        token: &KeyToken,
        origin: Origin,
    ) -> Option<KeyAction> {
        if *token == self.keys.escape {
            host.notify("Escape Next Key: ", None);
            self.state.escape_pending = true;
        } else if *token == self.keys.quit {
            tracing::debug!(sequence = %display_sequence(&self.state.sequence), "quit");
            host.run_hook(QUIT_HOOK, event);
            self.back_to_neutral(host, "Quit", None);
        } else if *token == self.keys.macro_end || *token == self.keys.macro_start {
            if origin == Origin::Replay {
                return Some(KeyAction::Consumed);
            }
            if *token == self.keys.macro_end {
                self.end_macro(host);
            } else {
                self.start_macro(host);
            }
        } else {
            return None;
        }

        Some(self.consume(host, event, origin, KeyAction::Consumed))
    }

    fn end_macro(&mut self, host: &mut dyn Host) {
        if self.recorder.is_recording() {
            self.recorder.drop_last();
            self.recorder.finish();
            tracing::debug!(events = self.recorder.events().len(), "macro defined");
            host.notify("Keyboard macro defined", Some(NOTICE_DURATION));
        } else if !self.recorder.is_empty() {
            host.notify("Do macro", Some(NOTICE_DURATION));
            self.replay(host);
        } else {
            host.notify("No macro defined", Some(NOTICE_DURATION));
        }
    }

    fn start_macro(&mut self, host: &mut dyn Host) {
        if self.recorder.is_recording() {
            self.recorder.drop_last();
        } else {
            tracing::debug!("macro recording started");
            host.notify("Defining Keyboard macro ...", Some(NOTICE_DURATION));
            self.recorder.start();
        }
    }

    /// Feed the recorded macro back through the dispatcher
    ///
    /// Pending state is kept: a prefix argument typed before the play key
    /// applies to the first replayed command, and a half-typed sequence
    /// continues with the first replayed key.
    fn replay(&mut self, host: &mut dyn Host) {
        let events = self.recorder.events().to_vec();
        tracing::debug!(events = events.len(), "replaying macro");

        for event in &events {
            self.dispatch(host, event, Origin::Replay);
        }
    }

    fn finish_prefix_argument(&mut self) {
        let arg = parse_prefix_argument(&self.state.sequence);
        tracing::debug!(keys = %display_sequence(&self.state.sequence), arg = ?arg, "prefix argument");

        self.state.prefix_arg = arg;
        self.state.collecting_prefix_arg = false;
        self.state.prefix_arg_string = Some(format!("{} ", display_sequence(&self.state.sequence)));
        self.state.sequence.clear();
    }

    /// Look `token` up at the current position, falling back to the global
    /// map trailed by the same sequence
    fn resolve(&mut self, token: &KeyToken) -> Lookup {
        let bound_here = self
            .cursor()
            .is_some_and(|map| map.lookup(token).is_some());

        if !bound_here {
            let global = self
                .registry
                .root(Mode::Global)
                .and_then(|root| root.trail(&self.state.sequence));
            if global.is_none() {
                return Lookup::Lost;
            }
            self.state.keymap = Mode::Global;
        }

        match self.cursor().and_then(|map| map.lookup(token)) {
            Some(Entry::Command(command)) => Lookup::Command(command.clone()),
            Some(Entry::Map(_)) => Lookup::Prefix,
            None => Lookup::Missing,
        }
    }

    fn consume(
        &self,
        host: &mut dyn Host,
        event: &KeyEvent,
        origin: Origin,
        action: KeyAction,
    ) -> KeyAction {
        if origin == Origin::Host {
            host.suppress_default_action(event);
        }
        action
    }

    /// Replayed events have no host default to fall back on, so they are
    /// re-injected with re-entry suppressed.
    fn pass_through(&self, host: &mut dyn Host, event: &KeyEvent, origin: Origin) -> KeyAction {
        if origin == Origin::Replay {
            host.dispatch_synthetic(event, true);
        }
        KeyAction::PassThrough
    }

    /// Reset every transient field and show `message` (empty clears)
    pub fn back_to_neutral(&mut self, host: &mut dyn Host, message: &str, duration: Option<Duration>) {
        self.reset();
        host.notify(message, duration);
    }

    fn reset(&mut self) {
        self.state = DispatchState::default();
    }

    // === Help ===

    /// Bindings reachable from the sequence typed so far, per mode
    pub fn interactive_help(&self) -> BindingReport {
        self.bindings_starting_with(&self.state.sequence)
    }

    /// Bindings below `prefix` in every mode that can follow it
    pub fn bindings_starting_with(&self, prefix: &[KeyToken]) -> BindingReport {
        let keys = display_sequence(prefix);
        let mut report = BindingReport::new(format!("Key Bindings Starting With {}", keys));

        for mode in self.registry.modes() {
            let Some(map) = self.registry.root(mode).and_then(|root| root.trail(prefix)) else {
                continue;
            };
            report.sections.push(ReportSection {
                mode,
                title: format!("{} Bindings Starting With {}", mode.title(), keys),
                rows: map.rows(prefix),
            });
        }
        report
    }

    /// Every binding of every declared mode, after the reserved keys
    pub fn list_key_bindings(&self) -> BindingReport {
        let mut report = BindingReport::new("All key bindings");

        let special = [
            ("Quit key", &self.keys.quit),
            ("Help key", &self.keys.help),
            ("Escape key", &self.keys.escape),
            ("Start key macro recording", &self.keys.macro_start),
            ("End key macro recording / Play key macro", &self.keys.macro_end),
        ];
        report.special_keys = special
            .into_iter()
            .map(|(role, key)| SpecialKeyRow {
                role: role.to_string(),
                key: key.clone(),
            })
            .collect();

        for mode in self.registry.modes() {
            let Some(root) = self.registry.root(mode) else {
                continue;
            };
            report.sections.push(ReportSection {
                mode,
                title: format!("{} Bindings", mode.title()),
                rows: root.rows(&[]),
            });
        }
        report
    }
}
