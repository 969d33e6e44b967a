//! Per-mode keymap roots and the registration API

use std::collections::BTreeMap;

use super::binding::{KeySpec, Keybinding};
use super::command::{Command, CommandTable};
use super::config::{KeymapError, KeymapFile};
use super::context::Mode;
use super::keymap::{KeyMap, Override};
use super::types::KeyToken;

/// Holds one root [`KeyMap`] per declared mode
#[derive(Debug, Clone, Default)]
pub struct KeymapRegistry {
    maps: BTreeMap<Mode, KeyMap>,
}

impl KeymapRegistry {
    /// Registry with the global, view, edit and caret roots declared
    pub fn new() -> Self {
        let mut registry = Self::default();
        for mode in [Mode::Global, Mode::View, Mode::Edit, Mode::Caret] {
            registry.declare(mode);
        }
        registry
    }

    /// Create the mode's root if absent. Never touches an existing root.
    pub fn declare(&mut self, mode: Mode) -> &mut KeyMap {
        self.maps.entry(mode).or_default()
    }

    pub fn root(&self, mode: Mode) -> Option<&KeyMap> {
        self.maps.get(&mode)
    }

    /// Declared modes in a stable order
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.maps.keys().copied()
    }

    /// Command bound to exactly `keys` in `mode`
    pub fn command_at(&self, mode: Mode, keys: &[KeyToken]) -> Option<&Command> {
        self.root(mode)?.command_at(keys)
    }

    /// True when no mode has a single binding
    pub fn is_empty(&self) -> bool {
        self.maps.values().all(KeyMap::is_empty)
    }

    /// Bind a token, a sequence, or several sequences to `command`
    ///
    /// The whole request is validated before any trie is touched, so an
    /// empty sequence leaves every map unchanged. Undeclared modes are
    /// declared on first use.
    pub fn bind(
        &mut self,
        mode: Mode,
        keys: impl Into<KeySpec>,
        command: Command,
    ) -> Result<Vec<Override>, KeymapError> {
        let keys = keys.into();
        keys.validate()?;

        let root = self.declare(mode);
        let mut overrides = Vec::new();
        for sequence in keys.sequences() {
            overrides.extend(root.bind_sequence(sequence, command.clone()));
        }

        tracing::trace!(
            mode = %mode,
            keys = %keys.display_string(),
            command = command.description(),
            "bound"
        );
        Ok(overrides)
    }

    /// Copy every top-level entry of `from` into `to`
    ///
    /// Entries are cloned, so later edits to either map stay independent.
    /// Copying from an undeclared mode is a no-op.
    pub fn copy(&mut self, from: Mode, to: Mode) {
        let Some(source) = self.maps.get(&from).cloned() else {
            tracing::debug!(from = %from, to = %to, "copy from undeclared keymap ignored");
            return;
        };

        let destination = self.declare(to);
        for (token, entry) in source.iter() {
            destination.insert(token.clone(), entry.clone());
        }
    }

    /// Resolve a parsed binding through `commands` and bind it
    pub fn install(
        &mut self,
        binding: &Keybinding,
        commands: &CommandTable,
    ) -> Result<Vec<Override>, KeymapError> {
        let mut command = commands
            .get(&binding.command)
            .cloned()
            .ok_or_else(|| KeymapError::InvalidCommand(binding.command.clone()))?;

        if let Some(description) = &binding.description {
            command = command.with_description(description.clone());
        }
        if binding.no_repeat {
            command = command.no_repeat();
        }

        self.bind(binding.mode, binding.keys.clone(), command)
    }

    /// Install a whole keymap file: bindings in order, then copies
    ///
    /// Every command name is resolved before anything is bound.
    pub fn load(
        &mut self,
        file: &KeymapFile,
        commands: &CommandTable,
    ) -> Result<Vec<Override>, KeymapError> {
        if let Some(missing) = file
            .bindings
            .iter()
            .find(|b| commands.get(&b.command).is_none())
        {
            return Err(KeymapError::InvalidCommand(missing.command.clone()));
        }

        let mut overrides = Vec::new();
        for binding in &file.bindings {
            overrides.extend(self.install(binding, commands)?);
        }
        for &(from, to) in &file.copies {
            self.copy(from, to);
        }

        tracing::info!(
            bindings = file.bindings.len(),
            copies = file.copies.len(),
            overrides = overrides.len(),
            "keymap loaded"
        );
        Ok(overrides)
    }
}
