//! KeyMap trie: tokens map to either a command (leaf) or a nested map

use std::collections::BTreeMap;
use std::fmt;

use super::command::Command;
use super::help::BindingRow;
use super::types::{display_sequence, KeyToken};

/// What a token resolves to inside a [`KeyMap`]
#[derive(Debug, Clone)]
pub enum Entry {
    /// Leaf: the sequence is complete
    Command(Command),
    /// Branch: the token is a prefix of longer sequences
    Map(KeyMap),
}

impl Entry {
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Entry::Command(command) => Some(command),
            Entry::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&KeyMap> {
        match self {
            Entry::Map(map) => Some(map),
            Entry::Command(_) => None,
        }
    }
}

/// A registration that replaced an existing entry of a different shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// A command stood where a longer sequence needed a prefix map
    CommandShadowed {
        keys: Vec<KeyToken>,
        description: String,
    },
    /// A prefix map (and every binding below it) was replaced by a command
    PrefixReplaced { keys: Vec<KeyToken>, bindings: usize },
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::CommandShadowed { keys, description } => write!(
                f,
                "{} bound to [{}] overridden with the prefix key",
                description,
                display_sequence(keys)
            ),
            Override::PrefixReplaced { keys, bindings } => write!(
                f,
                "prefix key [{}] with {} binding(s) overridden with a command",
                display_sequence(keys),
                bindings
            ),
        }
    }
}

/// One node of the keymap trie
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    entries: BTreeMap<KeyToken, Entry>,
}

impl KeyMap {
    /// Create an empty keymap
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for a single token at this level
    pub fn lookup(&self, token: &KeyToken) -> Option<&Entry> {
        self.entries.get(token)
    }

    /// Walk `keys` through nested maps
    ///
    /// Returns `None` as soon as a step is missing or lands on a command,
    /// since a sequence can never pass through a leaf.
    pub fn trail(&self, keys: &[KeyToken]) -> Option<&KeyMap> {
        keys.iter()
            .try_fold(self, |map, key| map.lookup(key).and_then(Entry::as_map))
    }

    /// Command bound to exactly `keys`
    pub fn command_at(&self, keys: &[KeyToken]) -> Option<&Command> {
        let (last, prefix) = keys.split_last()?;
        self.trail(prefix)?.lookup(last)?.as_command()
    }

    /// Bind a non-empty sequence, creating prefix maps on the way down
    ///
    /// Returns every entry of an incompatible shape that had to be replaced.
    pub(crate) fn bind_sequence(&mut self, keys: &[KeyToken], command: Command) -> Vec<Override> {
        let mut overrides = Vec::new();
        let Some((last, prefix)) = keys.split_last() else {
            return overrides;
        };

        let mut map = self;
        for (i, key) in prefix.iter().enumerate() {
            let entry = map
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::Map(KeyMap::new()));

            if let Entry::Command(shadowed) = entry {
                let shadow = Override::CommandShadowed {
                    keys: keys[..=i].to_vec(),
                    description: shadowed.description().to_string(),
                };
                tracing::warn!("{}", shadow);
                overrides.push(shadow);
                *entry = Entry::Map(KeyMap::new());
            }

            let Entry::Map(next) = entry else {
                return overrides;
            };
            map = next;
        }

        match map.entries.insert(last.clone(), Entry::Command(command)) {
            Some(Entry::Map(replaced)) => {
                let replaced = Override::PrefixReplaced {
                    keys: keys.to_vec(),
                    bindings: replaced.binding_count(),
                };
                tracing::warn!("{}", replaced);
                overrides.push(replaced);
            }
            Some(Entry::Command(previous)) => {
                tracing::debug!(
                    keys = %display_sequence(keys),
                    previous = previous.description(),
                    "rebinding command"
                );
            }
            None => {}
        }

        overrides
    }

    /// Insert or replace a top-level entry
    pub(crate) fn insert(&mut self, token: KeyToken, entry: Entry) {
        self.entries.insert(token, entry);
    }

    /// Top-level entries in token order
    pub fn iter(&self) -> impl Iterator<Item = (&KeyToken, &Entry)> {
        self.entries.iter()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of commands reachable from this node
    pub fn binding_count(&self) -> usize {
        self.entries
            .values()
            .map(|entry| match entry {
                Entry::Command(_) => 1,
                Entry::Map(map) => map.binding_count(),
            })
            .sum()
    }

    /// Every `(sequence, description)` pair below this node, depth first
    ///
    /// `prefix` is the sequence that led to this node and is prepended to
    /// every row.
    pub fn rows(&self, prefix: &[KeyToken]) -> Vec<BindingRow> {
        let mut rows = Vec::new();
        let mut path = prefix.to_vec();
        self.collect_rows(&mut path, &mut rows);
        rows
    }

    fn collect_rows(&self, path: &mut Vec<KeyToken>, rows: &mut Vec<BindingRow>) {
        for (token, entry) in &self.entries {
            path.push(token.clone());
            match entry {
                Entry::Command(command) => rows.push(BindingRow {
                    keys: path.clone(),
                    description: command.description().to_string(),
                }),
                Entry::Map(map) => map.collect_rows(path, rows),
            }
            path.pop();
        }
    }
}
