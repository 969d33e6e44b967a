//! Commands: what a key sequence resolves to
//!
//! A command is a callable plus the metadata the dispatcher cares about:
//! a human readable description (for help listings and override warnings)
//! and whether a prefix argument may repeat it.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::host::Host;
use super::types::{KeyEvent, Modifiers, NamedKey};

/// Hook fired by the quit key and by the `keyboard-quit` command
pub const QUIT_HOOK: &str = "KeyBoardQuit";

/// Most times a prefix argument can repeat a command or an insertion
///
/// Six `C-u` presses (4096) still repeat in full. Longer chains saturate
/// the argument, and the repeat count stops here.
pub const MAX_REPEAT: usize = 4096;

/// Number of runs a positive prefix argument asks for, capped at [`MAX_REPEAT`]
pub fn repeat_count(arg: i64) -> usize {
    usize::try_from(arg).map_or(0, |n| n.min(MAX_REPEAT))
}

/// Signature of a command body: host services, triggering event, prefix argument
pub type CommandFn = dyn Fn(&mut dyn Host, &KeyEvent, Option<i64>);

/// A bindable command
#[derive(Clone)]
pub struct Command {
    invoke: Rc<CommandFn>,
    description: String,
    no_repeat: bool,
}

impl Command {
    /// Create a repeatable command
    pub fn new<F>(description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut dyn Host, &KeyEvent, Option<i64>) + 'static,
    {
        Self {
            invoke: Rc::new(f),
            description: description.into(),
            no_repeat: false,
        }
    }

    /// Run exactly once even when a prefix argument is given (builder pattern)
    pub fn no_repeat(mut self) -> Self {
        self.no_repeat = true;
        self
    }

    /// Replace the description, keeping the same body
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_no_repeat(&self) -> bool {
        self.no_repeat
    }

    /// Whether both commands share the same body
    pub fn same_body(&self, other: &Command) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.invoke) as *const (),
            Rc::as_ptr(&other.invoke) as *const (),
        )
    }

    /// Invoke the body once
    pub fn invoke(&self, host: &mut dyn Host, event: &KeyEvent, arg: Option<i64>) {
        (self.invoke)(host, event, arg);
    }

    /// Invoke per the repeat policy
    ///
    /// A positive argument runs a repeatable command that many times (at
    /// most [`MAX_REPEAT`]), each call receiving the same event and argument.
    /// Anything else runs once.
    pub fn execute(&self, host: &mut dyn Host, event: &KeyEvent, arg: Option<i64>) {
        match arg {
            Some(n) if n > 0 && !self.no_repeat => {
                let times = repeat_count(n);
                if (times as i64) < n {
                    tracing::debug!(command = %self.description, arg = n, times, "repeat count capped");
                }
                tracing::trace!(command = %self.description, times, "repeating command");
                for _ in 0..times {
                    self.invoke(host, event, arg);
                }
            }
            _ => self.invoke(host, event, arg),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("description", &self.description)
            .field("no_repeat", &self.no_repeat)
            .finish_non_exhaustive()
    }
}

/// Named commands that keymap files can refer to
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: BTreeMap<String, Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named command
    pub fn insert(&mut self, name: impl Into<String>, command: Command) {
        self.commands.insert(name.into(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A command that re-injects `event` into the host, bypassing the engine
fn synthetic(description: &str, event: KeyEvent) -> Command {
    Command::new(description, move |host, _event, _arg| {
        host.dispatch_synthetic(&event, true);
    })
}

/// Commands every keymap file can use without registering anything
///
/// Motion and editing commands map Emacs keys onto the host's own named
/// keys, so `C-n` moves exactly like the down arrow would.
pub fn builtin_commands() -> CommandTable {
    let ctrl = Modifiers::CTRL;
    let named = KeyEvent::named;

    let mut table = CommandTable::new();

    table.insert("next-line", synthetic("Next line", named(NamedKey::Down)));
    table.insert("previous-line", synthetic("Previous line", named(NamedKey::Up)));
    table.insert("forward-char", synthetic("Forward char", named(NamedKey::Right)));
    table.insert("backward-char", synthetic("Backward char", named(NamedKey::Left)));
    table.insert(
        "beginning-of-line",
        synthetic("Beginning of the line", named(NamedKey::Home)),
    );
    table.insert("end-of-line", synthetic("End of the line", named(NamedKey::End)));
    table.insert("scroll-up", synthetic("Scroll page down", named(NamedKey::PageDown)));
    table.insert("scroll-down", synthetic("Scroll page up", named(NamedKey::PageUp)));
    table.insert(
        "beginning-of-buffer",
        synthetic(
            "Beginning of the buffer",
            KeyEvent::named_with_mods(NamedKey::Home, ctrl),
        ),
    );
    table.insert(
        "end-of-buffer",
        synthetic(
            "End of the buffer",
            KeyEvent::named_with_mods(NamedKey::End, ctrl),
        ),
    );
    table.insert("delete-char", synthetic("Delete forward char", named(NamedKey::Delete)));
    table.insert(
        "delete-backward-char",
        synthetic("Delete backward char", named(NamedKey::Backspace)),
    );
    table.insert("newline", synthetic("Insert a newline", named(NamedKey::Return)));
    table.insert("indent", synthetic("Insert a tab", named(NamedKey::Tab)));
    table.insert(
        "keyboard-quit",
        Command::new("Cancel and run the quit hook", |host, event, _arg| {
            host.run_hook(QUIT_HOOK, event);
        })
        .no_repeat(),
    );

    table
}
