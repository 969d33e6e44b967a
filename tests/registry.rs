//! Keymap registry tests
//!
//! Declaring, binding, copying and loading keymaps, plus the warnings
//! raised when a binding changes the shape of the trie

mod common;

use common::{logging_command, press, RecordingHost};

use keyseq::keymap::{
    builtin_commands, parse_keymap_yaml, parse_sequence, KeyToken, KeymapError,
    KeymapRegistry, Mode, Override,
};

fn token(s: &str) -> KeyToken {
    KeyToken::parse(s).unwrap()
}

#[test]
fn test_declare_is_idempotent() {
    let mut registry = KeymapRegistry::new();
    let (command, _) = logging_command("save");
    registry
        .bind(Mode::Menu, parse_sequence("C-s").unwrap(), command)
        .unwrap();

    registry.declare(Mode::Menu);
    registry.declare(Mode::Menu);

    assert!(registry.command_at(Mode::Menu, &[token("C-s")]).is_some());
    assert_eq!(registry.modes().filter(|m| *m == Mode::Menu).count(), 1);
}

#[test]
fn test_default_modes_are_declared() {
    let registry = KeymapRegistry::new();
    for mode in [Mode::Global, Mode::View, Mode::Edit, Mode::Caret] {
        assert!(registry.root(mode).is_some(), "{} should be declared", mode);
    }
    assert!(registry.root(Mode::Menu).is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_multi_bind_shares_command() {
    let mut registry = KeymapRegistry::new();
    let (command, _) = logging_command("kill");
    let keys = vec![
        parse_sequence("C-x k").unwrap(),
        parse_sequence("C-x C-k").unwrap(),
    ];
    registry.bind(Mode::Global, keys, command).unwrap();

    let a = registry.command_at(Mode::Global, &parse_sequence("C-x k").unwrap()).unwrap();
    let b = registry.command_at(Mode::Global, &parse_sequence("C-x C-k").unwrap()).unwrap();
    assert!(a.same_body(b));
}

#[test]
fn test_empty_sequence_is_rejected_without_changes() {
    let mut registry = KeymapRegistry::new();
    let (command, _) = logging_command("noop");
    let keys = vec![parse_sequence("C-x k").unwrap(), Vec::new()];

    let result = registry.bind(Mode::Global, keys, command);

    assert_eq!(result, Err(KeymapError::EmptySequence));
    assert!(registry.is_empty());
}

#[test]
fn test_copy_is_independent() {
    let mut registry = KeymapRegistry::new();
    let (next, _) = logging_command("next");
    registry
        .bind(Mode::View, parse_sequence("g g").unwrap(), next)
        .unwrap();

    registry.copy(Mode::View, Mode::Caret);
    let (extra, _) = logging_command("caret only");
    registry
        .bind(Mode::Caret, parse_sequence("g c").unwrap(), extra)
        .unwrap();

    assert!(registry.command_at(Mode::Caret, &parse_sequence("g g").unwrap()).is_some());
    assert!(registry.command_at(Mode::Caret, &parse_sequence("g c").unwrap()).is_some());
    assert!(registry.command_at(Mode::View, &parse_sequence("g c").unwrap()).is_none());
}

#[test]
fn test_copy_keeps_existing_destination_entries() {
    let mut registry = KeymapRegistry::new();
    let (a, _) = logging_command("a");
    let (b, _) = logging_command("b");
    registry.bind(Mode::View, token("j"), a).unwrap();
    registry.bind(Mode::Caret, token("w"), b).unwrap();

    registry.copy(Mode::View, Mode::Caret);

    assert!(registry.command_at(Mode::Caret, &[token("j")]).is_some());
    assert!(registry.command_at(Mode::Caret, &[token("w")]).is_some());
}

#[test]
fn test_copy_from_undeclared_mode_is_noop() {
    let mut registry = KeymapRegistry::new();
    registry.copy(Mode::Menu, Mode::View);
    assert!(registry.is_empty());
}

#[test]
fn test_command_shadowed_by_longer_sequence() {
    let mut registry = KeymapRegistry::new();
    let (short, _) = logging_command("execute extended command");
    let (long, _) = logging_command("find file");
    registry.bind(Mode::Global, token("C-x"), short).unwrap();

    let overrides = registry
        .bind(Mode::Global, parse_sequence("C-x C-f").unwrap(), long)
        .unwrap();

    assert_eq!(
        overrides,
        vec![Override::CommandShadowed {
            keys: vec![token("C-x")],
            description: "execute extended command".to_string(),
        }]
    );
    assert!(registry.command_at(Mode::Global, &[token("C-x")]).is_none());
    assert!(registry
        .command_at(Mode::Global, &parse_sequence("C-x C-f").unwrap())
        .is_some());
}

#[test]
fn test_prefix_replaced_by_command() {
    let mut registry = KeymapRegistry::new();
    let (a, _) = logging_command("a");
    let (b, _) = logging_command("b");
    let (leaf, _) = logging_command("leaf");
    registry
        .bind(Mode::Global, parse_sequence("C-c a").unwrap(), a)
        .unwrap();
    registry
        .bind(Mode::Global, parse_sequence("C-c b").unwrap(), b)
        .unwrap();

    let overrides = registry.bind(Mode::Global, token("C-c"), leaf).unwrap();

    assert_eq!(
        overrides,
        vec![Override::PrefixReplaced {
            keys: vec![token("C-c")],
            bindings: 2,
        }]
    );
    assert!(registry.command_at(Mode::Global, &[token("C-c")]).is_some());
}

#[test]
fn test_rebinding_a_leaf_is_silent() {
    let mut registry = KeymapRegistry::new();
    let (a, _) = logging_command("a");
    let (b, _) = logging_command("b");
    registry.bind(Mode::Global, token("C-n"), a).unwrap();

    let overrides = registry.bind(Mode::Global, token("C-n"), b).unwrap();

    assert!(overrides.is_empty());
    let bound = registry.command_at(Mode::Global, &[token("C-n")]).unwrap();
    assert_eq!(bound.description(), "b");
}

#[test]
fn test_load_rejects_unknown_command_before_binding() {
    let file = parse_keymap_yaml(
        r#"
bindings:
  - keys: "C-n"
    command: next-line
  - keys: "C-p"
    command: no-such-command
"#,
    )
    .unwrap();

    let mut registry = KeymapRegistry::new();
    let result = registry.load(&file, &builtin_commands());

    assert_eq!(
        result,
        Err(KeymapError::InvalidCommand("no-such-command".to_string()))
    );
    assert!(registry.is_empty());
}

#[test]
fn test_loaded_file_drives_engine() {
    let file = parse_keymap_yaml(
        r#"
bindings:
  - mode: view
    keys: ["j", "C-n"]
    command: next-line
    description: Down a line
copy:
  - from: view
    to: caret
"#,
    )
    .unwrap();

    let mut engine = keyseq::Engine::new();
    engine.load_keymap(&file, &builtin_commands()).unwrap();

    let mut host = RecordingHost::new();
    host.caret = true;
    press(&mut engine, &mut host, "j C-n");
    assert_eq!(host.synthetic.len(), 2);

    let report = engine.list_key_bindings();
    let caret = report.section(Mode::Caret).unwrap();
    assert_eq!(caret.rows.len(), 2);
    assert!(caret.rows.iter().all(|row| row.description == "Down a line"));
}
