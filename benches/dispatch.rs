//! Benchmarks for the per-keystroke path
//!
//! - token normalization and parsing
//! - trie lookup through the dispatcher (single keys and sequences)
//! - prefix argument parsing
//! - loading the default keymap
//!
//! Run with: cargo bench dispatch

use std::time::Duration;

use keyseq::keymap::{
    builtin_commands, default_keymap, parse_prefix_argument, parse_sequence, BindingReport,
    Engine, Host, KeyEvent, KeyToken,
};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Host that accepts everything and does nothing
struct NullHost;

impl Host for NullHost {
    fn is_writable(&self) -> bool {
        false
    }
    fn is_caret_browsing(&self) -> bool {
        false
    }
    fn suppress_default_action(&mut self, _event: &KeyEvent) {}
    fn notify(&mut self, _text: &str, _duration: Option<Duration>) {}
    fn run_hook(&mut self, _name: &str, _event: &KeyEvent) {}
    fn insert_repeated(&mut self, _text: &str, _count: usize) {}
    fn dispatch_synthetic(&mut self, _event: &KeyEvent, _suppress_reentry: bool) {}
    fn show_help(&mut self, _report: &BindingReport) {}
}

fn loaded_engine() -> Engine {
    let mut engine = Engine::new();
    engine
        .load_keymap(&default_keymap(), &builtin_commands())
        .unwrap();
    engine
}

fn events(keys: &str) -> Vec<KeyEvent> {
    parse_sequence(keys)
        .unwrap()
        .iter()
        .map(KeyEvent::from_token)
        .collect()
}

// ============================================================================
// Normalization
// ============================================================================

#[divan::bench]
fn to_token_control_char() -> KeyToken {
    divan::black_box(KeyEvent::from_token(&KeyToken::parse("C-M-x").unwrap())).to_token()
}

#[divan::bench(args = ["C-x", "C-M-<f12>", "SPC", "M--"])]
fn parse_token(token: &str) -> KeyToken {
    KeyToken::parse(divan::black_box(token)).unwrap()
}

#[divan::bench]
fn parse_long_sequence() -> Vec<KeyToken> {
    parse_sequence(divan::black_box("C-x r t C-c C-v C-M-<f1> SPC g g")).unwrap()
}

// ============================================================================
// Dispatch
// ============================================================================

#[divan::bench(args = ["C-n", "g g", "C-u C-u C-n", "x"])]
fn dispatch_keys(bencher: divan::Bencher, keys: &str) {
    let keys = events(keys);
    bencher
        .with_inputs(loaded_engine)
        .bench_local_values(|mut engine| {
            let mut host = NullHost;
            for event in &keys {
                divan::black_box(engine.handle_event(&mut host, event));
            }
        });
}

#[divan::bench]
fn dispatch_steady_state(bencher: divan::Bencher) {
    let mut engine = loaded_engine();
    let mut host = NullHost;
    let key = KeyEvent::from_token(&KeyToken::parse("C-n").unwrap());

    bencher.bench_local(|| engine.handle_event(&mut host, divan::black_box(&key)));
}

// ============================================================================
// Prefix arguments and loading
// ============================================================================

#[divan::bench(args = [1, 8, 32])]
fn parse_prefix_digits(bencher: divan::Bencher, digits: usize) {
    let mut keys = vec![KeyToken::parse("C-u").unwrap()];
    keys.extend(std::iter::repeat(KeyToken::parse("7").unwrap()).take(digits));

    bencher.bench(|| parse_prefix_argument(divan::black_box(&keys)));
}

#[divan::bench]
fn load_default_keymap_into_engine(bencher: divan::Bencher) {
    bencher.bench_local(loaded_engine);
}

#[divan::bench]
fn list_all_bindings(bencher: divan::Bencher) {
    let engine = loaded_engine();
    bencher.bench_local(|| engine.list_key_bindings().row_count());
}
