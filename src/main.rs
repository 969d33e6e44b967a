use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};

use keyseq::cli::{CliArgs, CliCommand};
use keyseq::console::ConsoleHost;
use keyseq::keymap::{
    builtin_commands, load_default_keymap, load_keymap_file, parse_sequence, BindingReport,
    Engine, KeyEvent, Mode,
};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keyseq::tracing::init(args.verbose);

    let mut engine = match args.config_path() {
        Some(path) => Engine::with_preferences(path),
        None => Engine::new(),
    };

    let keymap = match &args.keymap {
        Some(path) => load_keymap_file(path)
            .with_context(|| format!("loading keymap {}", path.display()))?,
        None => load_default_keymap(),
    };
    for notice in engine.load_keymap(&keymap, &builtin_commands())? {
        tracing::warn!("{}", notice);
    }

    let stdout = io::stdout();
    let mut host = ConsoleHost::new(stdout.lock(), args.writable, args.caret);

    match args.command {
        CliCommand::Play { keys } => {
            for key in &keys {
                let event: KeyEvent = key
                    .parse()
                    .with_context(|| format!("invalid key {:?}", key))?;
                let action = engine.handle_event(&mut host, &event);
                host.action(key, action);
            }
        }
        CliCommand::List { mode, prefix, json } => {
            let mut report = match prefix.as_deref() {
                Some(prefix) => engine.bindings_starting_with(&parse_sequence(prefix)?),
                None => engine.list_key_bindings(),
            };
            if let Some(mode) = mode {
                let mode: Mode = mode.parse()?;
                report.sections.retain(|section| section.mode == mode);
            }
            print_report(host.into_inner(), &report, json)?;
        }
        CliCommand::Enable => {
            engine.start();
            print_status(&engine);
        }
        CliCommand::Disable => {
            engine.stop();
            print_status(&engine);
        }
        CliCommand::Toggle => {
            engine.toggle_status(&mut host);
            print_status(&engine);
        }
        CliCommand::Status => print_status(&engine),
    }

    Ok(())
}

fn print_report(mut out: impl Write, report: &BindingReport, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", report)?;
    }
    Ok(())
}

fn print_status(engine: &Engine) {
    let state = if engine.is_enabled() { "enabled" } else { "disabled" };
    let registry = engine.registry();
    let bindings: usize = registry
        .modes()
        .filter_map(|mode| registry.root(mode))
        .map(|map| map.binding_count())
        .sum();
    println!("keyseq is {} ({} bindings loaded)", state, bindings);
}
