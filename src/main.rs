// SPDX-License-Identifier: MIT
//
// n-keys — terminal key-sequence diagnostics.
//
// This is the main binary that wires the library crates into a small
// command-line tool:
//
//   n-trie   → byte-keyed prefix tree (through n-keyseq)
//   n-keyseq → key codes, key names, default sequences, decoder
//
// Commands:
//
//   n-keys list [PREFIX]    every known sequence and its key name
//   n-keys decode NAME...   key names (`<Alt-Ctrl-F1>`, `ab<Up>`) to codes
//   n-keys encode CODE...   codes (decimal or 0x hex) to key names
//   n-keys match BYTES...   classify escaped bytes (`\e[1;5`) against the table
//   n-keys scan             decode raw bytes piped on stdin into key names
//
// Configuration comes from NKEYS_* environment variables, log filtering
// from RUST_LOG. Logs go to stderr so stdout stays parseable.

use std::env;
use std::io::{self, Read, Write};
use std::ops::ControlFlow;
use std::process;

use n_keyseq::{KeyCode, KeyError, Keyboard, KeyboardConfig, SequenceStore, codec};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: n-keys list [PREFIX] | decode NAME... | encode CODE... | match BYTES... | scan";

#[derive(Debug, Error)]
enum CliError {
    #[error("{USAGE}")]
    Usage,
    #[error("not a key code: `{0}`")]
    BadCode(String),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let stdout = io::stdout();
    let result = run(
        &args,
        KeyboardConfig::from_env(),
        io::stdin().lock(),
        &mut stdout.lock(),
    );

    if let Err(e) = result {
        eprintln!("n-keys: {e}");
        process::exit(if matches!(e, CliError::Usage) { 2 } else { 1 });
    }
}

fn run(
    args: &[String],
    config: KeyboardConfig,
    input: impl Read,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let (command, rest) = args.split_first().ok_or(CliError::Usage)?;
    let keyboard = Keyboard::new(config)?;
    tracing::debug!(command = command.as_str(), args = rest.len(), "dispatching");

    match command.as_str() {
        "list" => list(&keyboard, rest.first().map(String::as_str), out)?,
        "decode" => {
            for name in rest {
                for code in codec::decode_all(name) {
                    writeln!(out, "{:#010x}\t{code}", code.raw())?;
                }
            }
        }
        "encode" => {
            for arg in rest {
                let code = parse_code(arg).ok_or_else(|| CliError::BadCode(arg.clone()))?;
                writeln!(out, "{:#010x}\t{}", code.raw(), keyboard.name_of(code))?;
            }
        }
        "match" => {
            for arg in rest {
                let bytes = unescape(arg);
                let found = keyboard.match_prefix(&bytes);
                let name = |code: Option<KeyCode>| {
                    code.map_or_else(|| String::from("-"), |c| keyboard.name_of(c))
                };
                writeln!(
                    out,
                    "{}\t{:?}\t{}\t{}\t{}",
                    bytes.escape_ascii(),
                    found.outcome(),
                    name(found.code()),
                    found.ambiguous,
                    name(found.partial.map(|r| r.code())),
                )?;
            }
        }
        "scan" => scan(&keyboard, input, out)?,
        _ => return Err(CliError::Usage),
    }

    keyboard.shutdown();
    Ok(())
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// One line per stored sequence under `prefix`: escaped bytes, then name.
fn list(keyboard: &Keyboard<'_>, prefix: Option<&str>, out: &mut impl Write) -> io::Result<()> {
    let prefix = prefix.map(unescape).unwrap_or_default();
    let mut failed = None;
    let _ = keyboard.store().visit(&prefix, &mut |record| {
        let line = writeln!(
            out,
            "{}\t{}",
            record.bytes().escape_ascii(),
            keyboard.name_of(record.code())
        );
        match line {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                failed = Some(e);
                ControlFlow::Break(())
            }
        }
    });
    failed.map_or(Ok(()), Err)
}

/// Decode stdin as a terminal would deliver it, one key name per line.
fn scan(keyboard: &Keyboard<'_>, mut input: impl Read, out: &mut impl Write) -> io::Result<()> {
    let mut decoder = Keyboard::decoder();
    let mut buf = [0u8; 4096];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        for code in keyboard.feed(&mut decoder, &buf[..n]) {
            writeln!(out, "{}", keyboard.name_of(code))?;
        }
    }
    // End of input: nothing more can arrive to extend a pending prefix.
    for code in decoder.flush(keyboard.store()) {
        writeln!(out, "{}", keyboard.name_of(code))?;
    }
    Ok(())
}

// ─── Argument parsing ───────────────────────────────────────────────────────

/// A raw key code, decimal or `0x` hex.
fn parse_code(arg: &str) -> Option<KeyCode> {
    let raw = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => arg.parse().ok()?,
    };
    KeyCode::from_raw(raw)
}

/// Shell-friendly byte escapes: `\e` (ESC), `\xNN`, `\n`, `\r`, `\t`, `\\`.
/// Anything else is taken literally.
fn unescape(arg: &str) -> Vec<u8> {
    let bytes = arg.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let (byte, len) = match bytes[i + 1] {
            b'e' | b'E' => (0x1b, 2),
            b'n' => (b'\n', 2),
            b'r' => (b'\r', 2),
            b't' => (b'\t', 2),
            b'\\' => (b'\\', 2),
            b'x' => match arg.get(i + 2..i + 4).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                Some(byte) => (byte, 4),
                None => (b'\\', 1),
            },
            _ => (b'\\', 1),
        };
        out.push(byte);
        i += len;
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────
