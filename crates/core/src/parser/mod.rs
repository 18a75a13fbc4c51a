//! Parser for objdump-style disassembly listings.
//!
//! Two line shapes matter:
//!
//! ```text
//! 0000000000001139 <check_license>:
//!     1139:	55                   	push   %rbp
//! ```
//!
//! Bytes are space-separated two-digit hex tokens, so a mnemonic spelled only
//! with hex letters (`add`, `dec`) is not mistaken for a byte even when a
//! single space separates it from the encoding. Everything else (section
//! banners, blank lines, padding, objdump's byte-only continuation lines) is
//! skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::model::{DisassemblyIndex, Function, Instruction};

static RE_FUNCTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9a-f]+) <([^>]+)>:").expect("valid function header regex"));

static RE_INSTRUCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+([0-9a-f]+):\s+((?:[0-9a-f]{2} )*[0-9a-f]{2})\s+(\S+)")
        .expect("valid instruction regex")
});

/// Parse a full listing for one binary into a [`DisassemblyIndex`].
///
/// Instruction lines seen before any function header are dropped. A header
/// with no instruction lines still yields an (empty) entry.
pub fn parse_disassembly(text: &str) -> DisassemblyIndex {
    let mut index = DisassemblyIndex::new();
    let mut current: Option<Function> = None;

    for line in text.lines() {
        if let Some(function) = parse_function_header(line) {
            if let Some(done) = current.replace(function) {
                flush(&mut index, done);
            }
            continue;
        }

        if let Some(function) = current.as_mut() {
            if let Some(instruction) = parse_instruction_line(line) {
                function.instructions.push(instruction);
            }
        }
    }

    if let Some(done) = current {
        flush(&mut index, done);
    }

    debug!(functions = index.len(), shadowed = index.shadowed().len(), "parsed disassembly");
    index
}

/// Recognize a `<hex-address> <name>:` header line.
pub fn parse_function_header(line: &str) -> Option<Function> {
    let caps = RE_FUNCTION_HEADER.captures(line)?;
    let address = u64::from_str_radix(&caps[1], 16).unwrap_or_default();
    Some(Function::new(&caps[2], address))
}

/// Recognize an indented `<hex-address>: <bytes> <mnemonic> ...` line.
pub fn parse_instruction_line(line: &str) -> Option<Instruction> {
    let caps = RE_INSTRUCTION.captures(line)?;
    // Long encodings wrap onto a line that holds only bytes.
    if is_byte_token(&caps[3]) {
        return None;
    }
    Some(Instruction {
        address: u64::from_str_radix(&caps[1], 16).unwrap_or_default(),
        raw_bytes: caps[2].trim().to_string(),
        mnemonic: caps[3].to_string(),
        source_line: line.trim().to_string(),
    })
}

fn is_byte_token(token: &str) -> bool {
    token.len() == 2 && token.bytes().all(|b| b.is_ascii_hexdigit())
}

fn flush(index: &mut DisassemblyIndex, function: Function) {
    let name = function.name.clone();
    if index.insert(function) {
        warn!(function = %name, "duplicate function name in listing; keeping the later body");
    }
}
