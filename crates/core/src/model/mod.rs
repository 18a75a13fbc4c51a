//! Core data model for disassembled binaries.
//!
//! A listing for one binary becomes a [`DisassemblyIndex`]: an insertion-ordered
//! map from function name to [`Function`], each holding its [`Instruction`]s in
//! disassembly order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One decoded instruction line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub address: u64,
    /// Space-separated hex byte pairs exactly as listed (e.g. `"48 89 e5"`).
    pub raw_bytes: String,
    /// Mnemonic token as emitted by the disassembler. Not case-normalized.
    pub mnemonic: String,
    /// The full trimmed listing line.
    pub source_line: String,
}

impl Instruction {
    /// Number of encoded bytes, counted as hex digit pairs.
    pub fn byte_len(&self) -> usize {
        self.raw_bytes.chars().filter(|c| !c.is_whitespace()).count() / 2
    }
}

/// A named function and its instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub address: u64,
    pub instructions: Vec<Instruction>,
}

impl Function {
    pub fn new(name: impl Into<String>, address: u64) -> Self {
        Self { name: name.into(), address, instructions: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// All functions found in one binary's listing.
///
/// Iteration order is the order in which each name first appeared. When a name
/// appears more than once the later body replaces the earlier one in place, and
/// the replaced body is kept in [`DisassemblyIndex::shadowed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisassemblyIndex {
    functions: IndexMap<String, Function>,
    shadowed: Vec<Function>,
}

impl DisassemblyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function. Returns `true` when an earlier body with the same
    /// name was replaced.
    pub fn insert(&mut self, function: Function) -> bool {
        match self.functions.insert(function.name.clone(), function) {
            Some(previous) => {
                self.shadowed.push(previous);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// First function (in index order) whose name contains `pattern`.
    ///
    /// This is deliberately not a best or exact match: with `main` as the
    /// pattern, `__libc_start_main` wins if it was listed before `main`.
    pub fn find_containing(&self, pattern: &str) -> Option<&Function> {
        self.functions.values().find(|f| f.name.contains(pattern))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    /// Bodies replaced by a later function with the same name, oldest first.
    pub fn shadowed(&self) -> &[Function] {
        &self.shadowed
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
