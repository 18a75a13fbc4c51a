//! Per-function instruction metrics.
//!
//! Given one function's instructions, [`analyze_function`] produces a
//! [`FunctionMetrics`] record: counts, a coarse mnemonic classification, and
//! the entropy of the mnemonic distribution.

pub mod entropy;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Instruction;

pub use entropy::shannon_entropy;

const BRANCH_MNEMONICS: &[&str] = &[
    "je", "jne", "jg", "jge", "jl", "jle", "ja", "jae", "jb", "jbe", "jmp", "jo", "jno", "js",
    "jns", "jz", "jnz",
];
const CALL_PREFIX: &str = "call";
const ARITHMETIC_MNEMONICS: &[&str] =
    &["add", "sub", "mul", "imul", "div", "idiv", "inc", "dec", "neg"];
const BITWISE_MNEMONICS: &[&str] =
    &["and", "or", "xor", "not", "shl", "shr", "sar", "sal", "rol", "ror"];
const MEMORY_MNEMONICS: &[&str] = &["mov", "movzx", "movsx", "lea", "push", "pop"];

/// Coarse instruction category. Every mnemonic falls into at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MnemonicClass {
    Branch,
    Call,
    Arithmetic,
    Bitwise,
    Memory,
}

impl MnemonicClass {
    /// Classify a lower-cased mnemonic. First match wins in the order
    /// branch, call, arithmetic, bitwise, memory.
    pub fn classify(mnemonic: &str) -> Option<Self> {
        if BRANCH_MNEMONICS.contains(&mnemonic) {
            Some(Self::Branch)
        } else if mnemonic.starts_with(CALL_PREFIX) {
            Some(Self::Call)
        } else if ARITHMETIC_MNEMONICS.contains(&mnemonic) {
            Some(Self::Arithmetic)
        } else if BITWISE_MNEMONICS.contains(&mnemonic) {
            Some(Self::Bitwise)
        } else if MEMORY_MNEMONICS.contains(&mnemonic) {
            Some(Self::Memory)
        } else {
            None
        }
    }
}

/// Metrics derived from a single function's instruction sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub instruction_count: usize,
    pub unique_mnemonics: usize,
    pub byte_count: usize,
    pub branch_count: usize,
    pub call_count: usize,
    pub arithmetic_count: usize,
    pub bitwise_count: usize,
    pub memory_count: usize,
    pub mnemonic_entropy: f64,
}

impl FunctionMetrics {
    /// Sum of all classified buckets; never exceeds `instruction_count`.
    pub fn classified_count(&self) -> usize {
        self.branch_count
            + self.call_count
            + self.arithmetic_count
            + self.bitwise_count
            + self.memory_count
    }
}

/// Compute metrics for one function.
///
/// Returns `None` for an empty instruction list so callers can tell "nothing to
/// measure" apart from a record of zeros.
pub fn analyze_function(instructions: &[Instruction]) -> Option<FunctionMetrics> {
    if instructions.is_empty() {
        return None;
    }

    let mut metrics =
        FunctionMetrics { instruction_count: instructions.len(), ..Default::default() };
    let mut mnemonics = Vec::with_capacity(instructions.len());

    for insn in instructions {
        let mnemonic = insn.mnemonic.to_lowercase();
        metrics.byte_count += insn.byte_len();

        match MnemonicClass::classify(&mnemonic) {
            Some(MnemonicClass::Branch) => metrics.branch_count += 1,
            Some(MnemonicClass::Call) => metrics.call_count += 1,
            Some(MnemonicClass::Arithmetic) => metrics.arithmetic_count += 1,
            Some(MnemonicClass::Bitwise) => metrics.bitwise_count += 1,
            Some(MnemonicClass::Memory) => metrics.memory_count += 1,
            None => {}
        }

        mnemonics.push(mnemonic);
    }

    metrics.unique_mnemonics = mnemonics.iter().collect::<HashSet<_>>().len();
    metrics.mnemonic_entropy = shannon_entropy(&mnemonics);

    Some(metrics)
}
