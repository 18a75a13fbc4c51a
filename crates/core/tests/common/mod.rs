#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use obfmeter_core::backends::{BackendError, DisassemblyBackend};

/// Render an objdump-style listing: one header per function followed by
/// `(bytes, mnemonic)` instruction lines.
pub fn listing(functions: &[(&str, &[(&str, &str)])]) -> String {
    let mut out = String::from("\nfixture:     file format elf64-x86-64\n\n\n");
    out.push_str("Disassembly of section .text:\n");
    let mut addr = 0x1000u64;
    for (name, insns) in functions {
        out.push_str(&format!("\n{addr:016x} <{name}>:\n"));
        for (bytes, mnemonic) in insns.iter() {
            out.push_str(&format!("    {addr:x}:\t{bytes:<21}\t{mnemonic}\n"));
            addr += bytes.split_whitespace().count() as u64;
        }
    }
    out
}

/// Backend serving fixed text per binary path.
#[derive(Default)]
pub struct FakeBackend {
    listings: HashMap<PathBuf, String>,
}

impl FakeBackend {
    pub fn with(mut self, binary: &Path, text: impl Into<String>) -> Self {
        self.listings.insert(binary.to_path_buf(), text.into());
        self
    }
}

impl DisassemblyBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn disassemble(&self, binary: &Path) -> Result<String, BackendError> {
        Ok(self.listings.get(binary).cloned().unwrap_or_default())
    }
}

/// Write a dummy binary of `size` bytes and return its path.
pub fn write_binary(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0u8; size]).unwrap();
    path
}
