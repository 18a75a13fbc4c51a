use std::fs;
use std::path::Path;

use capstone::{arch, prelude::*, Capstone};
use goblin::{elf, Object};
use tracing::debug;

use super::{BackendError, DisassemblyBackend};

/// In-process backend: walks ELF function symbols and disassembles each one
/// with Capstone, printing objdump-shaped lines.
///
/// Mnemonics come out in Intel syntax (`call`, `mov`), so they line up with the
/// mnemonic classes without AT&T size suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapstoneBackend;

#[derive(Debug, Clone)]
struct SymbolInfo {
    name: String,
    address: u64,
    file_range: (usize, usize),
}

fn make_cs(machine: u16) -> Result<Capstone, BackendError> {
    let built = match machine {
        elf::header::EM_X86_64 => Capstone::new().x86().mode(arch::x86::ArchMode::Mode64).build(),
        elf::header::EM_386 => Capstone::new().x86().mode(arch::x86::ArchMode::Mode32).build(),
        elf::header::EM_AARCH64 => {
            Capstone::new().arm64().mode(arch::arm64::ArchMode::Arm).build()
        }
        other => {
            return Err(BackendError::Unsupported(format!("ELF machine type {other}")));
        }
    };
    built.map_err(|e| BackendError::Disassembly(format!("capstone init failed: {e}")))
}

/// File byte range backing `[addr, addr + size)` inside a section, clamped to
/// the section and the file. Header values come from the binary, so every sum
/// is checked.
fn section_range_to_file(
    addr: u64,
    size: Option<u64>,
    sec_addr: u64,
    sec_size: u64,
    sec_offset: u64,
    file_len: usize,
) -> Option<(usize, usize)> {
    let sec_end = sec_addr.checked_add(sec_size)?;
    if !(sec_addr..sec_end).contains(&addr) {
        return None;
    }
    let offset_in_section = addr - sec_addr;
    let available = sec_size - offset_in_section;
    let length = size.map_or(available, |s| s.min(available));

    let file_len = file_len as u64;
    let start = sec_offset.checked_add(offset_in_section)?;
    if start >= file_len {
        return None;
    }
    let end = start.saturating_add(length).min(file_len);
    (end > start).then(|| (start as usize, end as usize))
}

fn elf_symbols(elf: &elf::Elf, bytes_len: usize) -> Vec<SymbolInfo> {
    let mut symbols = Vec::new();
    for sym in &elf.syms {
        if !sym.is_function() || sym.st_shndx == elf::section_header::SHN_UNDEF as usize {
            continue;
        }
        let name = elf.strtab.get_at(sym.st_name).unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }
        let size = if sym.st_size > 0 { Some(sym.st_size) } else { None };
        let file_range = elf.section_headers.get(sym.st_shndx).and_then(|shdr| {
            section_range_to_file(
                sym.st_value,
                size,
                shdr.sh_addr,
                shdr.sh_size,
                shdr.sh_offset,
                bytes_len,
            )
        });
        if let Some(file_range) = file_range {
            symbols.push(SymbolInfo { name, address: sym.st_value, file_range });
        }
    }
    symbols.sort_by(|a, b| a.address.cmp(&b.address).then_with(|| a.name.cmp(&b.name)));
    symbols
}

fn render_function(cs: &Capstone, sym: &SymbolInfo, code: &[u8], out: &mut String) {
    out.push_str(&format!("\n{:016x} <{}>:\n", sym.address, sym.name));
    let insns = match cs.disasm_all(code, sym.address) {
        Ok(insns) => insns,
        Err(e) => {
            debug!(function = %sym.name, error = %e, "capstone could not decode function");
            return;
        }
    };
    for insn in insns.iter() {
        let hex: Vec<String> = insn.bytes().iter().map(|b| format!("{b:02x}")).collect();
        let mnemonic = insn.mnemonic().unwrap_or("");
        let operands = insn.op_str().unwrap_or("");
        let line = format!("  {:x}:\t{}\t{} {}", insn.address(), hex.join(" "), mnemonic, operands);
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

impl DisassemblyBackend for CapstoneBackend {
    fn name(&self) -> &'static str {
        "capstone"
    }

    fn disassemble(&self, binary: &Path) -> Result<String, BackendError> {
        let bytes =
            fs::read(binary).map_err(|source| BackendError::Io { path: binary.into(), source })?;

        let elf = match Object::parse(&bytes) {
            Ok(Object::Elf(elf)) => elf,
            Ok(_) => {
                return Err(BackendError::Unsupported(format!(
                    "{} is not an ELF file",
                    binary.display()
                )))
            }
            Err(e) => return Err(BackendError::Unsupported(format!("{}: {e}", binary.display()))),
        };

        let cs = make_cs(elf.header.e_machine)?;
        let symbols = elf_symbols(&elf, bytes.len());
        debug!(binary = %binary.display(), symbols = symbols.len(), "capstone symbols");

        let mut out = format!("\n{}:     file format elf\n\n", binary.display());
        for sym in &symbols {
            let (start, end) = sym.file_range;
            render_function(&cs, sym, &bytes[start..end], &mut out);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_outside_section_is_rejected() {
        assert_eq!(section_range_to_file(0x10, Some(4), 0x20, 0x10, 0x100, 0x1000), None);
    }

    #[test]
    fn range_is_clamped_to_section_and_file() {
        assert_eq!(
            section_range_to_file(0x24, None, 0x20, 0x10, 0x100, 0x1000),
            Some((0x104, 0x110))
        );
        assert_eq!(
            section_range_to_file(0x24, Some(64), 0x20, 0x10, 0x100, 0x108),
            Some((0x104, 0x108))
        );
    }

    #[test]
    fn overflowing_header_values_are_rejected() {
        assert_eq!(section_range_to_file(u64::MAX - 1, Some(4), u64::MAX - 2, 16, 0, 0x1000), None);
        assert_eq!(section_range_to_file(0x24, Some(4), 0x20, 0x10, u64::MAX - 1, 0x1000), None);
    }
}
