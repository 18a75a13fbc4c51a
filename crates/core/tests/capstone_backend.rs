#![cfg(feature = "capstone-backend")]

use object::write::{Object, Symbol, SymbolSection};
use object::{
    Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope,
};
use obfmeter_core::backends::{BackendError, CapstoneBackend, DisassemblyBackend};
use obfmeter_core::parser::parse_disassembly;

fn add_function(
    obj: &mut Object<'_>,
    section: object::write::SectionId,
    name: &str,
    value: u64,
    size: u64,
) {
    obj.add_symbol(Symbol {
        name: name.as_bytes().to_vec(),
        value,
        size,
        kind: SymbolKind::Text,
        scope: SymbolScope::Linkage,
        weak: false,
        section: SymbolSection::Section(section),
        flags: SymbolFlags::Elf { st_info: 0x12, st_other: 0 },
    });
}

#[test]
fn capstone_listing_round_trips_through_parser() {
    let temp = tempfile::tempdir().unwrap();
    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);
    let text_id = obj.add_section(Vec::new(), b".text".to_vec(), SectionKind::Text);

    // check_license: push rbp; mov rbp, rsp; pop rbp; ret
    obj.section_mut(text_id).append_data(&[0x55, 0x48, 0x89, 0xe5, 0x5d, 0xc3], 1);
    // main: xor eax, eax; ret
    obj.section_mut(text_id).append_data(&[0x31, 0xc0, 0xc3], 1);

    add_function(&mut obj, text_id, "check_license", 0, 6);
    add_function(&mut obj, text_id, "main", 6, 3);

    let bin_path = temp.path().join("fixture_elf");
    std::fs::write(&bin_path, obj.write().unwrap()).unwrap();

    let text = CapstoneBackend.disassemble(&bin_path).expect("disassemble elf");
    let index = parse_disassembly(&text);

    let names: Vec<&str> = index.names().collect();
    assert_eq!(names, vec!["check_license", "main"]);

    let check = index.get("check_license").unwrap();
    let mnemonics: Vec<&str> = check.instructions.iter().map(|i| i.mnemonic.as_str()).collect();
    assert_eq!(mnemonics, vec!["push", "mov", "pop", "ret"]);
    assert_eq!(check.instructions[1].raw_bytes, "48 89 e5");

    let main = index.get("main").unwrap();
    assert_eq!(main.address, 6);
    assert_eq!(main.instructions.len(), 2);
}

#[test]
fn capstone_rejects_non_elf_input() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("not_elf");
    std::fs::write(&path, b"plain text, not an object file").unwrap();
    let err = CapstoneBackend.disassemble(&path).unwrap_err();
    assert!(matches!(err, BackendError::Unsupported(_)), "{err:?}");
}
