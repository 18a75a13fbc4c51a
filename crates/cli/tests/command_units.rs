use std::fs;

use obfmeter::commands::{analyze_command, build_config, ensure_binary_exists, AnalyzeOptions};
use tempfile::tempdir;

#[test]
fn ensure_binary_exists_names_the_side() {
    let temp = tempdir().unwrap();
    let err = ensure_binary_exists(&temp.path().join("gone"), "Obfuscated").unwrap_err();
    assert!(err.to_string().starts_with("Obfuscated binary not found:"), "{err}");
    ensure_binary_exists(temp.path(), "Normal").unwrap();
}

#[test]
fn build_config_applies_overrides() {
    let options = AnalyzeOptions {
        functions: Some(vec![" vm_entry ".into(), "".into(), "main".into()]),
        backend: Some("listing".into()),
        ..Default::default()
    };
    let config = build_config(&options).unwrap();
    assert_eq!(config.function_names, vec!["vm_entry".to_string(), "main".to_string()]);
    assert_eq!(config.backend, "listing");
}

#[test]
fn build_config_rejects_blank_function_list() {
    let options = AnalyzeOptions { functions: Some(vec![" ".into()]), ..Default::default() };
    let err = build_config(&options).unwrap_err();
    assert!(format!("{err:#}").contains("no function names"), "{err:#}");
}

#[test]
fn build_config_reports_bad_config_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("obfmeter.json");
    fs::write(&path, "not-json").unwrap();
    let options = AnalyzeOptions { config: Some(path), ..Default::default() };
    let err = build_config(&options).unwrap_err();
    assert!(err.to_string().contains("Failed to load config"), "{err}");
}

#[test]
fn analyze_command_runs_with_listing_backend() {
    let temp = tempdir().unwrap();
    let normal = temp.path().join("normal");
    let obf = temp.path().join("obf");
    fs::write(&normal, b"abc").unwrap();
    fs::write(&obf, b"abcdef").unwrap();
    fs::write(temp.path().join("normal.lst"), "0000000000000000 <main>:\n    0:\tc3\tret\n")
        .unwrap();
    fs::write(
        temp.path().join("obf.lst"),
        "0000000000000000 <main>:\n    0:\t90\tnop\n    1:\tc3\tret\n",
    )
    .unwrap();

    let options = AnalyzeOptions { backend: Some("listing".into()), ..Default::default() };
    analyze_command(&normal, &obf, &options).unwrap();

    let json = AnalyzeOptions { json: true, ..options };
    analyze_command(&normal, &obf, &json).unwrap();
}

#[test]
fn analyze_command_surfaces_backend_errors() {
    let temp = tempdir().unwrap();
    let normal = temp.path().join("normal");
    let obf = temp.path().join("obf");
    fs::write(&normal, b"abc").unwrap();
    fs::write(&obf, b"abc").unwrap();

    // No sidecar listings exist.
    let options = AnalyzeOptions { backend: Some("listing".into()), ..Default::default() };
    let err = analyze_command(&normal, &obf, &options).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read"), "{err:#}");
}
