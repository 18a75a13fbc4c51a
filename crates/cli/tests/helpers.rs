use obfmeter::sha256_file;
use tempfile::tempdir;

#[test]
fn sha256_file_matches_known_digest() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("abc");
    std::fs::write(&path, b"abc").unwrap();
    assert_eq!(
        sha256_file(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_file_reports_missing_file() {
    let temp = tempdir().unwrap();
    let err = sha256_file(&temp.path().join("missing")).unwrap_err();
    assert!(err.to_string().contains("Failed to open binary for hashing"));
}
