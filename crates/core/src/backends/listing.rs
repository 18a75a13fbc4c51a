use std::fs;
use std::path::{Path, PathBuf};

use super::{BackendError, DisassemblyBackend};

/// Backend that reads a listing saved beside the binary (`<binary>.<ext>`).
///
/// Handy for comparing builds on a machine without the disassembler, and for
/// tests that need fixed disassembly text.
#[derive(Debug, Clone)]
pub struct ListingBackend {
    extension: String,
}

impl ListingBackend {
    pub fn new(extension: impl Into<String>) -> Self {
        Self { extension: extension.into() }
    }

    /// Path of the sidecar listing for `binary`.
    pub fn sidecar_path(&self, binary: &Path) -> PathBuf {
        let mut name = binary.as_os_str().to_os_string();
        name.push(".");
        name.push(&self.extension);
        PathBuf::from(name)
    }
}

impl Default for ListingBackend {
    fn default() -> Self {
        Self::new("lst")
    }
}

impl DisassemblyBackend for ListingBackend {
    fn name(&self) -> &'static str {
        "listing"
    }

    fn disassemble(&self, binary: &Path) -> Result<String, BackendError> {
        let path = self.sidecar_path(binary);
        fs::read_to_string(&path).map_err(|source| BackendError::Io { path, source })
    }
}
