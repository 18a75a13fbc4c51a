//! Disassembler backends.
//!
//! The comparison only needs "given a binary path, return listing text". Each
//! backend produces objdump-shaped text so the same parser handles all of
//! them:
//! - `objdump`: shells out to GNU objdump (or a compatible tool).
//! - `listing`: reads a pre-generated listing stored next to the binary.
//! - `capstone`: disassembles ELF function symbols in-process.

#[cfg(feature = "capstone-backend")]
pub mod capstone;
pub mod listing;
pub mod objdump;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AnalyzerConfig;

#[cfg(feature = "capstone-backend")]
pub use capstone::CapstoneBackend;
pub use listing::ListingBackend;
pub use objdump::ObjdumpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported binary: {0}")]
    Unsupported(String),
    #[error("Disassembly failed: {0}")]
    Disassembly(String),
    #[error("Unknown backend '{name}' (available: {available})")]
    Unknown { name: String, available: String },
}

/// A source of disassembly text for a binary.
pub trait DisassemblyBackend: Send + Sync {
    /// Returns a human-readable name for the backend.
    fn name(&self) -> &'static str;

    /// Produce an objdump-shaped listing for `binary`.
    fn disassemble(&self, binary: &Path) -> Result<String, BackendError>;
}

/// Registry for disassembly backends; callers select by name.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Box<dyn DisassemblyBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self { backends: HashMap::new() }
    }

    pub fn register<B: DisassemblyBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends.insert(backend.name().to_string(), Box::new(backend));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn DisassemblyBackend> {
        self.backends.get(name).map(|b| &**b)
    }

    /// Like [`BackendRegistry::get`], but reports the available names on a miss.
    pub fn resolve(&self, name: &str) -> Result<&dyn DisassemblyBackend, BackendError> {
        self.get(name).ok_or_else(|| BackendError::Unknown {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    /// Return a sorted list of registered backend names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.backends.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Registry populated with every backend compiled into this build, configured
/// from `config`.
pub fn default_backend_registry(config: &AnalyzerConfig) -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(ObjdumpBackend::from_config(&config.objdump));
    registry.register(ListingBackend::new(config.listing.extension.clone()));
    #[cfg(feature = "capstone-backend")]
    {
        registry.register(CapstoneBackend);
    }
    registry
}
