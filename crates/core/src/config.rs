//! Analyzer configuration.
//!
//! Everything the comparison needs to know besides the two binaries lives here
//! so the tool can be retargeted without code changes. Configs are read from
//! JSON (`.json`) or YAML (`.yaml`/`.yml`); any field left out falls back to
//! the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Function names compared when no configuration overrides them.
pub const DEFAULT_FUNCTION_NAMES: &[&str] = &[
    "simple_hash",
    "check_license",
    "process_command",
    "fibonacci",
    "state_machine",
    "encrypt_round",
    "xor_cipher",
    "main",
];

/// Backend used when none is named in config or on the command line.
pub const DEFAULT_BACKEND: &str = "objdump";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported config format for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
    #[error("Config lists no function names")]
    Empty,
}

/// Settings for the `objdump` backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjdumpConfig {
    /// Explicit tool path. Falls back to `$OBJDUMP_BIN`, then `objdump` on PATH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Arguments placed before the binary path.
    pub args: Vec<String>,
}

impl Default for ObjdumpConfig {
    fn default() -> Self {
        Self { path: None, args: vec!["-d".to_string()] }
    }
}

/// Settings for the `listing` backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Sidecar extension; `app` is read from `app.<extension>`.
    pub extension: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { extension: "lst".to_string() }
    }
}

/// Serializable configuration for one comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Ordered substring patterns selecting the functions of interest.
    pub function_names: Vec<String>,
    /// Disassembler backend name (see `backends::default_backend_registry`).
    pub backend: String,
    pub objdump: ObjdumpConfig,
    pub listing: ListingConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            function_names: DEFAULT_FUNCTION_NAMES.iter().map(|s| s.to_string()).collect(),
            backend: DEFAULT_BACKEND.to_string(),
            objdump: ObjdumpConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load a config file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        let config: Self = match ext.as_deref() {
            Some("json") => serde_json::from_str(&body)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&body)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the function list, e.g. from a `--functions a,b,c` flag.
    pub fn with_function_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.function_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.function_names.iter().all(|n| n.trim().is_empty()) {
            return Err(ConfigError::Empty);
        }
        Ok(())
    }
}
