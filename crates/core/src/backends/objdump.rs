use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use super::{BackendError, DisassemblyBackend};
use crate::config::ObjdumpConfig;

/// Backend that shells out to objdump and returns its stdout.
#[derive(Debug, Clone)]
pub struct ObjdumpBackend {
    path: Option<PathBuf>,
    args: Vec<String>,
}

impl ObjdumpBackend {
    pub fn new(path: Option<PathBuf>, args: Vec<String>) -> Self {
        Self { path, args }
    }

    pub fn from_config(config: &ObjdumpConfig) -> Self {
        Self::new(config.path.clone(), config.args.clone())
    }

    /// Tool to run: explicit path, then `$OBJDUMP_BIN`, then `objdump`.
    pub fn tool_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(resolve_objdump_path)
    }
}

impl Default for ObjdumpBackend {
    fn default() -> Self {
        Self::from_config(&ObjdumpConfig::default())
    }
}

impl DisassemblyBackend for ObjdumpBackend {
    fn name(&self) -> &'static str {
        "objdump"
    }

    fn disassemble(&self, binary: &Path) -> Result<String, BackendError> {
        let tool = self.tool_path();
        debug!(tool = %tool.display(), binary = %binary.display(), "running objdump");

        let output = Command::new(&tool).args(&self.args).arg(binary).output().map_err(|e| {
            BackendError::Spawn { tool: tool.display().to_string(), source: e }
        })?;

        // Whatever was printed is still parsed; a failing tool just yields an
        // empty or partial index.
        if !output.status.success() {
            warn!(
                tool = %tool.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "objdump exited unsuccessfully"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn resolve_objdump_path() -> PathBuf {
    std::env::var_os("OBJDUMP_BIN").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("objdump"))
}
