use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use obfmeter_core::backends::default_backend_registry;
use obfmeter_core::config::AnalyzerConfig;
use obfmeter_core::services::{compare_binaries, ComparisonReport};

use crate::sha256_file;

/// Flags that shape a comparison run, on top of the two binary paths.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// JSON or YAML config file.
    pub config: Option<PathBuf>,
    /// Overrides the configured function names.
    pub functions: Option<Vec<String>>,
    /// Overrides the configured backend.
    pub backend: Option<String>,
    /// Emit JSON instead of the text report.
    pub json: bool,
}

/// JSON document printed by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool_version: &'static str,
    pub generated_at: String,
    pub normal_sha256: String,
    pub obfuscated_sha256: String,
    #[serde(flatten)]
    pub report: &'a ComparisonReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a ComparisonReport) -> Result<Self> {
        Ok(Self {
            tool_version: obfmeter_core::version(),
            generated_at: Utc::now().to_rfc3339(),
            normal_sha256: sha256_file(&report.normal_path)?,
            obfuscated_sha256: sha256_file(&report.obfuscated_path)?,
            report,
        })
    }
}

/// Fail with a message naming which side is missing.
pub fn ensure_binary_exists(path: &Path, side: &str) -> Result<()> {
    if !path.exists() {
        bail!("{side} binary not found: {}", path.display());
    }
    Ok(())
}

/// Merge the config file (if any) with command-line overrides.
pub fn build_config(options: &AnalyzeOptions) -> Result<AnalyzerConfig> {
    let mut config = match &options.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if let Some(functions) = &options.functions {
        let names: Vec<String> = functions
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        config = config.with_function_names(names);
    }
    if let Some(backend) = &options.backend {
        config = config.with_backend(backend.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Compare `normal` against `obfuscated` and print the report to stdout.
pub fn analyze_command(normal: &Path, obfuscated: &Path, options: &AnalyzeOptions) -> Result<()> {
    ensure_binary_exists(normal, "Normal")?;
    ensure_binary_exists(obfuscated, "Obfuscated")?;

    let config = build_config(options)?;
    debug!(backend = %config.backend, functions = ?config.function_names, "resolved configuration");

    let registry = default_backend_registry(&config);
    let backend = registry.resolve(&config.backend)?;

    let report = compare_binaries(normal, obfuscated, backend, &config)
        .context("Failed to compare binaries")?;

    if options.json {
        let doc = JsonReport::new(&report)?;
        let serialized =
            serde_json::to_string_pretty(&doc).context("Failed to serialize report to JSON")?;
        println!("{}", serialized);
    } else {
        println!("{report}");
    }

    Ok(())
}
