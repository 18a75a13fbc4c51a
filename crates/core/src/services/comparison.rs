use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::{analyze_function, FunctionMetrics};
use crate::backends::{BackendError, DisassemblyBackend};
use crate::config::AnalyzerConfig;
use crate::model::DisassemblyIndex;
use crate::parser::parse_disassembly;

/// Upper bound of the quality score. There is no lower bound: a negative score
/// means the obfuscated functions got smaller.
pub const MAX_QUALITY_SCORE: f64 = 100.0;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Failed to read metadata for {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// On-disk sizes of both binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeComparison {
    pub normal: u64,
    pub obfuscated: u64,
    pub delta: i64,
    /// `None` when the normal binary is empty.
    pub percent: Option<f64>,
}

impl SizeComparison {
    pub fn new(normal: u64, obfuscated: u64) -> Self {
        let delta = obfuscated as i64 - normal as i64;
        let percent = if normal == 0 { None } else { Some(delta as f64 * 100.0 / normal as f64) };
        Self { normal, obfuscated, delta, percent }
    }
}

/// Running totals for one side of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonTotals {
    pub instructions: usize,
    pub bytes: usize,
    pub branches: usize,
}

impl ComparisonTotals {
    pub fn add(&mut self, metrics: &FunctionMetrics) {
        self.instructions += metrics.instruction_count;
        self.bytes += metrics.byte_count;
        self.branches += metrics.branch_count;
    }
}

/// Metrics for one function of interest on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionComparison {
    /// The configured name pattern.
    pub target: String,
    /// Symbol it resolved to in the normal binary.
    pub normal_symbol: String,
    /// Symbol it resolved to in the obfuscated binary.
    pub obfuscated_symbol: String,
    pub normal: FunctionMetrics,
    pub obfuscated: FunctionMetrics,
}

impl FunctionComparison {
    pub fn instruction_delta(&self) -> i64 {
        signed_delta(self.normal.instruction_count, self.obfuscated.instruction_count)
    }

    pub fn byte_delta(&self) -> i64 {
        signed_delta(self.normal.byte_count, self.obfuscated.byte_count)
    }

    pub fn branch_delta(&self) -> i64 {
        signed_delta(self.normal.branch_count, self.obfuscated.branch_count)
    }
}

fn signed_delta(before: usize, after: usize) -> i64 {
    after as i64 - before as i64
}

/// Qualitative band for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Minimal,
    Low,
    Moderate,
    High,
    Extreme,
}

impl Rating {
    /// `<10` minimal, `<30` low, `<60` moderate, `<100` high, otherwise
    /// (the clamp ceiling) extreme.
    pub fn from_score(score: f64) -> Self {
        if score < 10.0 {
            Self::Minimal
        } else if score < 30.0 {
            Self::Low
        } else if score < 60.0 {
            Self::Moderate
        } else if score < MAX_QUALITY_SCORE {
            Self::High
        } else {
            Self::Extreme
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Minimal => "MINIMAL",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Extreme => "EXTREME",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Minimal => "Obfuscation had little effect",
            Self::Low => "Some obfuscation applied",
            Self::Moderate => "Good obfuscation coverage",
            Self::High => "Strong obfuscation",
            Self::Extreme => "Very aggressive obfuscation",
        }
    }
}

/// Aggregate deltas and score over every compared function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub normal: ComparisonTotals,
    pub obfuscated: ComparisonTotals,
    pub instruction_increase: f64,
    pub byte_increase: f64,
    pub branch_increase: f64,
    pub quality_score: f64,
    pub rating: Rating,
}

/// Percentage growth from `before` to `after`; 0.0 when `before` is zero.
pub fn percent_increase(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (after as f64 - before as f64) * 100.0 / before as f64
}

/// Mean of the three increases, capped at [`MAX_QUALITY_SCORE`].
pub fn quality_score(instruction_increase: f64, byte_increase: f64, branch_increase: f64) -> f64 {
    ((instruction_increase + byte_increase + branch_increase) / 3.0).min(MAX_QUALITY_SCORE)
}

/// Build the summary, or `None` when nothing on the normal side was measured.
pub fn summarize(normal: ComparisonTotals, obfuscated: ComparisonTotals) -> Option<Summary> {
    if normal.instructions == 0 {
        return None;
    }

    let instruction_increase = percent_increase(normal.instructions, obfuscated.instructions);
    let byte_increase = percent_increase(normal.bytes, obfuscated.bytes);
    let branch_increase = percent_increase(normal.branches, obfuscated.branches);
    let score = quality_score(instruction_increase, byte_increase, branch_increase);

    Some(Summary {
        normal,
        obfuscated,
        instruction_increase,
        byte_increase,
        branch_increase,
        quality_score: score,
        rating: Rating::from_score(score),
    })
}

/// Per-function results and totals for two parsed listings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexComparison {
    pub functions: Vec<FunctionComparison>,
    pub normal_totals: ComparisonTotals,
    pub obfuscated_totals: ComparisonTotals,
}

/// Match each name pattern against both indexes and measure the pairs.
///
/// A pattern resolves to the first function, in listing order, whose name
/// contains it. Patterns missing on either side, or resolving to a function
/// without instructions on either side, are skipped.
pub fn compare_indexes(
    normal: &DisassemblyIndex,
    obfuscated: &DisassemblyIndex,
    function_names: &[String],
) -> IndexComparison {
    let mut out = IndexComparison::default();

    for target in function_names {
        let (Some(normal_fn), Some(obf_fn)) =
            (normal.find_containing(target), obfuscated.find_containing(target))
        else {
            debug!(function = %target, "not present in both binaries; skipping");
            continue;
        };

        let (Some(normal_metrics), Some(obf_metrics)) =
            (analyze_function(&normal_fn.instructions), analyze_function(&obf_fn.instructions))
        else {
            debug!(function = %target, "no instructions on one side; skipping");
            continue;
        };

        out.normal_totals.add(&normal_metrics);
        out.obfuscated_totals.add(&obf_metrics);
        out.functions.push(FunctionComparison {
            target: target.clone(),
            normal_symbol: normal_fn.name.clone(),
            obfuscated_symbol: obf_fn.name.clone(),
            normal: normal_metrics,
            obfuscated: obf_metrics,
        });
    }

    out
}

/// Everything the report shows for one normal/obfuscated pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub normal_path: PathBuf,
    pub obfuscated_path: PathBuf,
    pub backend: String,
    pub sizes: SizeComparison,
    pub functions: Vec<FunctionComparison>,
    pub summary: Option<Summary>,
}

impl ComparisonReport {
    /// Assemble a report from already-parsed listings.
    pub fn from_indexes(
        normal_path: &Path,
        obfuscated_path: &Path,
        backend: &str,
        sizes: SizeComparison,
        normal: &DisassemblyIndex,
        obfuscated: &DisassemblyIndex,
        function_names: &[String],
    ) -> Self {
        let compared = compare_indexes(normal, obfuscated, function_names);
        let summary = summarize(compared.normal_totals, compared.obfuscated_totals);
        Self {
            normal_path: normal_path.to_path_buf(),
            obfuscated_path: obfuscated_path.to_path_buf(),
            backend: backend.to_string(),
            sizes,
            functions: compared.functions,
            summary,
        }
    }
}

fn file_size(path: &Path) -> Result<u64, CompareError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| CompareError::Metadata { path: path.to_path_buf(), source })
}

/// Size, disassemble, parse, and compare two binaries.
pub fn compare_binaries(
    normal: &Path,
    obfuscated: &Path,
    backend: &dyn DisassemblyBackend,
    config: &AnalyzerConfig,
) -> Result<ComparisonReport, CompareError> {
    let sizes = SizeComparison::new(file_size(normal)?, file_size(obfuscated)?);

    let normal_index = parse_disassembly(&backend.disassemble(normal)?);
    let obfuscated_index = parse_disassembly(&backend.disassemble(obfuscated)?);

    let report = ComparisonReport::from_indexes(
        normal,
        obfuscated,
        backend.name(),
        sizes,
        &normal_index,
        &obfuscated_index,
        &config.function_names,
    );

    info!(
        backend = backend.name(),
        compared = report.functions.len(),
        score = report.summary.as_ref().map(|s| s.quality_score),
        "comparison finished"
    );
    Ok(report)
}
