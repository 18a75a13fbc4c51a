//! Services that tie backends, parsing, and metrics together.

pub mod comparison;
pub mod report;

pub use comparison::{
    compare_binaries, compare_indexes, percent_increase, quality_score, summarize, CompareError,
    ComparisonReport, ComparisonTotals, FunctionComparison, IndexComparison, Rating,
    SizeComparison, Summary, MAX_QUALITY_SCORE,
};
