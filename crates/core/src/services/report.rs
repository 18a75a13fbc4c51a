//! Plain-text rendering of a [`ComparisonReport`].

use std::fmt;

use super::comparison::{ComparisonReport, FunctionComparison, SizeComparison, Summary};

const BANNER_WIDTH: usize = 60;

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(f, "{rule}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{rule}")
}

fn write_sizes(f: &mut fmt::Formatter<'_>, sizes: &SizeComparison) -> fmt::Result {
    writeln!(f, "Binary sizes:")?;
    writeln!(f, "  Normal: {} bytes", sizes.normal)?;
    writeln!(f, "  Obfuscated: {} bytes", sizes.obfuscated)?;
    match sizes.percent {
        Some(pct) => writeln!(f, "  Increase: {} bytes ({pct:.1}%)", sizes.delta),
        None => writeln!(f, "  Increase: {} bytes (n/a)", sizes.delta),
    }
}

fn write_function(f: &mut fmt::Formatter<'_>, cmp: &FunctionComparison) -> fmt::Result {
    let (n, o) = (&cmp.normal, &cmp.obfuscated);
    writeln!(f)?;
    writeln!(f, "--- {} ---", cmp.target)?;
    writeln!(
        f,
        "  Instructions: {} -> {} ({:+})",
        n.instruction_count,
        o.instruction_count,
        cmp.instruction_delta()
    )?;
    writeln!(f, "  Bytes: {} -> {} ({:+})", n.byte_count, o.byte_count, cmp.byte_delta())?;
    writeln!(f, "  Branches: {} -> {} ({:+})", n.branch_count, o.branch_count, cmp.branch_delta())?;
    writeln!(f, "  Unique mnemonics: {} -> {}", n.unique_mnemonics, o.unique_mnemonics)?;
    writeln!(f, "  Mnemonic entropy: {:.2} -> {:.2}", n.mnemonic_entropy, o.mnemonic_entropy)
}

fn write_summary(f: &mut fmt::Formatter<'_>, summary: &Summary) -> fmt::Result {
    let (n, o) = (&summary.normal, &summary.obfuscated);
    writeln!(f)?;
    writeln!(
        f,
        "Total instruction count: {} -> {} ({:+.1}%)",
        n.instructions, o.instructions, summary.instruction_increase
    )?;
    writeln!(f, "Total byte count: {} -> {} ({:+.1}%)", n.bytes, o.bytes, summary.byte_increase)?;
    writeln!(
        f,
        "Total branch count: {} -> {} ({:+.1}%)",
        n.branches, o.branches, summary.branch_increase
    )?;
    writeln!(f)?;
    writeln!(f, "Obfuscation quality score: {:.0}/100", summary.quality_score)?;
    writeln!(f, "Rating: {} - {}", summary.rating.label(), summary.rating.description())
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "Obfuscation Quality Analysis")?;
        writeln!(f)?;
        writeln!(f, "Normal binary: {}", self.normal_path.display())?;
        writeln!(f, "Obfuscated binary: {}", self.obfuscated_path.display())?;
        writeln!(f)?;
        write_sizes(f, &self.sizes)?;

        if !self.functions.is_empty() {
            writeln!(f)?;
            banner(f, "Per-Function Analysis")?;
            for cmp in &self.functions {
                write_function(f, cmp)?;
            }
        }

        if let Some(summary) = &self.summary {
            writeln!(f)?;
            banner(f, "Summary (Analyzed Functions)")?;
            write_summary(f, summary)?;
        }

        Ok(())
    }
}
