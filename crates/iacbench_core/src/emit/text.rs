//! Plain-text summary for terminals.

use std::fmt::Write;

use crate::emit::capitalize;
use crate::error::BenchResult;
use crate::findings::key_findings;
use crate::report::Report;

/// Overall ranking followed by one block per category.
pub fn render_summary_text(report: &Report) -> BenchResult<String> {
    let mut out = String::new();

    writeln!(out, "IaC Tools Evaluation Report ({})", report.generated_at)?;
    writeln!(out)?;
    writeln!(out, "Overall ranking:")?;
    if report.overall_ranking.is_empty() {
        writeln!(out, "  (no results)")?;
    }
    for (tool, entry) in &report.overall_ranking {
        writeln!(
            out,
            "  #{} {:<16} {:>7.2}",
            entry.rank,
            capitalize(tool),
            entry.score
        )?;
    }

    for category in &report.categories {
        writeln!(out)?;
        writeln!(out, "{}:", category.label())?;
        match report.rankings.get(category) {
            Some(ranking) if !ranking.is_empty() => {
                for (tool, entry) in ranking {
                    writeln!(
                        out,
                        "  #{} {:<16} {:>7.2}  {}",
                        entry.rank,
                        capitalize(tool),
                        entry.score,
                        key_findings(report, tool, *category)
                    )?;
                }
            }
            _ => writeln!(out, "  (no data)")?,
        }
    }

    Ok(out)
}
