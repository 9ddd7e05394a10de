use crate::domain::model::{BatchSummary, OutputKind, ReasonCounts};
use std::fmt::Write;

/// Plain-text summary for the terminal, reasons ranked by count.
pub fn render_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total records:   {}", summary.total_records);
    let _ = writeln!(out, "Valid records:   {}", summary.valid_records);
    let _ = writeln!(out, "Invalid records: {}", summary.invalid_records);
    let _ = writeln!(out, "Warning records: {}", summary.warning_records);
    let _ = writeln!(out, "Columns: {}", summary.columns.join(", "));

    for kind in OutputKind::ALL {
        if let Some(file) = summary.file(kind) {
            let _ = writeln!(out, "📁 {}", file);
        }
    }

    render_reasons(&mut out, "Invalid reasons", &summary.invalid_reasons);
    render_reasons(&mut out, "Warning reasons", &summary.warning_reasons);
    out
}

fn render_reasons(out: &mut String, title: &str, reasons: &ReasonCounts) {
    if reasons.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", title);
    for (reason, count) in reasons.ranked() {
        let _ = writeln!(out, "  {:>6}  {}", count, reason);
    }
}
