use crate::engine::SearchReport;
use std::io::{self, Write};

/// Writes results as a numbered list followed by a shortfall notice if
/// fewer than `requested` were found
pub fn write_results<W: Write>(
    out: &mut W,
    report: &SearchReport,
    requested: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "=== {} results (about {} available) ===\n",
        report.items.len(),
        report.total_estimate
    )?;

    for (number, item) in report.items.iter().enumerate() {
        writeln!(out, "{}. {}", number + 1, item.title)?;
        writeln!(out, "   URL: {}", item.url)?;
        writeln!(out, "   Attribution: {}", item.attribution)?;
        writeln!(out, "   Abstract: {}", item.abstract_text)?;
        writeln!(out, "   Last updated: {}", item.last_updated)?;
        writeln!(out, "   Date published: {}", item.date_published)?;
        writeln!(out)?;
    }

    if report.shortfall {
        writeln!(
            out,
            "Only {} of the {} requested results could be found.",
            report.items.len(),
            requested
        )?;
    }

    out.flush()
}

/// Prints results to stdout
pub fn print_results(report: &SearchReport, requested: usize) -> io::Result<()> {
    write_results(&mut io::stdout().lock(), report, requested)
}
