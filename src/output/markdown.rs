//! Markdown report generation
//!
//! This module writes a search and its results as a markdown document that
//! can be kept alongside a literature review.

use crate::output::{OutputResult, SearchSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of a search to `output_path`
///
/// # Arguments
///
/// * `summary` - The finished search
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(summary: &SearchSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote report to {}", output_path.display());
    Ok(())
}

/// Formats a search summary as markdown
pub fn format_markdown_report(summary: &SearchSummary) -> String {
    let report = &summary.report;
    let mut md = String::new();

    md.push_str("# Grey Literature Search\n\n");

    md.push_str("## Search\n\n");
    md.push_str(&format!("- **Keywords**: {}\n", summary.keywords));
    md.push_str(&format!("- **Sort**: {}\n", summary.sort));
    md.push_str(&format!("- **Requested**: {}\n", summary.requested));
    md.push_str(&format!("- **Found**: {}\n", report.items.len()));
    md.push_str(&format!("- **Estimated available**: {}\n", report.total_estimate));
    md.push_str(&format!("- **Rounds**: {}\n", report.rounds));
    md.push_str(&format!("- **Generated**: {}\n", summary.generated_at));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    if report.shortfall {
        md.push_str(&format!(
            "> Every source ran out after {} of {} requested results.\n\n",
            report.items.len(),
            summary.requested
        ));
    }

    md.push_str("## Results\n\n");
    if report.items.is_empty() {
        md.push_str("No results.\n");
    }

    for (number, item) in report.items.iter().enumerate() {
        md.push_str(&format!("### {}. [{}]({})\n\n", number + 1, item.title, item.url));
        md.push_str(&format!("- **Attribution**: {}\n", item.attribution));
        md.push_str(&format!("- **Abstract**: {}\n", item.abstract_text));
        md.push_str(&format!("- **Last updated**: {}\n", item.last_updated));
        md.push_str(&format!("- **Date published**: {}\n\n", item.date_published));
    }

    md
}
