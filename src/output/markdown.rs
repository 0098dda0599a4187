//! Markdown report generation
//!
//! This module generates a human-readable Markdown report of a crawl,
//! including counts, the depth breakdown, failures, skips and external links.

use crate::output::report::CrawlReport;
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a crawl report as Markdown
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);
    let write_error = |source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    };

    let mut file = File::create(output_path).map_err(write_error)?;
    file.write_all(markdown.as_bytes()).map_err(write_error)?;

    Ok(())
}

/// Formats a crawl report as Markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Site-Spider Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", report.site));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    match report.max_depth {
        Some(depth) => md.push_str(&format!("- **Max Depth**: {}\n", depth)),
        None => md.push_str("- **Max Depth**: unlimited\n"),
    }
    if report.depth_limit_hit {
        md.push_str("- **Depth Limit Reached**: yes\n");
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Processed**: {}\n", report.pages_processed));
    md.push_str(&format!("- **Pages Failed**: {}\n", report.pages_failed));
    md.push_str(&format!("- **URLs Skipped**: {}\n", report.pages_skipped));
    md.push_str(&format!(
        "- **External Hosts**: {}\n",
        report.external_hosts.len()
    ));
    md.push_str(&format!(
        "- **External Links**: {} ({} broken)\n",
        report.external_links.len(),
        report.broken_external_links()
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));
    md.push_str(&format!("> {}\n\n", report.summary_line));

    // Depth breakdown
    if !report.depth_breakdown.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &report.depth_breakdown {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    // Pages
    if !report.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Depth | URL | Status | Links |\n");
        md.push_str("|-------|-----|--------|-------|\n");
        for page in &report.pages {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                page.distance, page.url, page.status, page.link_count
            ));
        }
        md.push('\n');
    }

    // Failures
    if !report.failures.is_empty() {
        md.push_str("## Failed Fetches\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");
        for failure in &report.failures {
            md.push_str(&format!("| {} | {} |\n", failure.url, failure.response));
        }
        md.push('\n');
    }

    // Skipped
    if !report.skipped.is_empty() {
        md.push_str("## Skipped URLs\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for skipped in &report.skipped {
            md.push_str(&format!("| {} | {} |\n", skipped.url, skipped.reason));
        }
        md.push('\n');
    }

    // External hosts
    if !report.external_hosts.is_empty() {
        md.push_str("## External Hosts\n\n");
        for host in &report.external_hosts {
            md.push_str(&format!("- {}\n", host));
        }
        md.push('\n');
    }

    // External links
    if !report.external_links.is_empty() {
        md.push_str("## External Links\n\n");
        md.push_str("| URL | Check |\n");
        md.push_str("|-----|-------|\n");
        for link in &report.external_links {
            let check = link
                .check
                .as_ref()
                .map_or_else(|| "not checked".to_string(), |c| c.to_string());
            md.push_str(&format!("| {} | {} |\n", link.url, check));
        }
        md.push('\n');
    }

    md
}
