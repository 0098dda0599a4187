//! Console output for a crawl report

use crate::output::report::CrawlReport;
use std::fmt::Write;

/// Prints the report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
/// * `verbose` - Also list every page, skip and external link
pub fn print_report(report: &CrawlReport, verbose: bool) {
    print!("{}", format_report(report, verbose));
}

/// Renders the console report
///
/// The summary line comes first, followed by the sorted external hosts and
/// links, then the crawl statistics.
pub fn format_report(report: &CrawlReport, verbose: bool) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = write_report(&mut out, report, verbose);
    out
}

fn write_report(out: &mut String, report: &CrawlReport, verbose: bool) -> std::fmt::Result {
    writeln!(out, "{}\n", report.summary_line)?;

    if !report.external_hosts.is_empty() {
        writeln!(out, "External Hosts ({}):", report.external_hosts.len())?;
        for host in &report.external_hosts {
            writeln!(out, "  - {}", host)?;
        }
        writeln!(out)?;
    }

    if !report.external_links.is_empty() {
        writeln!(out, "External Links ({}):", report.external_links.len())?;
        for link in &report.external_links {
            match &link.check {
                Some(check) if verbose || link.is_broken() => {
                    writeln!(out, "  - {} [{}]", link.url, check)?
                }
                _ => writeln!(out, "  - {}", link.url)?,
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "=== Crawl Report: {} ===\n", report.site)?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages processed: {}", report.pages_processed)?;
    writeln!(out, "  Pages failed: {}", report.pages_failed)?;
    writeln!(out, "  URLs skipped: {}", report.pages_skipped)?;
    writeln!(out, "  External hosts: {}", report.external_hosts.len())?;
    writeln!(
        out,
        "  External links: {} ({} broken)",
        report.external_links.len(),
        report.broken_external_links()
    )?;
    writeln!(out, "  Duration: {}s", report.duration_seconds())?;
    if report.depth_limit_hit {
        if let Some(depth) = report.max_depth {
            writeln!(out, "  Stopped at depth limit {}", depth)?;
        }
    }
    writeln!(out)?;

    if !report.depth_breakdown.is_empty() {
        writeln!(out, "Pages by Depth:")?;
        for (depth, count) in &report.depth_breakdown {
            writeln!(out, "  {}: {}", depth, count)?;
        }
        writeln!(out)?;
    }

    if !report.failures.is_empty() {
        writeln!(out, "Failed Fetches:")?;
        for failure in &report.failures {
            writeln!(out, "  {} - {}", failure.url, failure.response)?;
        }
        writeln!(out)?;
    }

    if verbose {
        writeln!(out, "Pages:")?;
        for page in &report.pages {
            writeln!(
                out,
                "  [{}] {} ({} links, {})",
                page.distance, page.url, page.link_count, page.status
            )?;
        }
        writeln!(out)?;

        if !report.skipped.is_empty() {
            writeln!(out, "Skipped:")?;
            for skipped in &report.skipped {
                writeln!(out, "  {} ({})", skipped.url, skipped.reason)?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "Success Rate: {:.1}%", report.success_rate())
}
