//! Console and markdown renderings of a cost report.

use domain_hcloud_pricing::CostReport;
use std::fmt::Write;

const TITLE: &str = "💰 Estimated Hetzner Cloud Costs";
const RULE: &str = "---------------------------------";

/// Plain-text report for CI logs
pub fn render_console(report: &CostReport) -> String {
    let currency = report.currency;
    let mut out = String::new();

    let _ = writeln!(out, "\n{TITLE}");
    let _ = writeln!(out, "{RULE}");
    for item in &report.items {
        let _ = writeln!(
            out,
            "{:<40} | {:>8.2} {}/mo | ({})",
            item.address, item.quote.monthly, currency, item.quote.source
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Total Monthly: {:.2} {}", report.total_monthly, currency);
    let _ = writeln!(out, "Total Hourly:  {:.4} {}", report.total_hourly, currency);

    out
}

/// Markdown report for pull-request comments
pub fn render_markdown(report: &CostReport) -> String {
    let currency = report.currency;
    let mut out = String::new();

    let _ = writeln!(out, "## {TITLE}\n");
    let _ = writeln!(out, "| Resource | Monthly Cost | Source |");
    let _ = writeln!(out, "| :--- | :--- | :--- |");
    for item in &report.items {
        let _ = writeln!(
            out,
            "| {} | {:.2} {} | {} |",
            item.address, item.quote.monthly, currency, item.quote.source
        );
    }
    let _ = writeln!(out, "\n---");
    let _ = writeln!(
        out,
        "**Total Estimated Monthly Cost: {:.2} {}**",
        report.total_monthly, currency
    );
    let _ = writeln!(
        out,
        "**Total Estimated Hourly Cost: {:.4} {}**",
        report.total_hourly, currency
    );
    out.push_str("\n*Sent by hcloud-cost*");

    out
}
