//! Shared CLI helpers — argument parsing and status rendering.

use colored::Colorize;

use scriptforge_core::Provider;
use scriptforge_engine::{ProbeReport, ProbeStatus};

/// Parse a provider argument (clap value parser).
pub fn parse_provider(value: &str) -> Result<Provider, String> {
    Provider::from_name(value).ok_or_else(|| {
        format!(
            "unknown provider '{}'; expected one of: {}",
            value,
            Provider::ALL
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

/// Render a probe report as a colored one-liner.
pub fn format_report(report: &ProbeReport) -> String {
    let status = match report.status {
        ProbeStatus::Valid => report.status.to_string().green().bold(),
        ProbeStatus::Invalid => report.status.to_string().red().bold(),
        ProbeStatus::RateLimited | ProbeStatus::QuotaExhausted | ProbeStatus::CoolingDown => {
            report.status.to_string().yellow().bold()
        }
        ProbeStatus::Error => report.status.to_string().red(),
    };
    format!("{} — {}", status, report.message)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
