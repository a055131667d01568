//! Report rendering: table, JSON, YAML.
//!
//! Table uses `tabled` for the subinterface list under a short summary;
//! structured formats serialize the report via serde.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use panbulk_core::{Layer3Subinterface, ProvisionReport};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct SubinterfaceRow {
    #[tabled(rename = "Subinterface")]
    name: String,
    #[tabled(rename = "Tag")]
    tag: u16,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "MTU")]
    mtu: u16,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&Layer3Subinterface> for SubinterfaceRow {
    fn from(sub: &Layer3Subinterface) -> Self {
        Self {
            name: sub.name.clone(),
            tag: sub.tag,
            address: sub.address.to_string(),
            mtu: sub.mtu,
            comment: sub.comment.clone(),
        }
    }
}

// ── Render dispatcher ────────────────────────────────────────────────

pub fn render_report(format: OutputFormat, report: &ProvisionReport) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
    }
}

pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Table ────────────────────────────────────────────────────────────

fn render_table(report: &ProvisionReport) -> String {
    let rows: Vec<SubinterfaceRow> = report.subinterfaces.iter().map(Into::into).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();

    let summary = [
        ("Firewall", format!("{} [{}]", report.system, report.device)),
        ("Vsys", report.vsys.to_string()),
        ("Base interface", report.base_interface.clone()),
        ("Virtual router", report.virtual_router.clone()),
        ("Zone", report.zone.clone()),
        (
            "Started",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        (
            "Bulk create",
            format!(
                "{} subinterfaces in {}",
                report.subinterfaces.len(),
                humantime::format_duration(report.bulk_elapsed())
            ),
        ),
    ];

    let mut out = String::new();
    for (label, value) in summary {
        out.push_str(&format!("{label:<16}{value}\n"));
    }
    out.push('\n');
    out.push_str(&table);
    out
}
