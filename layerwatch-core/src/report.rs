// Report generation from a completed run

use crate::check::RunSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_text_report(summary: &RunSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Maps checked: {}\n", summary.reports.len()));

    let failing: Vec<_> = summary.failing().collect();
    report.push_str(&format!("  Maps with failures: {}\n", failing.len()));

    let total_problematic: usize = summary
        .reports
        .iter()
        .map(|r| r.problematic_layers.len())
        .sum();
    report.push_str(&format!("  Problematic layers: {}\n", total_problematic));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if summary.all_maps_ok {
        report.push_str("ALL MAPS AND LAYERS ARE ACCESSIBLE\n");
        return report;
    }

    report.push_str("ERRORS DETECTED IN THE FOLLOWING MAPS:\n\n");
    for map_report in failing {
        report.push_str(&format!("## {}\n", map_report.map_title));
        if let Some(ref error) = map_report.fetch_error {
            report.push_str(&format!("  map document unreachable: {}\n", error));
        }
        for layer in &map_report.problematic_layers {
            report.push_str(&format!("  ✗ {}\n", layer));
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(summary: &RunSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Layerwatch",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "summary": {
                "maps_checked": summary.reports.len(),
                "maps_with_failures": summary.failing().count(),
                "all_maps_ok": summary.all_maps_ok,
            },
            "maps": summary.reports,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
