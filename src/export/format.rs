//! Rendering a comparison as JSON or CSV text

use crate::batch::Comparison;
use crate::error::ExportError;
use std::fmt::Write;

pub const CSV_HEADER: &str =
    "Address,Score,Rank,Total Transactions,Unique Receivers,Total Volume,ASA Holdings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

pub fn export_comparison(
    comparison: &Comparison,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(comparison)?),
        ExportFormat::Csv => Ok(to_csv(comparison)),
    }
}

/// One row per ranked account, in rank order
fn to_csv(comparison: &Comparison) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for entry in &comparison.ranking {
        let Some(breakdown) = comparison
            .detailed_results
            .get(&entry.address)
            .and_then(|o| o.breakdown())
        else {
            continue;
        };
        let analysis = &breakdown.analysis;

        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            escape_csv(&entry.address),
            entry.score,
            entry.rank,
            analysis.total_transactions,
            analysis.unique_receivers,
            analysis.total_volume,
            analysis.asa_holdings_count
        );
    }

    out
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
