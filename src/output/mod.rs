pub mod formatter;

pub use formatter::Formatter;

use crate::cli::OutputFormat;
use crate::drift::DriftReport;
use crate::error::Result;
use crate::ingest::IngestReport;
use crate::store::BuildReport;

/// Format an ingestion report based on the specified format
pub fn format_ingest_report(report: &IngestReport, format: OutputFormat) -> Result<String> {
    Formatter::new(format).format_ingest(report)
}

/// Format an index build report based on the specified format
pub fn format_build_report(report: &BuildReport, format: OutputFormat) -> Result<String> {
    Formatter::new(format).format_build(report)
}

/// Format a drift report based on the specified format
pub fn format_drift_report(report: &DriftReport, format: OutputFormat) -> Result<String> {
    Formatter::new(format).format_drift(report)
}
