//! Output formatting for CLI commands.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::hybrid_search::{FusionReport, RankedResult};

/// How reports are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Verbosity level, see [`HybridQaArgs::verbosity`](crate::cli::args::HybridQaArgs::verbosity).
    pub verbosity: u8,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            pretty: false,
            verbosity: 1,
        }
    }
}

/// Write a fusion report in the requested format.
pub fn write_report<W: Write>(out: &mut W, report: &FusionReport, options: &OutputOptions) -> Result<()> {
    match options.format {
        OutputFormat::Human => write_report_human(out, report, options),
        OutputFormat::Json => write_json(out, report, options.pretty),
    }
}

/// Write any serializable value as a single JSON document.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Output search results in human format.
fn write_report_human<W: Write>(
    out: &mut W,
    report: &FusionReport,
    options: &OutputOptions,
) -> Result<()> {
    for failure in &report.degraded {
        writeln!(
            out,
            "Warning: {} results unavailable ({})",
            failure.source, failure.message
        )?;
    }

    writeln!(out, "Hybrid Search Results:")?;
    if report.is_empty() {
        writeln!(out, "No results found.")?;
    }
    for result in &report.results {
        write_result_human(out, result)?;
    }

    if options.verbosity > 1 {
        writeln!(
            out,
            "{} lexical and {} semantic candidates in {}ms",
            report.lexical_matches, report.semantic_matches, report.query_time_ms
        )?;
    }
    Ok(())
}

fn write_result_human<W: Write>(out: &mut W, result: &RankedResult) -> Result<()> {
    writeln!(out, "Source: {}", result.source())?;
    writeln!(out, "Question: {}", result.question())?;
    writeln!(out, "Answer: {}", result.answer())?;
    if let Some(explanation) = result.explanation() {
        writeln!(out, "Explanation: {explanation}")?;
    }
    writeln!(out, "Combined Score: {}", result.combined_score)?;
    writeln!(out, "-----------")?;
    Ok(())
}
