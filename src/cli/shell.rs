//! Interactive question loop.

use std::io::Write;

use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::signal;

use crate::cli::output::{OutputOptions, write_report};
use crate::config::ShellConfig;
use crate::error::Result;
use crate::hybrid_search::{FusionConfig, FusionEngine, Query};

/// Counters for a finished shell session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellSummary {
    /// Queries that produced a report.
    pub answered: usize,
    /// Queries that failed.
    pub failed: usize,
    /// Queries cancelled with Ctrl-C.
    pub cancelled: usize,
}

/// Reads one question per line, answers it, and keeps going until the exit
/// token, end of input, or Ctrl-C at the prompt.
///
/// A failed query is reported on the output and the loop continues. Ctrl-C
/// while a query is running cancels that query only.
pub struct QueryShell<W: Write> {
    engine: FusionEngine,
    fusion: FusionConfig,
    settings: ShellConfig,
    options: OutputOptions,
    out: W,
}

impl<W: Write> QueryShell<W> {
    /// Create a shell writing to `out`.
    pub fn new(
        engine: FusionEngine,
        fusion: FusionConfig,
        settings: ShellConfig,
        options: OutputOptions,
        out: W,
    ) -> Self {
        Self {
            engine,
            fusion,
            settings,
            options,
            out,
        }
    }

    /// Consume the shell and return its output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Whether `line` ends the session.
    pub fn is_exit(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(self.settings.exit_token.trim())
    }

    /// Run the loop over `input`.
    pub async fn run<R>(&mut self, input: R) -> Result<ShellSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = ShellSummary::default();
        let mut lines = input.lines();

        writeln!(
            self.out,
            "Welcome to the QA system. Type '{}' to quit.",
            self.settings.exit_token
        )?;

        loop {
            write!(self.out, "{}", self.settings.prompt)?;
            self.out.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = signal::ctrl_c() => {
                    writeln!(self.out)?;
                    break;
                }
            };

            let Some(line) = line else {
                writeln!(self.out)?;
                break;
            };
            if self.is_exit(&line) {
                break;
            }

            let query = Query::new(line.trim());
            if query.is_blank() {
                continue;
            }

            let outcome = tokio::select! {
                report = self.engine.fuse_with_report(&query, &self.fusion) => Some(report),
                _ = signal::ctrl_c() => None,
            };

            match outcome {
                Some(Ok(report)) => {
                    summary.answered += 1;
                    write_report(&mut self.out, &report, &self.options)?;
                }
                Some(Err(e)) => {
                    summary.failed += 1;
                    warn!("query '{}' failed: {e}", query.text());
                    writeln!(self.out, "Error: {e}")?;
                }
                None => {
                    summary.cancelled += 1;
                    writeln!(self.out, "Query cancelled.")?;
                }
            }
        }

        debug!(
            "shell finished: {} answered, {} failed, {} cancelled",
            summary.answered, summary.failed, summary.cancelled
        );
        Ok(summary)
    }
}
