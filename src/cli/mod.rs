//! Command Line Interface for hybridqa.

pub mod args;
pub mod commands;
pub mod output;
pub mod shell;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use output::*;
pub use shell::{QueryShell, ShellSummary};
