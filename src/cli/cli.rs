use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Scaffolds a project tree from a york.json structure file and fills the
/// generated files with content from matching scratches.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Path to a directory with project files and scratches
    #[clap(long, short, default_value = "default")]
    pub scratches: PathBuf,

    #[clap(long, short, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}
