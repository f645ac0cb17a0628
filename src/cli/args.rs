//! CLI argument structs for all subcommands.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Log files to import. Each file becomes its own repository.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Log format: git or hg
    #[arg(short = 't', long = "type")]
    pub format: String,

    /// Repository name (defaults to the file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Input encoding: utf8, utf8-lossy, latin1
    #[arg(short, long, default_value = "utf8")]
    pub encoding: String,

    /// JSON config file overriding the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reorder commits by date after import (asc, desc)
    #[arg(long)]
    pub sort: Option<String>,

    /// Print the repository model as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Log level for stderr output (error, warn, info, debug, trace).
    /// Overrides `logging.level` from the config.
    #[arg(long)]
    pub log_level: Option<String>,
}
