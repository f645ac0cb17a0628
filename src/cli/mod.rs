//! CLI layer: argument parsing, command dispatch, and subcommand implementations.

pub mod args;
mod import;

pub use args::*;

use clap::{Parser, Subcommand};

use branchflow::FormatKind;

// ─── CLI ─────────────────────────────────────────────────────────────

/// Rebuild a repository model (authors, branches, commits, tags) from VCS log dumps
#[derive(Parser, Debug)]
#[command(name = "branchflow", version, about, after_help = "\
Run 'branchflow <COMMAND> --help' for detailed options and examples.\n\
Example: git log --all --decorate > history.log && branchflow import -t git history.log")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Parse log files and rebuild their repository models
    Import(ImportArgs),

    /// List the built-in log grammars
    Formats,
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import(args) => import::cmd_import(args),
        Commands::Formats => { cmd_formats(); Ok(()) },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ─── Small commands ─────────────────────────────────────────────────

fn cmd_formats() {
    for kind in FormatKind::ALL {
        let command = match kind {
            FormatKind::Git => "git log --all --decorate",
            FormatKind::Mercurial => "hg log",
        };
        println!("{:<6} {}", kind.as_str(), command);
    }
}

/// Map a level name to a tracing level, falling back to INFO.
pub(crate) fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_ascii_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_import_args_parse() {
        let cli = Cli::try_parse_from([
            "branchflow", "import", "-t", "hg", "-n", "demo", "-e", "latin1",
            "--sort", "desc", "--json", "a.log", "b.log",
        ])
        .unwrap();
        let Commands::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.format, "hg");
        assert_eq!(args.name.as_deref(), Some("demo"));
        assert_eq!(args.encoding, "latin1");
        assert_eq!(args.sort.as_deref(), Some("desc"));
        assert!(args.json);
        assert_eq!(args.files.len(), 2);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_import_requires_files() {
        assert!(Cli::try_parse_from(["branchflow", "import", "-t", "git"]).is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_log_level("WARN"), tracing::Level::WARN);
        assert_eq!(parse_log_level("bogus"), tracing::Level::INFO);
    }
}
