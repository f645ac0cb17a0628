//! `branchflow import`: parse log files into repository models.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use branchflow::{
    import_log, postprocess, BranchflowError, Config, Encoding, FormatKind, PostprocessOptions,
    PostprocessReport, Repository, RepositorySnapshot, SortOrder, SourceFile,
};

use super::args::ImportArgs;
use super::parse_log_level;

pub fn cmd_import(args: ImportArgs) -> Result<(), BranchflowError> {
    let kind: FormatKind = args.format.parse()?;
    let encoding: Encoding = args.encoding.parse()?;
    let sort = args.sort.as_deref().map(str::parse::<SortOrder>).transpose()?;
    let config = Config::resolve(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let options = PostprocessOptions { sort };
    let mut snapshots = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let name = repository_name(args.name.as_deref(), path);
        let start = Instant::now();

        let file = SourceFile::new(path, encoding);
        let mut repo = import_log(&file, kind, &name, &config)?;
        let report = postprocess(&mut repo, &config, &options);

        info!(
            repository = %repo.name,
            commits = repo.commit_count(),
            elapsed_ms = format_args!("{:.1}", start.elapsed().as_secs_f64() * 1000.0),
            "Import finished"
        );

        if args.json {
            snapshots.push(RepositorySnapshot::of(&repo));
        } else {
            print_summary(&repo, path, &report);
        }
    }

    if args.json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if snapshots.len() == 1 {
            serde_json::to_writer_pretty(&mut out, &snapshots[0]).map_err(std::io::Error::from)?;
        } else {
            serde_json::to_writer_pretty(&mut out, &snapshots).map_err(std::io::Error::from)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Explicit name, else the file stem, else the whole path.
fn repository_name(explicit: Option<&str>, path: &Path) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(repo: &Repository, path: &Path, report: &PostprocessReport) {
    let branch_names: Vec<&str> = repo.branches().map(|(_, b)| b.name.as_str()).collect();
    println!("Repository '{}' ({})", repo.name, path.display());
    println!("  commits:  {}", repo.commit_count());
    println!("  branches: {} ({})", branch_names.len(), branch_names.join(", "));
    println!("  authors:  {}", repo.authors().len());
    println!("  tags:     {}", repo.tags().len());
    println!(
        "  parents:  {} inferred, {} root(s), {} unresolved",
        report.inference.inferred,
        report.inference.roots.len(),
        report.inference.unresolved.len()
    );
    if report.emails_extracted > 0 {
        println!("  emails:   {} extracted from author names", report.emails_extracted);
    }
    for &id in &report.inference.unresolved {
        println!("  warning: no parent found for {}", repo.commit(id).hash());
    }
}
