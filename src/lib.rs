//! # branchflow — VCS log parsing and repository-model reconstruction
//!
//! Reads plain-text history dumps (`git log`, `hg log`) and rebuilds an
//! in-memory graph of authors, branches, commits, tags and parent links.
//!
//! ```text
//! LineSource ─▶ LogParser(Grammar) ─▶ RawRecord* ─▶ ModelBuilder ─▶ Repository ─▶ postprocess
//! ```
//!
//! ## Library usage
//!
//! ```no_run
//! use branchflow::{import_log, postprocess, Config, Encoding, FormatKind, PostprocessOptions, SourceFile};
//!
//! let config = Config::default();
//! let file = SourceFile::new("history.log", Encoding::Utf8);
//! let mut repo = import_log(&file, FormatKind::Mercurial, "project", &config)?;
//! postprocess(&mut repo, &config, &PostprocessOptions::default());
//! # Ok::<(), branchflow::BranchflowError>(())
//! ```
//!
//! Parsing is single-threaded. Every log gets its own [`Repository`]; nothing
//! is shared between imports.

pub mod builder;
pub mod config;
pub mod error;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod postprocess;
pub mod snapshot;
pub mod source;

#[cfg(test)]
pub(crate) mod test_fixtures;

use std::io::BufRead;

use tracing::info;

pub use builder::{build_repository, ModelBuilder};
pub use config::Config;
pub use error::BranchflowError;
pub use grammar::{FormatKind, Grammar};
pub use model::{Author, AuthorId, Branch, BranchId, Commit, CommitId, Repository, Tag, TagId};
pub use parser::{parse_log, LogParser, RawRecord};
pub use postprocess::{postprocess, PostprocessOptions, PostprocessReport, SortOrder};
pub use snapshot::RepositorySnapshot;
pub use source::{Encoding, LineSource, SourceFile};

/// Parse a log from any reader and build its repository model (not postprocessed).
pub fn import_reader(
    reader: impl BufRead,
    encoding: Encoding,
    kind: FormatKind,
    name: &str,
    config: &Config,
) -> Result<Repository, BranchflowError> {
    let grammar = kind.grammar()?;
    let records = parse_log(reader, encoding, &grammar)?;
    build_repository(name, &records, &grammar, config)
}

/// Parse a log file and build its repository model (not postprocessed).
pub fn import_log(
    file: &SourceFile,
    kind: FormatKind,
    name: &str,
    config: &Config,
) -> Result<Repository, BranchflowError> {
    info!(
        format = %kind,
        path = %file.path.display(),
        repository = %name,
        "Parsing log file"
    );
    let grammar = kind.grammar()?;
    let source = LineSource::open(file)?;
    let records = source::drive(source, LogParser::new(&grammar))?;
    build_repository(name, &records, &grammar, config)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lib_tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_import_reader_end_to_end() {
        let config = Config::default();
        let mut repo = import_reader(
            Cursor::new(test_fixtures::git_log()),
            Encoding::Utf8,
            FormatKind::Git,
            "demo",
            &config,
        )
        .unwrap();
        assert_eq!(repo.name, "demo");
        assert_eq!(repo.commit_count(), 5);

        postprocess(&mut repo, &config, &PostprocessOptions::default());
        assert!(repo.verify().is_ok());
        let parentless = repo.commits().filter(|c| c.parents().is_empty()).count();
        assert_eq!(parentless, 1);
    }

    #[test]
    fn test_import_log_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hg.log");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(test_fixtures::hg_log().as_bytes())
            .unwrap();

        let file = SourceFile::new(&path, Encoding::Utf8);
        let repo = import_log(&file, FormatKind::Mercurial, "hg", &Config::default()).unwrap();
        assert_eq!(repo.commit_count(), 6);
    }

    #[test]
    fn test_import_log_missing_file() {
        let file = SourceFile::new("/nonexistent/branchflow/hg.log", Encoding::Utf8);
        let err = import_log(&file, FormatKind::Mercurial, "hg", &Config::default()).unwrap_err();
        assert!(matches!(err, BranchflowError::Io(_)));
    }

    #[test]
    fn test_structural_error_yields_no_model() {
        let result = import_reader(
            Cursor::new("summary: orphan line\n"),
            Encoding::Utf8,
            FormatKind::Mercurial,
            "bad",
            &Config::default(),
        );
        assert!(matches!(result, Err(BranchflowError::Structure { .. })));
    }
}
