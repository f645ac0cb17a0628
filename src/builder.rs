//! Model builder: resolves raw records into repository entities.
//!
//! Records are applied in log order. Parents may point at commits the log
//! lists later (or never); those get a placeholder commit holding only the
//! hash, which a later boundary line fills in.

use tracing::{debug, warn};

use crate::config::Config;
use crate::grammar::Grammar;
use crate::model::{CommitId, ParentLink, Repository};
use crate::parser::RawRecord;
use crate::BranchflowError;

pub struct ModelBuilder<'a> {
    config: &'a Config,
    native_default_branch: &'a str,
    repo: Repository,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(name: &str, grammar: &'a Grammar, config: &'a Config) -> Self {
        Self {
            config,
            native_default_branch: grammar.native_default_branch,
            repo: Repository::new(name),
        }
    }

    /// Strip a configured remote prefix, then map the dialect's own default
    /// branch token to the configured default branch.
    fn branch_name<'r>(&'r self, raw: Option<&'r str>) -> &'r str {
        let name = raw.map(str::trim).filter(|b| !b.is_empty()).map(|b| {
            self.config
                .remote_names
                .iter()
                .find_map(|remote| {
                    b.strip_prefix(remote.as_str())
                        .and_then(|rest| rest.strip_prefix('/'))
                        .filter(|rest| !rest.is_empty())
                })
                .unwrap_or(b)
        });
        match name {
            Some(name) if name != self.native_default_branch => name,
            _ => &self.config.default_branch_name,
        }
    }

    /// Apply one record.
    pub fn add_record(&mut self, record: &RawRecord) -> Result<CommitId, BranchflowError> {
        let hash = record.hash.trim();
        if hash.is_empty() {
            return Err(BranchflowError::structure(
                record.line_no,
                &record.boundary_line,
                "commit line without a hash",
            ));
        }

        let commit = self.repo.add_commit(hash);

        if let Some(raw_author) = record.author.as_deref().filter(|a| !a.trim().is_empty()) {
            let known = self.repo.authors().len();
            let author = self.repo.add_author(raw_author);
            let stored = &self.repo.author(author).name;
            if author.index() < known && stored != raw_author {
                debug!(author = %stored, mention = %raw_author, "Merged author spelling");
            }
            self.repo.set_author(commit, author);
        }

        let branch_name = self.branch_name(record.branch.as_deref()).to_string();
        let branch = self.repo.add_branch(&branch_name);
        self.repo.assign_branch(commit, branch);

        {
            let entry = self.repo.commit_mut(commit);
            if record.date.is_some() {
                entry.date = record.date;
            }
            if record.revision.is_some() {
                entry.revision = record.revision;
            }
            entry.comment = record.comment.clone();
        }

        if let Some(tag) = record.tag.as_deref() {
            let already_tagged = self
                .repo
                .commit(commit)
                .tag()
                .is_some_and(|t| self.repo.tag(t).name == tag);
            if !already_tagged {
                self.repo.add_tag(tag, commit);
            }
        }

        for parent_hash in &record.parents {
            let parent = self.repo.add_commit(parent_hash);
            match self.repo.add_parent(commit, parent) {
                ParentLink::Added | ParentLink::AlreadyPresent => {}
                ParentLink::SelfReference => {
                    warn!(commit = %hash, parent = %parent_hash, "Parent reference resolves to the commit itself, ignored");
                }
                ParentLink::Full => {
                    return Err(BranchflowError::structure(
                        record.line_no,
                        &record.boundary_line,
                        format!("commit {} would get more than two parents", hash),
                    ));
                }
            }
        }

        Ok(commit)
    }

    /// Finish building. Placeholder commits never described by a boundary
    /// line are attached to the default branch so every commit has one.
    pub fn finish(mut self) -> Repository {
        let orphans: Vec<CommitId> = self
            .repo
            .commit_ids()
            .iter()
            .copied()
            .filter(|&id| self.repo.commit(id).branch().is_none())
            .collect();
        if !orphans.is_empty() {
            let default_branch = self.repo.add_branch(&self.config.default_branch_name);
            for id in &orphans {
                self.repo.assign_branch(*id, default_branch);
            }
            debug!(
                count = orphans.len(),
                branch = %self.config.default_branch_name,
                "Attached unresolved parent commits to the default branch"
            );
        }

        debug!(
            repository = %self.repo.name,
            commits = self.repo.commit_count(),
            authors = self.repo.authors().len(),
            branches = self.repo.branches().count(),
            tags = self.repo.tags().len(),
            "Built repository model"
        );
        self.repo
    }
}

/// Build a repository from parsed records. Any structural error discards the partial model.
pub fn build_repository(
    name: &str,
    records: &[RawRecord],
    grammar: &Grammar,
    config: &Config,
) -> Result<Repository, BranchflowError> {
    let mut builder = ModelBuilder::new(name, grammar, config);
    for record in records {
        builder.add_record(record)?;
    }
    Ok(builder.finish())
}
