//! Postprocessing: model-to-model refinement after building.
//!
//! Passes, in this order:
//! 1. [`fill_omitted_parents`]: many logs only print parents for merges;
//!    linear history is reconstructed from timestamps.
//! 2. [`sort_commits`]: stable chronological sort of the commit sequence.
//! 3. [`extract_author_emails`]: `Name <email>` → separate name and email.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::{BranchId, Commit, CommitId, Repository};
use crate::BranchflowError;

// ─── Options and reports ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = BranchflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(BranchflowError::Config {
                path: "--sort".to_string(),
                message: format!("unknown sort order '{}' (expected asc or desc)", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostprocessOptions {
    /// Sort the commit sequence; `None` keeps discovery order.
    pub sort: Option<SortOrder>,
}

/// What omitted-parent inference did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceReport {
    /// Commits that received an inferred parent.
    pub inferred: usize,
    /// Parentless commits whose revision marks them as the repository root.
    pub roots: Vec<CommitId>,
    /// Parentless commits for which no predecessor was found.
    pub unresolved: Vec<CommitId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostprocessReport {
    pub inference: InferenceReport,
    pub emails_extracted: usize,
}

// ─── Omitted-parent inference ───────────────────────────────────────

/// Dated commits of one branch, ordered by (date, position in the branch list).
///
/// Built once per inference pass. Dates and branch lists do not change while
/// parents are being filled in, so the order stays valid for the whole pass.
struct BranchTimeline {
    entries: Vec<(DateTime<FixedOffset>, usize, CommitId)>,
}

impl BranchTimeline {
    fn new(repo: &Repository, branch: BranchId) -> Self {
        let mut entries: Vec<_> = repo
            .branch(branch)
            .commits()
            .iter()
            .enumerate()
            .filter_map(|(pos, &id)| repo.commit(id).date.map(|date| (date, pos, id)))
            .collect();
        entries.sort_unstable_by_key(|&(date, pos, _)| (date, pos));
        Self { entries }
    }

    /// Commits dated strictly before `target`, best candidate first: the
    /// latest date first and, within one date, earliest in the branch list.
    fn earlier_than(&self, target: DateTime<FixedOffset>) -> impl Iterator<Item = CommitId> + '_ {
        let entries = &self.entries;
        let mut end = entries.partition_point(|e| e.0 < target);
        let mut next = end;
        let mut run_end = end;
        std::iter::from_fn(move || {
            if next == run_end {
                if end == 0 {
                    return None;
                }
                let date = entries[end - 1].0;
                let start = entries[..end].partition_point(|e| e.0 < date);
                next = start;
                run_end = end;
                end = start;
            }
            let id = entries[next].2;
            next += 1;
            Some(id)
        })
    }
}

/// Whether some recorded parent edge does not go strictly back in time.
///
/// Inferred edges always do, so without such an edge no inferred parent can
/// close a cycle.
fn has_non_decreasing_edge(repo: &Repository) -> bool {
    repo.commit_ids().iter().any(|&id| {
        let commit = repo.commit(id);
        commit.parents().iter().any(|&p| match (commit.date, repo.commit(p).date) {
            (Some(child), Some(parent)) => parent >= child,
            _ => true,
        })
    })
}

/// Whether `target` is `from` or one of its ancestors.
fn reaches(repo: &Repository, from: CommitId, target: CommitId) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if seen.insert(id) {
            stack.extend_from_slice(repo.commit(id).parents());
        }
    }
    false
}

/// Give every parentless commit its chronological predecessor, searching its
/// own branch first and the configured default branch second.
///
/// A candidate that descends from the commit is skipped in favour of the next
/// best one, so inference never closes a parent cycle.
pub fn fill_omitted_parents(repo: &mut Repository, config: &Config) -> InferenceReport {
    let mut report = InferenceReport::default();
    let default_branch = repo.branch_by_name(&config.default_branch_name);
    let timelines: Vec<BranchTimeline> = {
        let repo: &Repository = repo;
        repo.branches().map(|(id, _)| BranchTimeline::new(repo, id)).collect()
    };
    let check_cycles = has_non_decreasing_edge(repo);
    let candidates: Vec<CommitId> = repo
        .commit_ids()
        .iter()
        .copied()
        .filter(|&id| repo.commit(id).parents().is_empty())
        .collect();

    for id in candidates {
        let commit = repo.commit(id);
        let is_root = commit.revision == Some(config.first_revision);
        let found = match (commit.date, commit.branch()) {
            (Some(date), Some(own)) => std::iter::once(own)
                .chain(default_branch.filter(|&b| b != own))
                .find_map(|branch| {
                    timelines[branch.index()].earlier_than(date).find(|&candidate| {
                        let cyclic = check_cycles && reaches(repo, candidate, id);
                        if cyclic {
                            debug!(
                                commit = %repo.commit(id).hash(),
                                candidate = %repo.commit(candidate).hash(),
                                "Skipping candidate parent that descends from the commit"
                            );
                        }
                        !cyclic
                    })
                }),
            _ => None,
        };

        match found {
            Some(parent) => {
                repo.add_parent(id, parent);
                report.inferred += 1;
            }
            None if is_root => {
                debug!(commit = %repo.commit(id).hash(), "Root commit has no parent");
                report.roots.push(id);
            }
            None => {
                warn!(commit = %repo.commit(id).hash(), "No parent could be inferred, commit left parentless");
                report.unresolved.push(id);
            }
        }
    }

    info!(
        inferred = report.inferred,
        roots = report.roots.len(),
        unresolved = report.unresolved.len(),
        "Filled omitted parents"
    );
    report
}

// ─── Chronological sort ─────────────────────────────────────────────

fn compare_dates(a: &Commit, b: &Commit, order: SortOrder) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => x.cmp(&y),
            SortOrder::Descending => y.cmp(&x),
        },
        // undated commits always trail
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of the commit sequence by date.
pub fn sort_commits(repo: &mut Repository, order: SortOrder) {
    repo.reorder_commits(|a, b| compare_dates(a, b, order));
}

// ─── Author email extraction ────────────────────────────────────────

/// Split `Display Name <email>` into its parts. `None` when the text has no email suffix.
pub fn split_name_email(raw: &str) -> Option<(String, String)> {
    let inner = raw.trim().strip_suffix('>')?;
    let open = inner.rfind('<')?;
    let email = inner[open + 1..].trim();
    if email.is_empty() {
        return None;
    }
    let name = inner[..open].trim();
    let name = if name.is_empty() { email } else { name };
    Some((name.to_string(), email.to_string()))
}

/// Rewrite every author still in `Name <email>` form. Returns how many were split.
pub fn extract_author_emails(repo: &mut Repository) -> usize {
    let mut extracted = 0;
    for author in repo.authors_mut() {
        let Some((name, email)) = split_name_email(&author.name) else {
            continue;
        };
        author.name = name;
        if author.email.is_none() {
            author.email = Some(email);
        }
        extracted += 1;
    }
    extracted
}

// ─── All passes ─────────────────────────────────────────────────────

/// Run all passes in order.
pub fn postprocess(repo: &mut Repository, config: &Config, options: &PostprocessOptions) -> PostprocessReport {
    let inference = fill_omitted_parents(repo, config);
    if let Some(order) = options.sort {
        sort_commits(repo, order);
    }
    let emails_extracted = extract_author_emails(repo);
    debug!(emails_extracted, "Postprocessing done");
    PostprocessReport {
        inference,
        emails_extracted,
    }
}

#[cfg(test)]
#[path = "postprocess_tests.rs"]
mod tests;
