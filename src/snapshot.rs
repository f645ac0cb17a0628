//! Read-only, id-free view of a repository for JSON output and downstream importers.

use serde::Serialize;

use crate::model::{CommitId, Repository};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorView {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BranchView {
    pub name: String,
    /// Commit hashes in branch list order.
    pub commits: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitView {
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    /// RFC 3339, log offset preserved.
    pub date: Option<String>,
    pub author: Option<String>,
    pub branch: Option<String>,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub parents: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TagView {
    pub name: String,
    pub commit: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub name: String,
    pub authors: Vec<AuthorView>,
    pub branches: Vec<BranchView>,
    /// In the repository's current sequence order.
    pub commits: Vec<CommitView>,
    pub tags: Vec<TagView>,
}

impl RepositorySnapshot {
    pub fn of(repo: &Repository) -> Self {
        let hash_of = |id: CommitId| repo.commit(id).hash().to_string();

        let commits = repo
            .commits()
            .map(|c| CommitView {
                hash: c.hash().to_string(),
                revision: c.revision,
                date: c.date.map(|d| d.to_rfc3339()),
                author: c.author().map(|a| repo.author(a).name.clone()),
                branch: c.branch().map(|b| repo.branch(b).name.clone()),
                comment: c.comment.clone(),
                tag: c.tag().map(|t| repo.tag(t).name.clone()),
                parents: c.parents().iter().map(|&p| hash_of(p)).collect(),
            })
            .collect();

        Self {
            name: repo.name.clone(),
            authors: repo
                .authors()
                .iter()
                .map(|a| AuthorView {
                    name: a.name.clone(),
                    email: a.email.clone(),
                })
                .collect(),
            branches: repo
                .branches()
                .map(|(_, b)| BranchView {
                    name: b.name.clone(),
                    commits: b.commits().iter().map(|&c| hash_of(c)).collect(),
                })
                .collect(),
            commits,
            tags: repo
                .tags()
                .iter()
                .map(|t| TagView {
                    name: t.name.clone(),
                    commit: hash_of(t.commit),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
