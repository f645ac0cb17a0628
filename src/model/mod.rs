//! Repository model: authors, branches, commits and tags of one parsed log.
//!
//! The [`Repository`] owns every entity in flat vectors; entities refer to each
//! other through typed ids that are only meaningful for the repository that
//! issued them. The commit *sequence* is kept apart from the commit arena, so
//! reordering it never invalidates a [`CommitId`].
//!
//! ## Identity rules
//!
//! - Commits: a hash that is a prefix of a known hash (or the other way round)
//!   names the same commit. The longest hash seen is kept as canonical.
//! - Authors: two names are the same author when one contains the other.
//!   This merges `Tom Mason` with `Tom Mason <tom@x.com>`, and also merges
//!   unrelated people when one name happens to contain the other.
//! - Branches: exact name.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use chrono::{DateTime, FixedOffset};

// ─── Ids ────────────────────────────────────────────────────────────

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

entity_id!(AuthorId);
entity_id!(BranchId);
entity_id!(CommitId);
entity_id!(TagId);

// ─── Entities ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    /// Loose identity: either name contains the other.
    pub fn matches(&self, name: &str) -> bool {
        self.name.contains(name) || name.contains(self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    commits: Vec<CommitId>,
}

impl Branch {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            commits: Vec::new(),
        }
    }

    /// Commits in the order they were attached while building (not necessarily chronological).
    pub fn commits(&self) -> &[CommitId] {
        &self.commits
    }

    pub fn is_last_commit(&self, commit: CommitId) -> bool {
        self.commits.last() == Some(&commit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Commit {
    hash: String,
    /// Local sequence number, for dialects that expose one.
    pub revision: Option<i64>,
    pub date: Option<DateTime<FixedOffset>>,
    /// Free text, concatenated from continuation lines.
    pub comment: String,
    author: Option<AuthorId>,
    branch: Option<BranchId>,
    tag: Option<TagId>,
    parents: Vec<CommitId>,
}

impl Commit {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn author(&self) -> Option<AuthorId> {
        self.author
    }

    pub fn branch(&self) -> Option<BranchId> {
        self.branch
    }

    pub fn tag(&self) -> Option<TagId> {
        self.tag
    }

    /// Parents in declared order; the first one is the primary line of descent.
    pub fn parents(&self) -> &[CommitId] {
        &self.parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() == MAX_PARENTS
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit: CommitId,
}

/// Upper bound on parents per commit.
pub const MAX_PARENTS: usize = 2;

/// Outcome of [`Repository::add_parent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    Added,
    /// The same parent was already recorded.
    AlreadyPresent,
    /// The reference resolved to the commit itself; nothing recorded.
    SelfReference,
    /// The commit already has the maximum number of parents.
    Full,
}

// ─── Repository ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub name: String,
    authors: Vec<Author>,
    branches: Vec<Branch>,
    branch_index: HashMap<String, BranchId>,
    commits: Vec<Commit>,
    sequence: Vec<CommitId>,
    /// Canonical hash → commit, ordered for prefix range scans.
    hash_index: BTreeMap<String, CommitId>,
    tags: Vec<Tag>,
}

impl Repository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // ─── Authors ────────────────────────────────────────────────────

    /// Resolve or create the author for a raw author string.
    ///
    /// The first known author matching by substring wins. When the new
    /// mention is the longer string (e.g. it adds an email suffix), it
    /// replaces the stored name so nothing is lost before email extraction.
    pub fn add_author(&mut self, name: &str) -> AuthorId {
        if let Some(idx) = self.authors.iter().position(|a| a.matches(name)) {
            let author = &mut self.authors[idx];
            if name.len() > author.name.len() {
                author.name = name.to_string();
            }
            return AuthorId(idx);
        }
        self.authors.push(Author::new(name));
        AuthorId(self.authors.len() - 1)
    }

    pub fn author(&self, id: AuthorId) -> &Author {
        &self.authors[id.0]
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn authors_mut(&mut self) -> &mut [Author] {
        &mut self.authors
    }

    // ─── Branches ───────────────────────────────────────────────────

    /// Resolve or create the branch with this exact name.
    pub fn add_branch(&mut self, name: &str) -> BranchId {
        if let Some(&id) = self.branch_index.get(name) {
            return id;
        }
        let id = BranchId(self.branches.len());
        self.branches.push(Branch::new(name));
        self.branch_index.insert(name.to_string(), id);
        id
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id.0]
    }

    pub fn branch_by_name(&self, name: &str) -> Option<BranchId> {
        self.branch_index.get(name).copied()
    }

    pub fn branches(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.branches.iter().enumerate().map(|(i, b)| (BranchId(i), b))
    }

    /// Put a commit on a branch, keeping `Branch::commits` and `Commit::branch` in sync.
    ///
    /// Re-assigning to the same branch is a no-op; moving to another branch
    /// removes the commit from the old branch's list.
    pub fn assign_branch(&mut self, commit: CommitId, branch: BranchId) {
        match self.commits[commit.0].branch {
            Some(current) if current == branch => return,
            Some(current) => self.branches[current.0].commits.retain(|&c| c != commit),
            None => {}
        }
        self.commits[commit.0].branch = Some(branch);
        self.branches[branch.0].commits.push(commit);
    }

    // ─── Commits ────────────────────────────────────────────────────

    /// Find the commit a (possibly abbreviated) hash refers to.
    pub fn find_commit(&self, hash: &str) -> Option<CommitId> {
        if hash.is_empty() {
            return None;
        }
        // Exact match, or a known hash that extends `hash`.
        if let Some((known, &id)) = self
            .hash_index
            .range::<str, _>((Bound::Included(hash), Bound::Unbounded))
            .next() {
            if known.starts_with(hash) {
                return Some(id);
            }
        }
        // A known hash that `hash` extends.
        (1..hash.len())
            .rev()
            .filter(|&end| hash.is_char_boundary(end))
            .find_map(|end| self.hash_index.get(&hash[..end]).copied())
    }

    pub fn get_commit(&self, hash: &str) -> Option<&Commit> {
        self.find_commit(hash).map(|id| &self.commits[id.0])
    }

    /// Resolve or create the commit for a hash, keeping the longest hash as canonical.
    pub fn add_commit(&mut self, hash: &str) -> CommitId {
        if let Some(id) = self.find_commit(hash) {
            if hash.len() > self.commits[id.0].hash.len() {
                let old = std::mem::replace(&mut self.commits[id.0].hash, hash.to_string());
                self.hash_index.remove(&old);
                self.hash_index.insert(hash.to_string(), id);
            }
            return id;
        }
        let id = CommitId(self.commits.len());
        self.commits.push(Commit {
            hash: hash.to_string(),
            ..Default::default()
        });
        self.sequence.push(id);
        self.hash_index.insert(hash.to_string(), id);
        id
    }

    pub fn commit(&self, id: CommitId) -> &Commit {
        &self.commits[id.0]
    }

    pub fn commit_mut(&mut self, id: CommitId) -> &mut Commit {
        &mut self.commits[id.0]
    }

    /// Commit ids in sequence order (discovery order until sorted).
    pub fn commit_ids(&self) -> &[CommitId] {
        &self.sequence
    }

    /// Commits in sequence order.
    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.sequence.iter().map(|id| &self.commits[id.0])
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn set_author(&mut self, commit: CommitId, author: AuthorId) {
        self.commits[commit.0].author = Some(author);
    }

    /// Record `parent` as the next parent of `commit`.
    pub fn add_parent(&mut self, commit: CommitId, parent: CommitId) -> ParentLink {
        if commit == parent {
            return ParentLink::SelfReference;
        }
        let parents = &mut self.commits[commit.0].parents;
        if parents.contains(&parent) {
            return ParentLink::AlreadyPresent;
        }
        if parents.len() >= MAX_PARENTS {
            return ParentLink::Full;
        }
        parents.push(parent);
        ParentLink::Added
    }

    /// Stable reorder of the commit sequence.
    pub fn reorder_commits(&mut self, mut compare: impl FnMut(&Commit, &Commit) -> Ordering) {
        let commits = &self.commits;
        self.sequence
            .sort_by(|a, b| compare(&commits[a.0], &commits[b.0]));
    }

    // ─── Tags ───────────────────────────────────────────────────────

    /// Tag a commit, linking both directions.
    pub fn add_tag(&mut self, name: &str, commit: CommitId) -> TagId {
        let id = TagId(self.tags.len());
        self.tags.push(Tag {
            name: name.to_string(),
            commit,
        });
        self.commits[commit.0].tag = Some(id);
        id
    }

    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.0]
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    // ─── Consistency ────────────────────────────────────────────────

    /// Check the structural invariants. Returns a description of the first violation.
    pub fn verify(&self) -> Result<(), String> {
        if self.hash_index.len() != self.commits.len() || self.sequence.len() != self.commits.len() {
            return Err(format!(
                "{} commits, {} hashes indexed, {} in sequence",
                self.commits.len(),
                self.hash_index.len(),
                self.sequence.len()
            ));
        }
        let listed: usize = self.branches.iter().map(|b| b.commits.len()).sum();
        if listed != self.commits.len() {
            return Err(format!(
                "branches list {} commits, repository has {}",
                listed,
                self.commits.len()
            ));
        }
        for (i, commit) in self.commits.iter().enumerate() {
            let id = CommitId(i);
            let Some(branch) = commit.branch else {
                return Err(format!("commit {} has no branch", commit.hash));
            };
            if !self.branches[branch.0].commits.contains(&id) {
                return Err(format!(
                    "commit {} is not listed in its branch {}",
                    commit.hash, self.branches[branch.0].name
                ));
            }
            if commit.parents.len() > MAX_PARENTS {
                return Err(format!("commit {} has {} parents", commit.hash, commit.parents.len()));
            }
            if commit.parents.contains(&id) {
                return Err(format!("commit {} is its own parent", commit.hash));
            }
        }
        self.find_parent_cycle()
            .map_or(Ok(()), |id| Err(format!("parent cycle through commit {}", self.commits[id.0].hash)))
    }

    /// First commit found on a parent cycle, if any. Iterative DFS, three colours.
    fn find_parent_cycle(&self) -> Option<CommitId> {
        const UNSEEN: u8 = 0;
        const ON_PATH: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNSEEN; self.commits.len()];
        for start in 0..self.commits.len() {
            if state[start] != UNSEEN {
                continue;
            }
            state[start] = ON_PATH;
            let mut stack = vec![(start, 0usize)];
            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                match self.commits[node].parents.get(next) {
                    Some(parent) => {
                        top.1 += 1;
                        match state[parent.0] {
                            ON_PATH => return Some(*parent),
                            UNSEEN => {
                                state[parent.0] = ON_PATH;
                                stack.push((parent.0, 0));
                            }
                            _ => {}
                        }
                    }
                    None => {
                        state[node] = DONE;
                        stack.pop();
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
