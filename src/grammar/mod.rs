//! Format grammars: declarative line rules for one VCS log dialect each.
//!
//! A grammar is configuration, not control flow. It lists
//! - a boundary rule whose match starts a new commit record,
//! - an ordered table of field rules (first match wins),
//! - an optional multi-valued parent rule,
//! - a continuation rule (optionally stripping a prefix such as `summary:`).
//!
//! Field rules produce a typed [`FieldWrite`]; the parser assigns it to the
//! matching [`RawRecord`](crate::parser::RawRecord) field. Adding a dialect means
//! writing another constructor like [`git::grammar`], nothing else.

pub mod git;
pub mod mercurial;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::BranchflowError;

/// `Thu Mar 14 10:11:12 2013 +0100`, the date rendering shared by git and hg.
pub const LOG_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Compile a grammar pattern, mapping failures to [`BranchflowError::InvalidRegex`].
pub fn compile(pattern: &str) -> Result<Regex, BranchflowError> {
    Regex::new(pattern).map_err(|source| BranchflowError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

// ─── Format selector ────────────────────────────────────────────────

/// Log dialect chosen by the caller. Never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Git,
    Mercurial,
}

impl FormatKind {
    pub const ALL: [FormatKind; 2] = [FormatKind::Git, FormatKind::Mercurial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Mercurial => "hg",
        }
    }

    /// Build the grammar for this dialect.
    pub fn grammar(&self) -> Result<Grammar, BranchflowError> {
        match self {
            Self::Git => git::grammar(),
            Self::Mercurial => mercurial::grammar(),
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FormatKind {
    type Err = BranchflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "hg" | "mercurial" => Ok(Self::Mercurial),
            other => Err(BranchflowError::UnknownFormat(other.to_string())),
        }
    }
}

// ─── Rule types ─────────────────────────────────────────────────────

/// What a boundary line yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub hash: String,
    pub revision: Option<i64>,
    pub branch: Option<String>,
    pub tag: Option<String>,
}

/// How an inline annotation after the hash is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// Git ref decoration: `HEAD -> main, origin/main, tag: v1.0`.
    GitRefs,
}

/// Pattern whose match starts a new commit record.
#[derive(Debug, Clone)]
pub struct BoundaryRule {
    regex: Regex,
    hash_group: usize,
    revision_group: Option<usize>,
    decoration: Option<(usize, Decoration)>,
}

impl BoundaryRule {
    pub fn new(pattern: &str, hash_group: usize) -> Result<Self, BranchflowError> {
        Ok(Self {
            regex: compile(pattern)?,
            hash_group,
            revision_group: None,
            decoration: None,
        })
    }

    pub fn with_revision(mut self, group: usize) -> Self {
        self.revision_group = Some(group);
        self
    }

    pub fn with_decoration(mut self, group: usize, kind: Decoration) -> Self {
        self.decoration = Some((group, kind));
        self
    }

    /// Match a line. A matched line with an empty hash capture still yields a
    /// boundary; the builder rejects it as structurally invalid.
    pub fn matches(&self, line: &str) -> Option<Boundary> {
        let caps = self.regex.captures(line)?;
        let hash = caps
            .get(self.hash_group)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let revision = self
            .revision_group
            .and_then(|g| caps.get(g))
            .and_then(|m| m.as_str().parse::<i64>().ok());
        let (branch, tag) = match self.decoration {
            Some((group, Decoration::GitRefs)) => caps
                .get(group)
                .map(|m| parse_git_decoration(m.as_str()))
                .unwrap_or((None, None)),
            None => (None, None),
        };
        Some(Boundary {
            hash,
            revision,
            branch,
            tag,
        })
    }
}

/// Decoration entries that never name a branch.
const NON_BRANCH_DECORATIONS: &[&str] = &["HEAD", "grafted", "replaced", "refs/stash"];

/// Split a git decoration into (branch, tag).
///
/// `HEAD -> x` yields `x`; bare `HEAD`, `grafted`, the stash and `<remote>/HEAD`
/// entries are dropped. Full ref names (`refs/heads/x`, `refs/tags/t`,
/// `refs/remotes/origin/x`) are shortened the way `--decorate=short` prints
/// them. The first tag is the tag and the first remaining ref is the branch;
/// git lists local branches before remote-tracking ones. Remote-tracking refs
/// keep their remote prefix here, the builder strips it.
pub fn parse_git_decoration(decoration: &str) -> (Option<String>, Option<String>) {
    let mut branch = None;
    let mut tag = None;
    for entry in decoration.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let entry = entry.strip_prefix("HEAD -> ").unwrap_or(entry).trim();
        if let Some(t) = entry
            .strip_prefix("tag: ")
            .map(|t| t.trim().strip_prefix("refs/tags/").unwrap_or(t.trim()))
        {
            if tag.is_none() {
                tag = Some(t.to_string());
            }
            continue;
        }
        if NON_BRANCH_DECORATIONS.contains(&entry) || entry.ends_with("/HEAD") {
            continue;
        }
        let name = entry
            .strip_prefix("refs/heads/")
            .or_else(|| entry.strip_prefix("refs/remotes/"))
            .unwrap_or(entry);
        if branch.is_none() && !name.is_empty() {
            branch = Some(name.to_string());
        }
    }
    (branch, tag)
}

/// Scalar field a rule writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Author,
    Date,
    Branch,
    Tag,
    /// Two captures: first parent (`to`), second parent (`from`).
    Merge,
}

/// Per-field value transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    None,
    Trim,
    /// Parse with a chrono format string. Runs of whitespace are collapsed first.
    Date(&'static str),
    /// Drop the value when it equals the sentinel.
    TagFilter(&'static str),
}

impl Transform {
    fn text(&self, value: &str) -> Option<String> {
        match self {
            Transform::TagFilter(sentinel) if value.trim() == *sentinel => None,
            Transform::None => Some(value.to_string()),
            _ => Some(value.trim().to_string()),
        }
    }
}

/// Parse a log date, tolerating padding differences (`Mar  4` vs `Mar 4`).
pub fn parse_log_date(value: &str, format: &str) -> Result<DateTime<FixedOffset>, String> {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    DateTime::parse_from_str(&normalized, format)
        .map_err(|e| format!("cannot parse date '{}': {}", value.trim(), e))
}

/// Typed value produced by a field or parent rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWrite {
    Author(String),
    Date(DateTime<FixedOffset>),
    Branch(String),
    /// `None` when the sentinel filter dropped the value.
    Tag(Option<String>),
    Merge { to: String, from: String },
    Parent(String),
}

/// One metadata line rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub kind: FieldKind,
    regex: Regex,
    groups: Vec<usize>,
    transform: Transform,
}

impl FieldRule {
    pub fn new(kind: FieldKind, pattern: &str, groups: &[usize]) -> Result<Self, BranchflowError> {
        Ok(Self {
            kind,
            regex: compile(pattern)?,
            groups: groups.to_vec(),
            transform: Transform::None,
        })
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// `None` when the line does not match; `Some(Err)` when it matches but the transform fails.
    pub fn apply(&self, line: &str) -> Option<Result<FieldWrite, String>> {
        let caps = self.regex.captures(line)?;
        let group = |i: usize| {
            self.groups
                .get(i)
                .and_then(|&g| caps.get(g))
                .map(|m| m.as_str())
                .unwrap_or("")
        };
        let write = match self.kind {
            FieldKind::Date => {
                let format = match self.transform {
                    Transform::Date(format) => format,
                    _ => LOG_DATE_FORMAT,
                };
                parse_log_date(group(0), format).map(FieldWrite::Date)
            }
            FieldKind::Tag => Ok(FieldWrite::Tag(self.transform.text(group(0)))),
            FieldKind::Author => Ok(FieldWrite::Author(
                self.transform.text(group(0)).unwrap_or_default(),
            )),
            FieldKind::Branch => Ok(FieldWrite::Branch(
                self.transform.text(group(0)).unwrap_or_default(),
            )),
            FieldKind::Merge => Ok(FieldWrite::Merge {
                to: group(0).to_string(),
                from: group(1).to_string(),
            }),
        };
        Some(write)
    }
}

/// Multi-valued parent rule: each match appends one parent reference.
#[derive(Debug, Clone)]
pub struct ParentRule {
    regex: Regex,
    hash_group: usize,
}

impl ParentRule {
    pub fn new(pattern: &str, hash_group: usize) -> Result<Self, BranchflowError> {
        Ok(Self {
            regex: compile(pattern)?,
            hash_group,
        })
    }

    pub fn apply(&self, line: &str) -> Option<FieldWrite> {
        let caps = self.regex.captures(line)?;
        let hash = caps.get(self.hash_group)?.as_str().to_string();
        Some(FieldWrite::Parent(hash))
    }
}

// ─── Grammar ────────────────────────────────────────────────────────

/// Complete description of one log dialect.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub kind: FormatKind,
    pub boundary: BoundaryRule,
    /// Evaluated in order; the first match wins.
    pub fields: Vec<FieldRule>,
    pub parent: Option<ParentRule>,
    /// Continuation lines matching this keep only capture group 1.
    pub comment_prefix: Option<Regex>,
    /// The VCS's own name for its default branch, remapped by the builder.
    pub native_default_branch: &'static str,
    /// Tag value meaning "no tag".
    pub sentinel_tag: Option<&'static str>,
}

impl Grammar {
    pub fn match_boundary(&self, line: &str) -> Option<Boundary> {
        let mut boundary = self.boundary.matches(line)?;
        if let (Some(sentinel), Some(tag)) = (self.sentinel_tag, boundary.tag.as_deref()) {
            if tag == sentinel {
                boundary.tag = None;
            }
        }
        Some(boundary)
    }

    /// First field rule matching the line, in table order.
    pub fn match_field(&self, line: &str) -> Option<Result<FieldWrite, String>> {
        self.fields.iter().find_map(|rule| rule.apply(line))
    }

    pub fn match_parent(&self, line: &str) -> Option<FieldWrite> {
        self.parent.as_ref().and_then(|rule| rule.apply(line))
    }

    /// Text a continuation line contributes to the comment.
    pub fn comment_text<'a>(&self, line: &'a str) -> &'a str {
        self.comment_prefix
            .as_ref()
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(line)
    }
}

#[cfg(test)]
#[path = "grammar_tests.rs"]
mod tests;
