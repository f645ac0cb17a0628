//! `git log` (default medium format) grammar.
//!
//! ```text
//! commit 9c4b6a0c2f7e1d3b5a8f9e0d1c2b3a4f5e6d7c8b (HEAD -> develop, tag: v0.2)
//! Merge: cbb34a3 de8c04c
//! Author: Jane Doe <jane@example.com>
//! Date:   Thu Mar 14 10:11:12 2013 +0100
//!
//!     Merge branch 'feature'
//! ```
//!
//! No revision numbers. Parents appear only for merges.

use super::{BoundaryRule, Decoration, FieldKind, FieldRule, FormatKind, Grammar, Transform, LOG_DATE_FORMAT};
use crate::BranchflowError;

pub const NATIVE_DEFAULT_BRANCH: &str = "master";

pub fn grammar() -> Result<Grammar, BranchflowError> {
    Ok(Grammar {
        kind: FormatKind::Git,
        boundary: BoundaryRule::new(r"(?i)^commit ([a-z0-9]{40,})(?: \((.*)\))?$", 1)?
            .with_decoration(2, Decoration::GitRefs),
        fields: vec![
            FieldRule::new(FieldKind::Author, r"(?i)^Author: (.*)$", &[1])?
                .with_transform(Transform::Trim),
            FieldRule::new(FieldKind::Merge, r"(?i)^Merge: ([0-9a-z]{7,}) ([0-9a-z]{7,})$", &[1, 2])?,
            FieldRule::new(FieldKind::Date, r"(?i)^Date:\s*(.*)$", &[1])?
                .with_transform(Transform::Date(LOG_DATE_FORMAT)),
        ],
        parent: None,
        comment_prefix: None,
        native_default_branch: NATIVE_DEFAULT_BRANCH,
        sentinel_tag: None,
    })
}
