//! `hg log` grammar.
//!
//! ```text
//! changeset:   5:1f626050434f
//! branch:      develop
//! tag:         tip
//! parent:      3:52324c976823
//! parent:      4:46272b255675
//! user:        Tom Mason <tom@example.com>
//! date:        Thu Jan 10 14:32:56 2013 +0100
//! summary:     merged feature into develop
//! ```
//!
//! Changesets carry a local revision number. `parent:` lines are printed only
//! when the parents are not implied by revision order, and at most twice.

use super::{compile, BoundaryRule, FieldKind, FieldRule, FormatKind, Grammar, ParentRule, Transform, LOG_DATE_FORMAT};
use crate::BranchflowError;

pub const NATIVE_DEFAULT_BRANCH: &str = "default";

/// Mercurial's moving tag on the newest changeset; not a real tag.
pub const SENTINEL_TAG: &str = "tip";

pub fn grammar() -> Result<Grammar, BranchflowError> {
    Ok(Grammar {
        kind: FormatKind::Mercurial,
        boundary: BoundaryRule::new(r"(?i)^changeset: +(\d+):([a-z0-9]{10,})$", 2)?
            .with_revision(1),
        fields: vec![
            FieldRule::new(FieldKind::Author, r"(?i)^user: +(.*)$", &[1])?
                .with_transform(Transform::Trim),
            FieldRule::new(FieldKind::Branch, r"(?i)^branch: +(.*)$", &[1])?
                .with_transform(Transform::Trim),
            FieldRule::new(FieldKind::Date, r"(?i)^date: +(.*)$", &[1])?
                .with_transform(Transform::Date(LOG_DATE_FORMAT)),
            FieldRule::new(FieldKind::Tag, r"(?i)^tag: +(.*)$", &[1])?
                .with_transform(Transform::TagFilter(SENTINEL_TAG)),
        ],
        parent: Some(ParentRule::new(r"(?i)^parent: +(\d+):([a-z0-9]{10,})$", 2)?),
        comment_prefix: Some(compile(r"(?i)^summary: *(.*)$")?),
        native_default_branch: NATIVE_DEFAULT_BRANCH,
        sentinel_tag: Some(SENTINEL_TAG),
    })
}
