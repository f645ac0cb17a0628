//! Unit tests for grammars, exercised without the parser loop.

use super::*;
use chrono::{Datelike, Timelike};

const GIT_HASH: &str = "1f626050434f0a0b0c0d0e0f1011121314151617";

// ─── Format selector ────────────────────────────────────────────────

#[test]
fn test_format_kind_from_str() {
    assert_eq!("git".parse::<FormatKind>().unwrap(), FormatKind::Git);
    assert_eq!("HG".parse::<FormatKind>().unwrap(), FormatKind::Mercurial);
    assert_eq!("mercurial".parse::<FormatKind>().unwrap(), FormatKind::Mercurial);
    assert!(matches!("svn".parse::<FormatKind>(), Err(BranchflowError::UnknownFormat(_))));
}

#[test]
fn test_all_builtin_grammars_compile() {
    for kind in FormatKind::ALL {
        let grammar = kind.grammar().unwrap();
        assert_eq!(grammar.kind, kind);
    }
}

#[test]
fn test_invalid_pattern_is_error() {
    let err = FieldRule::new(FieldKind::Author, "^(unclosed", &[1]).unwrap_err();
    assert!(matches!(err, BranchflowError::InvalidRegex { .. }));
}

// ─── Git ────────────────────────────────────────────────────────────

#[test]
fn test_git_boundary_plain() {
    let g = git::grammar().unwrap();
    let b = g.match_boundary(&format!("commit {}", GIT_HASH)).unwrap();
    assert_eq!(b.hash, GIT_HASH);
    assert_eq!(b.revision, None);
    assert_eq!(b.branch, None);
    assert_eq!(b.tag, None);
}

#[test]
fn test_git_boundary_old_style_decoration() {
    let g = git::grammar().unwrap();
    let b = g.match_boundary(&format!("commit {} (HEAD, develop)", GIT_HASH)).unwrap();
    assert_eq!(b.branch.as_deref(), Some("develop"));
}

#[test]
fn test_git_boundary_arrow_decoration_with_tag() {
    let g = git::grammar().unwrap();
    let b = g
        .match_boundary(&format!("commit {} (HEAD -> feature/x, origin/feature/x, tag: v1.2)", GIT_HASH))
        .unwrap();
    assert_eq!(b.branch.as_deref(), Some("feature/x"));
    assert_eq!(b.tag.as_deref(), Some("v1.2"));
}

#[test]
fn test_git_boundary_rejects_short_hash() {
    let g = git::grammar().unwrap();
    assert!(g.match_boundary("commit abc1234").is_none());
    assert!(g.match_boundary("    commit message mentioning commit").is_none());
}

#[test]
fn test_parse_git_decoration_tag_only() {
    assert_eq!(parse_git_decoration("tag: v2"), (None, Some("v2".to_string())));
    assert_eq!(parse_git_decoration("HEAD"), (None, None));
}

#[test]
fn test_git_merge_rule_order() {
    let g = git::grammar().unwrap();
    let write = g.match_field("Merge: cbb34a3 de8c04c").unwrap().unwrap();
    assert_eq!(
        write,
        FieldWrite::Merge {
            to: "cbb34a3".to_string(),
            from: "de8c04c".to_string()
        }
    );
}

#[test]
fn test_git_author_and_date() {
    let g = git::grammar().unwrap();
    assert_eq!(
        g.match_field("Author: Jane Doe <jane@example.com>").unwrap().unwrap(),
        FieldWrite::Author("Jane Doe <jane@example.com>".to_string())
    );

    match g.match_field("Date:   Mon Mar 4 09:05:00 2013 +0100").unwrap().unwrap() {
        FieldWrite::Date(d) => {
            assert_eq!(d.year(), 2013);
            assert_eq!(d.day(), 4);
            assert_eq!(d.hour(), 9);
            assert_eq!(d.offset().local_minus_utc(), 3600);
        }
        other => panic!("expected date, got {:?}", other),
    }
}

#[test]
fn test_git_bad_date_is_transform_error() {
    let g = git::grammar().unwrap();
    let result = g.match_field("Date: last tuesday").unwrap();
    assert!(result.unwrap_err().contains("last tuesday"));
}

#[test]
fn test_git_comment_lines_fall_through() {
    let g = git::grammar().unwrap();
    assert!(g.match_field("    Merge branch 'develop'").is_none());
    assert!(g.match_parent("parent: 1:52324c976823").is_none());
    assert_eq!(g.comment_text("    Fix typo"), "    Fix typo");
}

// ─── Mercurial ──────────────────────────────────────────────────────

#[test]
fn test_hg_boundary_captures_revision() {
    let g = mercurial::grammar().unwrap();
    let b = g.match_boundary("changeset:   5:1f626050434f").unwrap();
    assert_eq!(b.hash, "1f626050434f");
    assert_eq!(b.revision, Some(5));
}

#[test]
fn test_hg_tip_is_filtered() {
    let g = mercurial::grammar().unwrap();
    assert_eq!(g.match_field("tag:         tip").unwrap().unwrap(), FieldWrite::Tag(None));
    assert_eq!(
        g.match_field("tag:         v1.0").unwrap().unwrap(),
        FieldWrite::Tag(Some("v1.0".to_string()))
    );
}

#[test]
fn test_hg_parent_rule() {
    let g = mercurial::grammar().unwrap();
    assert_eq!(
        g.match_parent("parent:      3:52324c976823"),
        Some(FieldWrite::Parent("52324c976823".to_string()))
    );
    // parent lines are not part of the scalar field table
    assert!(g.match_field("parent:      3:52324c976823").is_none());
}

#[test]
fn test_hg_summary_prefix_stripped() {
    let g = mercurial::grammar().unwrap();
    assert_eq!(g.comment_text("summary:     added readme"), "added readme");
    assert_eq!(g.comment_text("free text"), "free text");
}

#[test]
fn test_hg_branch_and_user() {
    let g = mercurial::grammar().unwrap();
    assert_eq!(
        g.match_field("branch:      develop").unwrap().unwrap(),
        FieldWrite::Branch("develop".to_string())
    );
    assert_eq!(
        g.match_field("user:        Tom Mason").unwrap().unwrap(),
        FieldWrite::Author("Tom Mason".to_string())
    );
}

#[test]
fn test_parse_git_decoration_skips_non_branch_entries() {
    assert_eq!(parse_git_decoration("grafted, develop"), (Some("develop".to_string()), None));
    assert_eq!(parse_git_decoration("grafted"), (None, None));
    assert_eq!(parse_git_decoration("origin/HEAD, refs/stash"), (None, None));
}

#[test]
fn test_parse_git_decoration_remote_refs_keep_prefix() {
    // local branches come first, so they win over remote-tracking refs
    assert_eq!(
        parse_git_decoration("HEAD -> main, origin/main, origin/HEAD"),
        (Some("main".to_string()), None)
    );
    // a remote-only decoration keeps the remote prefix for the builder to strip
    assert_eq!(
        parse_git_decoration("origin/feature/x"),
        (Some("origin/feature/x".to_string()), None)
    );
}

#[test]
fn test_parse_git_decoration_full_ref_names() {
    assert_eq!(
        parse_git_decoration("HEAD -> refs/heads/develop, refs/remotes/origin/develop, tag: refs/tags/v3"),
        (Some("develop".to_string()), Some("v3".to_string()))
    );
}
