//! Shared log fixtures for unit tests.
//!
//! Both logs describe the same shape of history, newest first:
//! a root on the default branch, linear work on the default branch and on
//! `develop`, and a final merge of `develop` into the default branch.

/// Full hash of the git merge commit.
pub const GIT_MERGE: &str = "14091a9f2461267ee7e02525b4f1f2923f1c9849";
/// Full hash of the `develop` tip (abbreviated `de8c04c` in the merge line).
pub const GIT_DEVELOP: &str = "de8c04c418a6bc4deccf0f7d5182192d51a54e50";
/// Full hash of the master hotfix (abbreviated `cbb34a3` in the merge line).
pub const GIT_HOTFIX: &str = "cbb34a3bd9c0e56a8ca6101af4a111e1c30acee0";
pub const GIT_FEATURE: &str = "4b7615dce52c4c05ce4e1d374e9c61a13717ac7c";
pub const GIT_INITIAL: &str = "fd62812fbd9ec4c7f99aa4f6253fead2388eb238";

/// `git log` output: 5 commits, one merge, two decorated branch tips.
pub fn git_log() -> &'static str {
    concat!(
        "commit 14091a9f2461267ee7e02525b4f1f2923f1c9849 (HEAD, master)\n",
        "Merge: cbb34a3 de8c04c\n",
        "Author: Tom Mason <tom@example.com>\n",
        "Date:   Fri Mar 8 13:00:00 2013 +0100\n",
        "\n",
        "    Merge branch 'develop'\n",
        "\n",
        "commit de8c04c418a6bc4deccf0f7d5182192d51a54e50 (develop)\n",
        "Author: Jane Doe <jane@example.com>\n",
        "Date:   Thu Mar 7 12:00:00 2013 +0100\n",
        "\n",
        "    Finish feature\n",
        "\n",
        "commit cbb34a3bd9c0e56a8ca6101af4a111e1c30acee0\n",
        "Author: Tom Mason <tom@example.com>\n",
        "Date:   Wed Mar 6 11:00:00 2013 +0100\n",
        "\n",
        "    Hotfix on master\n",
        "\n",
        "commit 4b7615dce52c4c05ce4e1d374e9c61a13717ac7c\n",
        "Author: Jane Doe\n",
        "Date:   Tue Mar 5 10:00:00 2013 +0100\n",
        "\n",
        "    Start feature\n",
        "\n",
        "commit fd62812fbd9ec4c7f99aa4f6253fead2388eb238\n",
        "Author: Tom Mason\n",
        "Date:   Mon Mar 4 09:00:00 2013 +0100\n",
        "\n",
        "    Initial commit\n",
    )
}

/// `hg log` output: 6 changesets, one merge, `tip` plus one real tag.
pub fn hg_log() -> &'static str {
    concat!(
        "changeset:   5:1f626050434f\n",
        "tag:         tip\n",
        "parent:      3:52324c976823\n",
        "parent:      4:46272b255675\n",
        "user:        Tom Mason <tom@example.com>\n",
        "date:        Sat Mar 09 14:00:00 2013 +0100\n",
        "summary:     merge develop\n",
        "\n",
        "changeset:   4:46272b255675\n",
        "branch:      develop\n",
        "user:        Jane Doe\n",
        "date:        Fri Mar 08 13:00:00 2013 +0100\n",
        "summary:     develop work\n",
        "\n",
        "changeset:   3:52324c976823\n",
        "tag:         v0.1\n",
        "parent:      1:69dde1b48a92\n",
        "user:        Tom Mason\n",
        "date:        Thu Mar 07 12:00:00 2013 +0100\n",
        "summary:     release prep\n",
        "\n",
        "changeset:   2:9ee04bfe4fb7\n",
        "branch:      develop\n",
        "user:        Jane Doe <jane@example.com>\n",
        "date:        Wed Mar 06 11:00:00 2013 +0100\n",
        "summary:     start develop\n",
        "\n",
        "changeset:   1:69dde1b48a92\n",
        "user:        Tom Mason\n",
        "date:        Tue Mar 05 10:00:00 2013 +0100\n",
        "summary:     add readme\n",
        "\n",
        "changeset:   0:a1f1399bf6d7\n",
        "user:        Tom Mason <tom@example.com>\n",
        "date:        Mon Mar 04 09:00:00 2013 +0100\n",
        "summary:     initial\n",
    )
}
