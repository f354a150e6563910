//! Repository-wide baselines used to judge whether a file is anomalous.

use std::collections::{HashMap, HashSet};

use impact_core::Commit;
use serde::{Deserialize, Serialize};

use crate::bugfix::is_bug_fix;
use crate::rounding::round_tenths;

/// Per-file averages across the whole commit corpus.
///
/// # Examples
///
/// ```
/// use impact_pulse::averages::RepoAverages;
///
/// let avg = RepoAverages {
///     avg_commits_per_file: 2.0,
///     avg_bug_fix_percentage: 66.7,
/// };
/// assert!(avg.avg_bug_fix_percentage <= 100.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoAverages {
    /// Mean number of commits touching each file, one decimal.
    pub avg_commits_per_file: f64,
    /// Unweighted mean of per-file bug-fix percentages (0–100), one decimal.
    pub avg_bug_fix_percentage: f64,
}

#[derive(Default)]
struct FileTally {
    commits: u32,
    bug_fixes: u32,
}

/// Compute [`RepoAverages`] over every file touched in `commits`.
///
/// Only files that appear in at least one commit count towards the
/// denominators. The bug-fix average is the mean of per-file percentages, so
/// a file touched once by a fix weighs as much as one touched fifty times.
/// A commit listing the same path twice counts once for that path.
/// The analyzer always passes [`DEFAULT_BUG_FIX_KEYWORDS`](impact_core::DEFAULT_BUG_FIX_KEYWORDS).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::{Commit, DEFAULT_BUG_FIX_KEYWORDS};
/// use impact_pulse::averages::compute_repo_averages;
///
/// let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
/// let commit = |msg: &str, files: &[&str]| Commit {
///     id: msg.into(),
///     message: msg.into(),
///     authored_at: at,
///     touched_files: files.iter().map(|f| f.to_string()).collect(),
/// };
/// let commits = vec![
///     commit("Add feature", &["a.ts", "b.ts"]),
///     commit("Fix bug in a", &["a.ts"]),
/// ];
/// let avg = compute_repo_averages(&commits, DEFAULT_BUG_FIX_KEYWORDS);
/// assert_eq!(avg.avg_commits_per_file, 1.5);
/// assert_eq!(avg.avg_bug_fix_percentage, 25.0);
/// ```
pub fn compute_repo_averages<S: AsRef<str>>(commits: &[Commit], keywords: &[S]) -> RepoAverages {
    let mut tallies: HashMap<&str, FileTally> = HashMap::new();

    for commit in commits {
        if commit.touched_files.is_empty() {
            continue;
        }

        let bug_fix = is_bug_fix(&commit.message, keywords);
        let mut seen = HashSet::new();
        for path in &commit.touched_files {
            if !seen.insert(path.as_str()) {
                continue;
            }
            let tally = tallies.entry(path.as_str()).or_default();
            tally.commits += 1;
            if bug_fix {
                tally.bug_fixes += 1;
            }
        }
    }

    if tallies.is_empty() {
        return RepoAverages::default();
    }

    let file_count = tallies.len() as f64;
    let total_commits: u64 = tallies.values().map(|t| u64::from(t.commits)).sum();
    let percentage_sum: f64 = tallies
        .values()
        .map(|t| f64::from(t.bug_fixes) / f64::from(t.commits) * 100.0)
        .sum();

    let averages = RepoAverages {
        avg_commits_per_file: round_tenths(total_commits as f64 / file_count),
        avg_bug_fix_percentage: round_tenths(percentage_sum / file_count),
    };
    tracing::debug!(
        files = tallies.len(),
        avg_commits = averages.avg_commits_per_file,
        avg_bug_fix = averages.avg_bug_fix_percentage,
        "computed repository averages"
    );
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use impact_core::DEFAULT_BUG_FIX_KEYWORDS;

    fn commit(message: &str, files: &[&str]) -> Commit {
        Commit {
            id: message.into(),
            message: message.into(),
            authored_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            touched_files: files.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    fn averages(commits: &[Commit]) -> RepoAverages {
        compute_repo_averages(commits, DEFAULT_BUG_FIX_KEYWORDS)
    }

    #[test]
    fn empty_corpus_is_zero() {
        let avg = averages(&[]);
        assert_eq!(avg.avg_commits_per_file, 0.0);
        assert_eq!(avg.avg_bug_fix_percentage, 0.0);
    }

    #[test]
    fn commits_without_files_contribute_nothing() {
        let avg = averages(&[commit("Fix something", &[]), commit("Add feature", &[])]);
        assert_eq!(avg, RepoAverages::default());
    }

    #[test]
    fn mixed_files_average() {
        let commits = vec![
            commit("Add feature", &["a.ts", "b.ts"]),
            commit("Fix bug in a", &["a.ts"]),
        ];
        let avg = averages(&commits);
        assert_eq!(avg.avg_commits_per_file, 1.5);
        assert_eq!(avg.avg_bug_fix_percentage, 25.0);
    }

    #[test]
    fn percentage_is_unweighted_mean_of_files() {
        // A: 3 commits, 1 fix (33.3%). B: 1 commit, 1 fix (100%).
        // Global ratio would be 2/4 = 50%; the per-file mean is 66.7%.
        let commits = vec![
            commit("Fix crash", &["a.rs"]),
            commit("Add endpoint", &["a.rs"]),
            commit("Tidy imports", &["a.rs"]),
            commit("Hotfix config", &["b.rs"]),
        ];
        let avg = averages(&commits);
        assert_eq!(avg.avg_commits_per_file, 2.0);
        assert_eq!(avg.avg_bug_fix_percentage, 66.7);
    }

    #[test]
    fn duplicate_paths_in_one_commit_count_once() {
        let commits = vec![commit("Add feature", &["a.ts", "a.ts"])];
        assert_eq!(averages(&commits).avg_commits_per_file, 1.0);
    }

    #[test]
    fn keyword_list_decides_bug_fix_share() {
        let commits = vec![commit("Resolve crash", &["a.ts"])];
        assert_eq!(averages(&commits).avg_bug_fix_percentage, 0.0);
        assert_eq!(
            compute_repo_averages(&commits, &["resolve"]).avg_bug_fix_percentage,
            100.0
        );
    }

    #[test]
    fn ignores_dates() {
        let mut old = commit("Add feature", &["a.ts"]);
        old.authored_at = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let commits = vec![old, commit("Add more", &["a.ts"])];
        assert_eq!(averages(&commits).avg_commits_per_file, 2.0);
    }
}
