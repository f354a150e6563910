//! Commit history extraction from a local repository via git2.
//!
//! Produces the same [`Commit`] records the analyzer consumes from synced
//! data, so a repository can be analyzed without any GitHub sync.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use git2::{Delta, DiffFindOptions, DiffOptions, Repository, Sort};
use impact_core::{Commit, HistoryConfig, ImpactError};

/// Options for history mining.
///
/// # Examples
///
/// ```
/// use impact_pulse::mining::MiningOptions;
///
/// let opts = MiningOptions::default();
/// assert_eq!(opts.since_days, None);
/// assert_eq!(opts.max_files_per_commit, 25);
/// ```
#[derive(Debug, Clone)]
pub struct MiningOptions {
    /// Only include commits from the last N days. `None` walks everything.
    pub since_days: Option<u64>,
    /// Skip commits touching more files than this (default: 25).
    pub max_files_per_commit: usize,
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            since_days: None,
            max_files_per_commit: 25,
            branch: None,
        }
    }
}

impl From<&HistoryConfig> for MiningOptions {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            since_days: config.since_days,
            max_files_per_commit: config.max_files_per_commit,
            branch: None,
        }
    }
}

/// Mine commit history from a git repository.
///
/// Returns commits newest first by committer time, each carrying its author
/// date, full message, and the paths it touched relative to the repository
/// root. Deleted files are
/// reported under their old path, renamed files under their new one.
/// Commits touching more than `max_files_per_commit` files are skipped so
/// that sweeping refactors don't drown out real activity.
///
/// # Errors
///
/// Returns [`ImpactError::Git`] if the repository cannot be opened or walked.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use chrono::Utc;
/// use impact_pulse::mining::{mine_history, MiningOptions};
///
/// let commits = mine_history(Path::new("."), &MiningOptions::default(), Utc::now()).unwrap();
/// for c in &commits {
///     println!("{}: {} ({} files)", &c.id[..7], c.subject(), c.touched_files.len());
/// }
/// ```
pub fn mine_history(
    repo_path: &Path,
    options: &MiningOptions,
    now: DateTime<Utc>,
) -> Result<Vec<Commit>, ImpactError> {
    let repo = Repository::open(repo_path)
        .map_err(|e| ImpactError::Git(format!("failed to open repository: {e}")))?;

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| ImpactError::Git(format!("failed to create revwalk: {e}")))?;

    revwalk
        .set_sorting(Sort::TIME)
        .map_err(|e| ImpactError::Git(format!("failed to sort revwalk: {e}")))?;

    if let Some(ref branch) = options.branch {
        let reference = repo
            .resolve_reference_from_short_name(branch)
            .map_err(|e| ImpactError::Git(format!("failed to resolve branch '{branch}': {e}")))?;
        let oid = reference
            .target()
            .ok_or_else(|| ImpactError::Git(format!("branch '{branch}' has no target")))?;
        revwalk
            .push(oid)
            .map_err(|e| ImpactError::Git(format!("failed to push oid: {e}")))?;
    } else {
        revwalk
            .push_head()
            .map_err(|e| ImpactError::Git(format!("failed to push HEAD: {e}")))?;
    }

    let cutoff = options.since_days.map(|days| cutoff(now, days));
    let mut commits = Vec::new();
    let mut skipped = 0usize;

    for oid_result in revwalk {
        let oid = oid_result.map_err(|e| ImpactError::Git(format!("revwalk error: {e}")))?;

        let commit = repo
            .find_commit(oid)
            .map_err(|e| ImpactError::Git(format!("failed to find commit: {e}")))?;

        // The walk is ordered by committer time, so a rebased commit can
        // carry an older author date than its successors.
        let seconds = commit.author().when().seconds();
        let authored_at = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| ImpactError::Git(format!("commit {oid} has invalid time {seconds}")))?;

        if cutoff.is_some_and(|c| authored_at < c) {
            continue;
        }

        let touched_files = touched_paths(&repo, &commit)?;
        if touched_files.len() > options.max_files_per_commit {
            skipped += 1;
            continue;
        }

        commits.push(Commit {
            id: oid.to_string(),
            message: commit.message().unwrap_or("").trim_end().to_string(),
            authored_at,
            touched_files,
        });
    }

    tracing::debug!(
        path = %repo_path.display(),
        commits = commits.len(),
        skipped,
        "mined history"
    );
    Ok(commits)
}

fn cutoff(now: DateTime<Utc>, since_days: u64) -> DateTime<Utc> {
    i64::try_from(since_days)
        .ok()
        .and_then(TimeDelta::try_days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn touched_paths(repo: &Repository, commit: &git2::Commit) -> Result<Vec<String>, ImpactError> {
    let commit_tree = commit
        .tree()
        .map_err(|e| ImpactError::Git(format!("failed to get commit tree: {e}")))?;

    let parent_tree = if commit.parent_count() > 0 {
        let parent = commit
            .parent(0)
            .map_err(|e| ImpactError::Git(format!("failed to get parent: {e}")))?;
        Some(
            parent
                .tree()
                .map_err(|e| ImpactError::Git(format!("failed to get parent tree: {e}")))?,
        )
    } else {
        None
    };

    let mut diff_opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&commit_tree),
            Some(&mut diff_opts),
        )
        .map_err(|e| ImpactError::Git(format!("failed to compute diff: {e}")))?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| ImpactError::Git(format!("failed to find renames: {e}")))?;

    let mut paths = BTreeSet::new();
    for delta in diff.deltas() {
        let file = match delta.status() {
            Delta::Deleted => delta.old_file(),
            _ => delta.new_file(),
        };
        if let Some(path) = file.path() {
            let path = path.to_string_lossy();
            if !path.is_empty() {
                paths.insert(path.into_owned());
            }
        }
    }

    Ok(paths.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use git2::{Signature, Time};
    use std::fs;

    struct Fixture {
        dir: tempfile::TempDir,
        repo: Repository,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let repo = Repository::init(dir.path()).unwrap();
            Self { dir, repo }
        }

        fn commit(&self, message: &str, at: DateTime<Utc>, writes: &[(&str, &str)], removes: &[&str]) {
            self.commit_as(message, at, at, writes, removes);
        }

        fn commit_as(
            &self,
            message: &str,
            authored: DateTime<Utc>,
            committed: DateTime<Utc>,
            writes: &[(&str, &str)],
            removes: &[&str],
        ) {
            let mut index = self.repo.index().unwrap();
            for (path, content) in writes {
                let full = self.dir.path().join(path);
                if let Some(parent) = full.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(&full, content).unwrap();
                index.add_path(Path::new(path)).unwrap();
            }
            for path in removes {
                fs::remove_file(self.dir.path().join(path)).unwrap();
                index.remove_path(Path::new(path)).unwrap();
            }
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = self.repo.find_tree(tree_id).unwrap();
            let author =
                Signature::new("Dev", "dev@example.com", &Time::new(authored.timestamp(), 0))
                    .unwrap();
            let committer =
                Signature::new("Dev", "dev@example.com", &Time::new(committed.timestamp(), 0))
                    .unwrap();
            let parent = self
                .repo
                .head()
                .ok()
                .and_then(|h| h.target())
                .map(|oid| self.repo.find_commit(oid).unwrap());
            let parents: Vec<&git2::Commit> = parent.iter().collect();
            self.repo
                .commit(Some("HEAD"), &author, &committer, message, &tree, &parents)
                .unwrap();
        }
    }

    fn day(month: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, d, 10, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap()
    }

    fn sample_repo() -> Fixture {
        let fx = Fixture::new();
        fx.commit(
            "Initial import",
            day(1, 2),
            &[("src/net.rs", "a"), ("src/lib.rs", "b")],
            &[],
        );
        fx.commit("Fix net timeout\n\nLonger body.", day(1, 20), &[("src/net.rs", "a2")], &[]);
        fx.commit("Remove lib", day(2, 10), &[], &["src/lib.rs"]);
        fx
    }

    #[test]
    fn defaults_walk_everything() {
        let opts = MiningOptions::default();
        assert_eq!(opts.since_days, None);
        assert_eq!(opts.max_files_per_commit, 25);
        assert!(opts.branch.is_none());
    }

    #[test]
    fn options_follow_history_config() {
        let config = HistoryConfig {
            since_days: Some(30),
            max_files_per_commit: 5,
        };
        let opts = MiningOptions::from(&config);
        assert_eq!(opts.since_days, Some(30));
        assert_eq!(opts.max_files_per_commit, 5);
    }

    #[test]
    fn mines_commits_newest_first() {
        let fx = sample_repo();
        let commits = mine_history(fx.dir.path(), &MiningOptions::default(), now()).unwrap();
        let subjects: Vec<&str> = commits.iter().map(|c| c.subject()).collect();
        assert_eq!(subjects, vec!["Remove lib", "Fix net timeout", "Initial import"]);
        assert_eq!(commits[0].authored_at, day(2, 10));
        assert_eq!(commits[0].id.len(), 40);
    }

    #[test]
    fn records_touched_paths() {
        let fx = sample_repo();
        let commits = mine_history(fx.dir.path(), &MiningOptions::default(), now()).unwrap();
        assert_eq!(commits[2].touched_files, vec!["src/lib.rs", "src/net.rs"]);
        assert_eq!(commits[1].touched_files, vec!["src/net.rs"]);
        // Deletions keep the old path.
        assert_eq!(commits[0].touched_files, vec!["src/lib.rs"]);
    }

    #[test]
    fn keeps_full_message() {
        let fx = sample_repo();
        let commits = mine_history(fx.dir.path(), &MiningOptions::default(), now()).unwrap();
        assert_eq!(commits[1].message, "Fix net timeout\n\nLonger body.");
    }

    #[test]
    fn since_days_cuts_off_old_commits() {
        let fx = sample_repo();
        let opts = MiningOptions {
            since_days: Some(30),
            ..MiningOptions::default()
        };
        let commits = mine_history(fx.dir.path(), &opts, now()).unwrap();
        assert_eq!(commits.len(), 2);
        assert!(commits.iter().all(|c| c.authored_at >= now() - TimeDelta::days(30)));
    }

    #[test]
    fn uses_author_date_not_committer_date() {
        let fx = sample_repo();
        let authored = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let committed = Utc.with_ymd_and_hms(2026, 2, 11, 0, 0, 0).unwrap();
        fx.commit_as("Rebased fix", authored, committed, &[("src/net.rs", "a3")], &[]);

        let commits = mine_history(fx.dir.path(), &MiningOptions::default(), now()).unwrap();
        assert_eq!(commits[0].subject(), "Rebased fix");
        assert_eq!(commits[0].authored_at, authored);
    }

    #[test]
    fn since_days_filters_on_author_date() {
        let fx = sample_repo();
        let authored = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let committed = Utc.with_ymd_and_hms(2026, 2, 11, 0, 0, 0).unwrap();
        fx.commit_as("Rebased fix", authored, committed, &[("src/net.rs", "a3")], &[]);
        let opts = MiningOptions {
            since_days: Some(30),
            ..MiningOptions::default()
        };

        let commits = mine_history(fx.dir.path(), &opts, now()).unwrap();
        let subjects: Vec<&str> = commits.iter().map(|c| c.subject()).collect();
        // The old-authored commit is dropped but the walk carries on past it.
        assert_eq!(subjects, vec!["Remove lib", "Fix net timeout"]);
    }

    #[test]
    fn large_commits_are_skipped() {
        let fx = sample_repo();
        let opts = MiningOptions {
            max_files_per_commit: 1,
            ..MiningOptions::default()
        };
        let commits = mine_history(fx.dir.path(), &opts, now()).unwrap();
        assert_eq!(commits.len(), 2);
        assert!(commits.iter().all(|c| c.touched_files.len() <= 1));
    }

    #[test]
    fn huge_since_days_saturates() {
        assert_eq!(cutoff(now(), u64::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn missing_repository_is_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = mine_history(dir.path(), &MiningOptions::default(), now()).unwrap_err();
        assert!(matches!(err, ImpactError::Git(_)));
    }

    #[test]
    fn unknown_branch_is_git_error() {
        let fx = sample_repo();
        let opts = MiningOptions {
            branch: Some("does-not-exist".into()),
            ..MiningOptions::default()
        };
        let err = mine_history(fx.dir.path(), &opts, now()).unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }
}
