use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use impact_core::{Commit, ImpactError, PrState, PullRequest};
use serde::{Deserialize, Serialize};

/// Directory under the home directory holding synced data.
pub const DATA_DIR: &str = ".impact-journal";

/// File name of the synced activity data.
pub const DATA_FILE: &str = "data.json";

/// Everything the sync step recorded: commits per repository and the user's
/// pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Commits keyed by repository name, in the order they were synced.
    pub commits: BTreeMap<String, Vec<Commit>>,
    /// Pull requests across all repositories.
    pub pull_requests: Vec<PullRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawData {
    #[serde(default)]
    commits: BTreeMap<String, Vec<RawCommit>>,
    #[serde(default)]
    pull_requests: RawPullRequests,
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
    /// Only present once the commit has been enriched with file detail.
    #[serde(default)]
    files: Option<Vec<RawFile>>,
}

#[derive(Deserialize)]
struct RawCommitDetail {
    message: String,
    author: RawAuthor,
}

#[derive(Deserialize)]
struct RawAuthor {
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawFile {
    filename: String,
}

#[derive(Default, Deserialize)]
struct RawPullRequests {
    #[serde(default)]
    items: Vec<RawPullRequest>,
}

#[derive(Deserialize)]
struct RawPullRequest {
    title: String,
    state: PrState,
    created_at: DateTime<Utc>,
    repository_url: String,
}

impl From<RawCommit> for Commit {
    fn from(raw: RawCommit) -> Self {
        Commit {
            id: raw.sha,
            message: raw.commit.message,
            authored_at: raw.commit.author.date,
            touched_files: raw
                .files
                .unwrap_or_default()
                .into_iter()
                .map(|f| f.filename)
                .collect(),
        }
    }
}

impl From<RawPullRequest> for PullRequest {
    fn from(raw: RawPullRequest) -> Self {
        PullRequest {
            title: raw.title,
            state: raw.state,
            created_at: raw.created_at,
            repository_url: raw.repository_url,
        }
    }
}

/// Default location of the synced data file: `~/.impact-journal/data.json`.
///
/// Falls back to a relative path when the home directory is unknown.
pub fn default_data_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(DATA_DIR)
        .join(DATA_FILE)
}

impl ActivityLog {
    /// Load the activity log from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Io`] if the file cannot be read and
    /// [`ImpactError::Serialization`] if it is not valid activity data.
    pub fn load(path: &Path) -> Result<Option<Self>, ImpactError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no activity data file");
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let log = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            repositories = log.commits.len(),
            pull_requests = log.pull_requests.len(),
            "loaded activity data"
        );
        Ok(Some(log))
    }

    /// Load the activity log, treating a missing file as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::NoData`] if nothing has been synced yet, plus
    /// the errors of [`ActivityLog::load`].
    pub fn load_required(path: &Path) -> Result<Self, ImpactError> {
        Self::load(path)?.ok_or_else(|| ImpactError::NoData(path.to_path_buf()))
    }

    /// Parse the synced JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Serialization`] if the document is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use impact_reports::store::ActivityLog;
    ///
    /// let json = r#"{
    ///     "commits": {
    ///         "project-a": [{
    ///             "sha": "abc123",
    ///             "commit": { "message": "Fix bug", "author": { "date": "2026-01-15T10:00:00Z" } },
    ///             "files": [{ "filename": "src/app.ts" }]
    ///         }]
    ///     },
    ///     "pullRequests": { "items": [] }
    /// }"#;
    /// let log = ActivityLog::from_json(json).unwrap();
    /// let commits = log.all_commits();
    /// assert_eq!(commits.len(), 1);
    /// assert_eq!(commits[0].touched_files, vec!["src/app.ts"]);
    /// ```
    pub fn from_json(content: &str) -> Result<Self, ImpactError> {
        let raw: RawData = serde_json::from_str(content)?;
        Ok(Self {
            commits: raw
                .commits
                .into_iter()
                .map(|(repo, commits)| (repo, commits.into_iter().map(Commit::from).collect()))
                .collect(),
            pull_requests: raw
                .pull_requests
                .items
                .into_iter()
                .map(PullRequest::from)
                .collect(),
        })
    }

    /// Every commit across all repositories, repository by repository.
    pub fn all_commits(&self) -> Vec<Commit> {
        self.commits.values().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "commits": {
            "project-b": [
                {
                    "sha": "b1",
                    "commit": { "message": "Add feature", "author": { "date": "2026-01-10T09:00:00Z" } }
                }
            ],
            "project-a": [
                {
                    "sha": "a1",
                    "commit": { "message": "Fix bug\n\nDetails", "author": { "date": "2026-01-15T10:00:00Z" } },
                    "files": [{ "filename": "src/app.ts" }, { "filename": "src/util.ts" }]
                }
            ]
        },
        "pullRequests": {
            "items": [
                {
                    "title": "Add login",
                    "state": "open",
                    "created_at": "2026-01-14T08:00:00Z",
                    "repository_url": "https://api.github.com/repos/user/project-a"
                }
            ]
        }
    }"#;

    #[test]
    fn parses_commits_and_pull_requests() {
        let log = ActivityLog::from_json(SAMPLE).unwrap();
        assert_eq!(log.commits.len(), 2);
        let a = &log.commits["project-a"][0];
        assert_eq!(a.id, "a1");
        assert_eq!(a.message, "Fix bug\n\nDetails");
        assert_eq!(
            a.authored_at,
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
        );
        assert_eq!(a.touched_files, vec!["src/app.ts", "src/util.ts"]);

        assert_eq!(log.pull_requests.len(), 1);
        assert_eq!(log.pull_requests[0].state, PrState::Open);
        assert_eq!(log.pull_requests[0].repo_name(), "project-a");
    }

    #[test]
    fn commits_without_files_have_no_paths() {
        let log = ActivityLog::from_json(SAMPLE).unwrap();
        assert!(log.commits["project-b"][0].touched_files.is_empty());
    }

    #[test]
    fn all_commits_flattens_by_repository() {
        let log = ActivityLog::from_json(SAMPLE).unwrap();
        let ids: Vec<String> = log.all_commits().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a1", "b1"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let log = ActivityLog::from_json("{}").unwrap();
        assert_eq!(log, ActivityLog::default());
    }

    #[test]
    fn malformed_json_is_error() {
        let err = ActivityLog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ImpactError::Serialization(_)));
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        assert!(ActivityLog::load(&path).unwrap().is_none());
        assert!(matches!(
            ActivityLog::load_required(&path),
            Err(ImpactError::NoData(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let log = ActivityLog::load(&path).unwrap().unwrap();
        assert_eq!(log.all_commits().len(), 2);
    }

    #[test]
    fn default_path_ends_with_data_file() {
        let path = default_data_path();
        assert!(path.ends_with(".impact-journal/data.json"));
    }
}
