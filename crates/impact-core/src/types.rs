use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as consumed by the analyses.
///
/// Commits without file-level detail (e.g. synced before file enrichment)
/// carry an empty `touched_files` list and are never matched against a path.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::Commit;
///
/// let commit = Commit {
///     id: "9fceb02".into(),
///     message: "fix: reconnect after timeout\n\nCloses #12".into(),
///     authored_at: Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap(),
///     touched_files: vec!["bluetooth/connection.ts".into()],
/// };
/// assert!(commit.touches("bluetooth/connection.ts"));
/// assert!(!commit.touches("./bluetooth/connection.ts"));
/// assert_eq!(commit.subject(), "fix: reconnect after timeout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Content hash.
    pub id: String,
    /// Full commit message.
    pub message: String,
    /// Author timestamp.
    pub authored_at: DateTime<Utc>,
    /// Paths touched by the commit, in the order reported by the source.
    #[serde(default)]
    pub touched_files: Vec<String>,
}

impl Commit {
    /// Whether the commit touches exactly `path` (no normalization).
    pub fn touches(&self, path: &str) -> bool {
        self.touched_files.iter().any(|f| f == path)
    }

    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// State of a pull request.
///
/// # Examples
///
/// ```
/// use impact_core::PrState;
///
/// let s: PrState = serde_json::from_str("\"open\"").unwrap();
/// assert_eq!(s, PrState::Open);
/// assert_eq!(s.to_string(), "open");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// Still open for review.
    Open,
    /// Closed or merged.
    Closed,
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrState::Open => write!(f, "open"),
            PrState::Closed => write!(f, "closed"),
        }
    }
}

/// A pull request authored by the user.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_core::{PrState, PullRequest};
///
/// let pr = PullRequest {
///     title: "Add login".into(),
///     state: PrState::Open,
///     created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
///     repository_url: "https://api.github.com/repos/user/project-a".into(),
/// };
/// assert_eq!(pr.repo_name(), "project-a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// Pull request title.
    pub title: String,
    /// Current state.
    pub state: PrState,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// GitHub API URL of the repository.
    pub repository_url: String,
}

impl PullRequest {
    /// Repository name: the last path segment of `repository_url`.
    pub fn repo_name(&self) -> &str {
        self.repository_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use impact_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn commit(message: &str, files: &[&str]) -> Commit {
        Commit {
            id: "abc123".into(),
            message: message.into(),
            authored_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            touched_files: files.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn touches_requires_exact_match() {
        let c = commit("work", &["src/a.ts", "src/b.ts"]);
        assert!(c.touches("src/a.ts"));
        assert!(!c.touches("a.ts"));
        assert!(!c.touches("src/*.ts"));
        assert!(!c.touches("SRC/A.TS"));
    }

    #[test]
    fn commit_without_files_touches_nothing() {
        let c = commit("no detail", &[]);
        assert!(!c.touches(""));
        assert!(!c.touches("src/a.ts"));
    }

    #[test]
    fn subject_of_empty_message_is_empty() {
        assert_eq!(commit("", &[]).subject(), "");
    }

    #[test]
    fn commit_deserializes_without_files() {
        let json = r#"{"id":"1","message":"m","authoredAt":"2026-01-15T10:00:00Z"}"#;
        let c: Commit = serde_json::from_str(json).unwrap();
        assert!(c.touched_files.is_empty());
    }

    #[test]
    fn repo_name_ignores_trailing_slash() {
        let pr = PullRequest {
            title: "t".into(),
            state: PrState::Closed,
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            repository_url: "https://api.github.com/repos/user/project-b/".into(),
        };
        assert_eq!(pr.repo_name(), "project-b");
    }

    #[test]
    fn pull_request_serializes_camel_case() {
        let pr = PullRequest {
            title: "t".into(),
            state: PrState::Open,
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            repository_url: "https://api.github.com/repos/user/p".into(),
        };
        let json = serde_json::to_value(&pr).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["state"], "open");
    }
}
