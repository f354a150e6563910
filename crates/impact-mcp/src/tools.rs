//! Tool implementations for the impact MCP server.
//!
//! Four tools are exposed: `file_risk`, `get_hotspots`, `get_standup`, and
//! `get_summary`. Each reads the synced activity data (or, for the risk
//! tools, a local repository's git history) and returns JSON via
//! `CallToolResult`.

use std::path::PathBuf;

use chrono::{Local, Utc};
use impact_core::{Commit, FileAnalysisConfig, HistoryConfig};
use impact_pulse::analyzer::{analyze_file, analyze_repository, FileAnalysis};
use impact_pulse::mining::{mine_history, MiningOptions};
use impact_reports::standup::generate_standup;
use impact_reports::store::ActivityLog;
use impact_reports::summary::{generate_summary, Period};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_router, ErrorData as McpError,
};
use serde::{Deserialize, Serialize};

/// MCP server exposing impact's journal and risk tools.
///
/// # Examples
///
/// ```
/// use impact_mcp::tools::ImpactServer;
/// use std::path::PathBuf;
///
/// let server = ImpactServer::new(PathBuf::from("."), PathBuf::from("data.json"));
/// ```
#[derive(Clone)]
pub struct ImpactServer {
    pub(crate) repo_path: PathBuf,
    pub(crate) data_path: PathBuf,
    pub(crate) analysis: FileAnalysisConfig,
    pub(crate) history: HistoryConfig,
    pub(crate) tool_router: ToolRouter<Self>,
}

// --- Parameter structs ---

/// Parameters for the `file_risk` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FileRiskParams {
    /// File path exactly as recorded in commit history (e.g. "src/net/client.rs").
    pub filename: String,
    /// Analyze this local repository's git history instead of synced data.
    /// Relative paths resolve against the server's repository.
    pub repo: Option<String>,
    /// Recent window length in days (default: 90).
    pub recent_days: Option<u32>,
    /// Baseline window length in days (default: 90).
    pub baseline_days: Option<u32>,
}

/// Parameters for the `get_hotspots` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetHotspotsParams {
    /// Analyze this local repository's git history instead of synced data.
    pub repo: Option<String>,
    /// Maximum results (default: 20).
    pub limit: Option<usize>,
}

/// Parameters for the `get_summary` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSummaryParams {
    /// Period: "today", "week" (default), or "month".
    pub period: Option<String>,
}

// --- Response structs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HotspotsResponse {
    hotspots: Vec<FileAnalysis>,
    summary: String,
}

fn mcp_err(msg: impl Into<String>) -> McpError {
    McpError::internal_error(msg.into(), None)
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| mcp_err(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl ImpactServer {
    /// Create a server rooted at `repo_path`, reading synced data from
    /// `data_path`, with default analysis settings.
    pub fn new(repo_path: PathBuf, data_path: PathBuf) -> Self {
        Self {
            repo_path,
            data_path,
            analysis: FileAnalysisConfig::default(),
            history: HistoryConfig::default(),
            tool_router: Self::tool_router(),
        }
    }

    /// Use `analysis` for risk tools that don't override it.
    pub fn with_analysis(mut self, analysis: FileAnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    /// Use `history` when mining local repositories.
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    fn resolve_path(&self, path: &str) -> Result<PathBuf, McpError> {
        let canonical_repo_path = self.repo_path.canonicalize().map_err(|e| {
            mcp_err(format!(
                "Failed to access configured repository path {}: {e}",
                self.repo_path.display()
            ))
        })?;

        let input_path = PathBuf::from(path);
        let requested_path = if input_path.is_absolute() {
            input_path
        } else {
            canonical_repo_path.join(input_path)
        };

        let canonical_requested_path = requested_path.canonicalize().map_err(|e| {
            mcp_err(format!(
                "Failed to resolve path {}: {e}",
                requested_path.display()
            ))
        })?;

        if !canonical_requested_path.starts_with(&canonical_repo_path) {
            return Err(mcp_err(format!(
                "Path {} is outside the configured repository {}",
                canonical_requested_path.display(),
                canonical_repo_path.display()
            )));
        }

        Ok(canonical_requested_path)
    }

    fn load_log(&self) -> Result<ActivityLog, McpError> {
        ActivityLog::load_required(&self.data_path).map_err(|e| mcp_err(e.to_string()))
    }

    fn load_commits(&self, repo: Option<&str>) -> Result<Vec<Commit>, McpError> {
        match repo {
            Some(path) => {
                let repo_path = self.resolve_path(path)?;
                mine_history(&repo_path, &MiningOptions::from(&self.history), Utc::now()).map_err(
                    |e| {
                        mcp_err(format!(
                            "Failed to mine git history: {e}. Is this a git repository?"
                        ))
                    },
                )
            }
            None => Ok(self.load_log()?.all_commits()),
        }
    }

    #[tool(
        name = "file_risk",
        description = "Assess how risky it is to change a file, based on its commit history. Compares the file's recent activity and share of bug-fix commits against repository averages, detects whether activity is rising, and returns a HIGH/MEDIUM/LOW/UNKNOWN verdict with reasons. Use this before editing an unfamiliar file."
    )]
    pub fn file_risk(
        &self,
        Parameters(params): Parameters<FileRiskParams>,
    ) -> Result<CallToolResult, McpError> {
        let commits = self.load_commits(params.repo.as_deref())?;
        let config = FileAnalysisConfig {
            recent_window_days: params
                .recent_days
                .unwrap_or(self.analysis.recent_window_days),
            baseline_window_days: params
                .baseline_days
                .unwrap_or(self.analysis.baseline_window_days),
            bug_fix_keywords: self.analysis.bug_fix_keywords.clone(),
        };

        let analysis = analyze_file(&params.filename, &commits, &config, Utc::now());
        json_result(&analysis)
    }

    #[tool(
        name = "get_hotspots",
        description = "Rank every file touched in the recent window by change risk, most risky first. Use this to find the fragile parts of a codebase before planning changes."
    )]
    pub fn get_hotspots(
        &self,
        Parameters(params): Parameters<GetHotspotsParams>,
    ) -> Result<CallToolResult, McpError> {
        let commits = self.load_commits(params.repo.as_deref())?;
        let limit = params.limit.unwrap_or(20);

        let mut hotspots = analyze_repository(&commits, &self.analysis, Utc::now());
        hotspots.truncate(limit);

        let summary = if hotspots.is_empty() {
            format!(
                "No files changed in the last {} days.",
                self.analysis.recent_window_days
            )
        } else {
            let top_three: Vec<String> = hotspots
                .iter()
                .take(3)
                .map(|h| format!("{} ({})", h.filename, h.risk_level))
                .collect();
            format!(
                "Ranked {} file(s). Top: {}",
                hotspots.len(),
                top_three.join(", ")
            )
        };

        json_result(&HotspotsResponse { hotspots, summary })
    }

    #[tool(
        name = "get_standup",
        description = "Get standup notes from synced GitHub activity: commits made yesterday (with repository) and the titles of pull requests still open."
    )]
    pub fn get_standup(&self) -> Result<CallToolResult, McpError> {
        let log = self.load_log()?;
        json_result(&generate_standup(&log, &Local::now()))
    }

    #[tool(
        name = "get_summary",
        description = "Summarize synced GitHub activity for today, this week, or this month: commit messages grouped by repository and pull requests opened in the period."
    )]
    pub fn get_summary(
        &self,
        Parameters(params): Parameters<GetSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        let period = match params.period.as_deref() {
            Some(p) => p
                .parse::<Period>()
                .map_err(|e| McpError::invalid_params(e, None))?,
            None => Period::default(),
        };
        let log = self.load_log()?;
        json_result(&generate_summary(&log, period, &Local::now()))
    }
}
