//! MCP server setup and lifecycle.
//!
//! Provides [`run_server`] which serves an [`ImpactServer`] over stdio,
//! blocking until the client disconnects.

use impact_core::ImpactError;
use rmcp::{model::*, tool_handler, transport::stdio, ServerHandler, ServiceExt};

use crate::tools::ImpactServer;

const SERVER_INSTRUCTIONS: &str = "\
impact turns commit history into a developer journal and change-risk signals:\n\
- file_risk: How risky is it to change this file? Activity, bug-fix share, trend, verdict\n\
- get_hotspots: Files touched recently, ranked by risk\n\
- get_standup: Yesterday's commits and open pull requests\n\
- get_summary: Commits and pull requests for today, this week, or this month";

#[tool_handler]
impl ServerHandler for ImpactServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "impact".to_string(),
                title: Some("Impact Journal".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "Developer activity journal and file risk analysis".to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}

/// Serve `server` on stdio transport.
///
/// This is called by the `impact mcp` CLI subcommand. It blocks until
/// the client closes stdin.
///
/// # Errors
///
/// Returns [`ImpactError`] if the server fails to initialize or encounters
/// a transport error.
pub async fn run_server(server: ImpactServer) -> Result<(), ImpactError> {
    tracing::info!("starting MCP server on stdio");
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| ImpactError::Config(format!("MCP server failed to start: {e}")))?;

    service
        .waiting()
        .await
        .map_err(|e| ImpactError::Config(format!("MCP server error: {e}")))?;

    Ok(())
}
