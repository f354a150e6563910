//! MCP server interface exposing impact's tools to IDEs and agents.
//!
//! Implements a Model Context Protocol server using rmcp that exposes
//! `file_risk`, `get_hotspots`, `get_standup`, and `get_summary` over stdio
//! transport.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//! use impact_mcp::tools::ImpactServer;
//!
//! # async fn example() -> Result<(), impact_core::ImpactError> {
//! let server = ImpactServer::new(PathBuf::from("."), PathBuf::from("data.json"));
//! impact_mcp::server::run_server(server).await?;
//! # Ok(())
//! # }
//! ```

pub mod server;
pub mod tools;
