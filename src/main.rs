//! Redmine MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for Redmine integration.
//! Serves the tools over streamable HTTP by default, or over stdio.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use redmine_mcp_server::config::Config;
use redmine_mcp_server::mcp::http;
use redmine_mcp_server::mcp::server::McpServer;
use redmine_mcp_server::mcp::tools::ToolHandler;
use redmine_mcp_server::redmine::{Credentials, RedmineClient};

/// Redmine MCP Server
#[derive(Parser)]
#[command(name = "redmine-mcp-server")]
#[command(author, version, about = "Redmine MCP Server - A Model Context Protocol server for Redmine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP endpoint over HTTP (default)
    Serve {
        /// Listen address, overrides REDMINE_MCP_BIND
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Endpoint path, overrides REDMINE_MCP_PATH
        #[arg(long)]
        path: Option<String>,
    },

    /// Serve over stdin/stdout using REDMINE_URL and REDMINE_API_KEY
    Stdio,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays free for the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::new().context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Serve { bind, path }) => run_http(config, bind, path).await,
        None => run_http(config, None, None).await,
        Some(Commands::Stdio) => run_stdio(config).await,
    }
}

async fn run_http(
    mut config: Config,
    bind: Option<SocketAddr>,
    path: Option<String>,
) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        config = config.with_bind_addr(bind);
    }
    if let Some(path) = path {
        config = config.with_mcp_path(path).context("Invalid --path")?;
    }

    http::serve(config).await.context("HTTP server failed")?;
    Ok(())
}

async fn run_stdio(config: Config) -> anyhow::Result<()> {
    let credentials = Credentials::from_env().context("Redmine credentials not configured")?;
    tracing::info!(url = credentials.base_url(), "Starting stdio transport");

    let client = RedmineClient::new(credentials).with_process_field_id(config.tools.process_field_id);
    let server = McpServer::new(ToolHandler::new(Arc::new(client), config.tools));
    server.run_stdio().await?;

    Ok(())
}
