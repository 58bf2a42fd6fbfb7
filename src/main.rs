//! Jyotish Graph MCP Server - Entry Point
//!
//! This binary serves the Kundli page over STDIO transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jyotish_graph::api::HttpBackend;
use jyotish_graph::config::AppConfig;
use jyotish_graph::page::KundliPage;
use jyotish_graph::JyotishServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP communication)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting Jyotish Graph MCP Server");

    let config = AppConfig::load()?;
    let backend = HttpBackend::new(&config.api).context("Failed to build HTTP client")?;
    tracing::info!(base_url = %config.api.base_url, "Using Kundli backend");

    let page = KundliPage::new(Arc::new(backend), &config);
    let service = JyotishServer::new(page).serve(stdio()).await?;

    tracing::info!("Server initialized, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");

    Ok(())
}
