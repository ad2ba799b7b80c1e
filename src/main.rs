use clap::Parser;
use ghl_mcp::{
    build_registry,
    config::{Args, ServerMode},
    mcp::{stdio, transport, McpInterface},
    GhlClient,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (silently ignore if not found)
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is reserved for the stdio transport
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(
                "ghl_mcp=info,tower_http=info,hyper=off,h2=off,rustls=off,reqwest=warn"
            )
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config()?;

    let client = Arc::new(GhlClient::new(config.api.clone())?);
    let registry = Arc::new(build_registry(client, &config.disabled_modules)?);

    tracing::info!("GoHighLevel MCP server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("API base URL: {}", config.api.base_url);
    tracing::info!("Location: {}", config.api.location_id);
    tracing::info!("Mode: {}", config.mode);
    tracing::info!("");
    let modules = registry.modules();
    tracing::info!("Tool modules ({}):", modules.len());
    for module in &modules {
        match &module.unavailable_reason {
            None => tracing::info!("  {} ({} tools) - {}",
                module.namespace,
                module.tool_count,
                module.description
            ),
            Some(reason) => tracing::warn!("  {} unavailable: {}", module.namespace, reason),
        }
    }
    tracing::info!("");
    tracing::info!("Total tools: {}", registry.tool_count());

    let mcp = Arc::new(McpInterface::new(registry));

    match config.mode {
        ServerMode::Http => transport::serve(mcp, config.bind).await?,
        ServerMode::Stdio => stdio::serve(mcp).await?,
    }

    Ok(())
}
