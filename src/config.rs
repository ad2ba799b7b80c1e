//! Process configuration
//!
//! Every setting is a CLI flag backed by an environment variable, so the
//! server can be driven entirely from the environment (Docker, MCP client
//! `env` blocks) or from the command line during development.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::client::{ApiConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL};

/// Port used by the HTTP transport when none is configured
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// CLI arguments / environment for the server
#[derive(Parser, Debug, Clone)]
#[command(name = "ghl-mcp")]
#[command(about = "MCP server exposing the GoHighLevel API over stdio or HTTP/SSE")]
#[command(version)]
pub struct Args {
    /// Transport to run: "http" or "stdio" (auto-detected when unset)
    #[arg(long, env = "MCP_MODE")]
    pub mode: Option<String>,

    /// Port for the HTTP transport
    #[arg(short, long, env = "MCP_SERVER_PORT")]
    pub port: Option<u16>,

    /// Port assigned by the hosting platform, used when --port is unset
    #[arg(long = "platform-port", env = "PORT", hide = true)]
    pub platform_port: Option<u16>,

    /// Address the HTTP transport binds to
    #[arg(long, env = "MCP_SERVER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Deployment environment; "production" selects the HTTP transport
    #[arg(long, env = "APP_ENV")]
    pub environment: Option<String>,

    /// Private integration token for the GoHighLevel API
    #[arg(long, env = "GHL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Sub-account (location) the tools operate on by default
    #[arg(long, env = "GHL_LOCATION_ID")]
    pub location_id: Option<String>,

    /// Base URL of the GoHighLevel API
    #[arg(long, env = "GHL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Value of the `Version` header sent upstream
    #[arg(long, env = "GHL_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Upstream request timeout in seconds (no timeout when unset)
    #[arg(long, env = "GHL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Tool modules to register as unavailable (comma separated namespaces)
    #[arg(long = "disable-module", env = "GHL_DISABLED_MODULES", value_delimiter = ',')]
    pub disabled_modules: Vec<String>,
}

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Which transport the process serves. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    Http,
    Stdio,
}

impl ServerMode {
    /// Pick the transport.
    ///
    /// An explicit `mode` of "http" or "stdio" wins. Otherwise a configured
    /// port or a production environment selects HTTP, and stdio is the default.
    pub fn select(mode: Option<&str>, port_set: bool, environment: Option<&str>) -> Self {
        match mode.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("http") => return ServerMode::Http,
            Some("stdio") => return ServerMode::Stdio,
            _ => {}
        }

        let production = environment
            .map(|e| e.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        if port_set || production {
            ServerMode::Http
        } else {
            ServerMode::Stdio
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMode::Http => write!(f, "http"),
            ServerMode::Stdio => write!(f, "stdio"),
        }
    }
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: ServerMode,
    pub bind: SocketAddr,
    pub api: ApiConfig,
    pub disabled_modules: Vec<String>,
}

impl Args {
    fn effective_port(&self) -> Option<u16> {
        self.port.or(self.platform_port)
    }

    /// Validate arguments and resolve the server mode
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let port = self.effective_port();
        let mode = ServerMode::select(
            self.mode.as_deref(),
            port.is_some(),
            self.environment.as_deref(),
        );

        let api_key = non_empty(self.api_key).ok_or(ConfigError::Missing("GHL_API_KEY"))?;
        let location_id =
            non_empty(self.location_id).ok_or(ConfigError::Missing("GHL_LOCATION_ID"))?;

        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }

        Ok(Config {
            mode,
            bind: SocketAddr::new(self.host, port.unwrap_or(DEFAULT_HTTP_PORT)),
            api: ApiConfig {
                api_key,
                base_url,
                api_version: self.api_version,
                location_id,
                timeout: self.timeout_secs.map(Duration::from_secs),
            },
            disabled_modules: self
                .disabled_modules
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
