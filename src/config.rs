//! Configuration handling for the SQL gateway.
//!
//! Configuration comes from CLI arguments and environment variables. The
//! connection descriptor is a single opaque URL; if it is absent the
//! process refuses to start (this is a startup-time condition, never a
//! per-call error).

use clap::{Parser, ValueEnum};

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_AUDIT_LOG: &str = "gateway.log";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// SQL Gateway MCP server configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sql-gateway-mcp",
    about = "Stateless MCP gateway for ad-hoc SQL access",
    version
)]
pub struct Config {
    /// Database connection URL (postgres://, mysql://, or sqlite:).
    /// Required; the server will not start without it.
    #[arg(long, value_name = "URL", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "GATEWAY_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "GATEWAY_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "GATEWAY_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "GATEWAY_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Path of the append-only invocation audit log
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_AUDIT_LOG,
        env = "GATEWAY_AUDIT_LOG"
    )]
    pub audit_log: String,

    /// Disable the invocation audit log
    #[arg(long, env = "GATEWAY_NO_AUDIT")]
    pub no_audit: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "GATEWAY_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "GATEWAY_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            database_url: None,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            audit_log: DEFAULT_AUDIT_LOG.to_string(),
            no_audit: false,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            ..Config::default()
        };
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_database_url() {
        let config =
            Config::parse_from(["sql-gateway-mcp", "--database-url", "sqlite:data.db"]);
        assert_eq!(config.database_url.as_deref(), Some("sqlite:data.db"));
        assert_eq!(config.audit_log, DEFAULT_AUDIT_LOG);
    }

    #[test]
    fn test_parse_http_transport() {
        let config = Config::parse_from([
            "sql-gateway-mcp",
            "--database-url",
            "postgres://localhost/app",
            "--transport",
            "http",
            "--http-port",
            "9090",
        ]);
        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(config.http_bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_parse_audit_options() {
        let config = Config::parse_from([
            "sql-gateway-mcp",
            "--database-url",
            "sqlite:data.db",
            "--audit-log",
            "logs/calls.log",
            "--no-audit",
        ]);
        assert_eq!(config.audit_log, "logs/calls.log");
        assert!(config.no_audit);
    }

    #[test]
    fn test_transport_mode_display() {
        assert_eq!(TransportMode::Stdio.to_string(), "stdio");
        assert_eq!(TransportMode::Http.to_string(), "http");
    }
}
