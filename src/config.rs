use std::net::SocketAddr;

use axum::http::HeaderValue;
use clap::Args;

#[derive(Args, Clone, Debug)]
pub struct ServerConfig {
    /// Listening IP address
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Listening port
    #[arg(short, long, env = "TODO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database url; the file is created if missing
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todo.db")]
    pub database_url: String,

    /// Size of the database connection pool
    #[arg(long, env = "TODO_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "TODO_CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("invalid listen address {}:{}: {e}", self.host, self.port)
            })?;
        Ok(addr)
    }

    pub fn cors_origin(&self) -> anyhow::Result<HeaderValue> {
        self.cors_origin
            .parse::<HeaderValue>()
            .map_err(|e| anyhow::anyhow!("invalid cors origin {}: {e}", self.cors_origin))
    }
}
