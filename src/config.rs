use anyhow::{ensure, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it records live in memory only.
    pub database_url: Option<String>,
    /// Upper bound for the sqlx connection pool.
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_max_connections: u32 = optional(&lookup, "DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;
        ensure!(
            database_max_connections > 0,
            "DATABASE_MAX_CONNECTIONS must be a positive integer"
        );

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections,
            server_host: optional(&lookup, "SERVER_HOST", "0.0.0.0"),
            server_port: optional(&lookup, "SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_owned())
}
