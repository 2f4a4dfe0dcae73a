//! Server configuration parsed from environment variables.

use axum::http::HeaderValue;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid FRONTEND_URL: {0}")]
    InvalidOrigin(String),
}

/// Which origins the CORS layer admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub frontend_origin: AllowedOrigin,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            port: DEFAULT_PORT,
            frontend_origin: AllowedOrigin::Exact(HeaderValue::from_static(DEFAULT_FRONTEND_URL)),
        }
    }
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3001
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `FRONTEND_URL`: CORS origin, default `http://localhost:5173`; `*` admits any
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number or
    /// `FRONTEND_URL` is not a valid header value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Used by `from_env` and tests.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let frontend_origin = parse_origin(lookup("FRONTEND_URL").as_deref().unwrap_or(DEFAULT_FRONTEND_URL))?;

        Ok(Self { bind_addr, port, frontend_origin })
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_origin(raw: &str) -> Result<AllowedOrigin, ConfigError> {
    let raw = raw.trim().trim_end_matches('/');
    if raw == "*" {
        return Ok(AllowedOrigin::Any);
    }
    HeaderValue::from_str(raw)
        .map(AllowedOrigin::Exact)
        .map_err(|_| ConfigError::InvalidOrigin(raw.to_string()))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
