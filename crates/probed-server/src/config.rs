// ABOUTME: Configuration validation for the probed server.
// ABOUTME: Resolves the listen address and pairs the optional Basic auth username and password.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

/// Errors that can occur while building the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("listen address is not valid: {0}")]
    InvalidAddr(String),

    #[error(
        "only one of USERNAME and PASSWORD is set; configure both to enable Basic auth or neither to leave /ip and /env open"
    )]
    IncompleteCredentials,
}

/// The single username/password pair accepted by the Basic auth layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact comparison against a supplied pair.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable server configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// `None` leaves /ip and /env unauthenticated.
    pub credentials: Option<Credentials>,
}

impl ServerConfig {
    /// Validate raw startup values into a configuration.
    ///
    /// Empty username or password values count as unset. Setting exactly one of
    /// the two is rejected rather than guessed at.
    pub fn new(
        addr: &str,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ConfigError> {
        let addr = parse_listen_addr(addr)?;

        let username = username.filter(|u| !u.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        Ok(Self { addr, credentials })
    }

    pub fn auth_enabled(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Resolve a listen address. A bare `:port` binds every interface, and host
/// names are resolved to their first address.
pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ConfigError> {
    let candidate = match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    };

    if let Ok(parsed) = candidate.parse::<SocketAddr>() {
        return Ok(parsed);
    }

    candidate
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| ConfigError::InvalidAddr(addr.to_string()))
}
