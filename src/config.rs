//! Client configuration.

use crate::error::ClientError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default server address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:1234";

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `host:port`.
    Tcp(String),
    /// Path of a Unix-domain socket.
    Unix(PathBuf),
    /// Name in the Linux abstract socket namespace.
    Abstract(String),
}

impl Default for Address {
    fn default() -> Self {
        Self::Tcp(DEFAULT_ADDRESS.to_string())
    }
}

impl FromStr for Address {
    type Err = ClientError;

    /// Accepts the server's syntax, `inet:HOST:PORT`, `unix:PATH` or
    /// `abstract:NAME`, plus `tcp:HOST:PORT` and plain `HOST:PORT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix:") {
            if path.is_empty() {
                return Err(ClientError::Config("empty unix socket path".to_string()));
            }
            return Ok(Self::Unix(PathBuf::from(path)));
        }
        if let Some(name) = s.strip_prefix("abstract:") {
            if name.is_empty() {
                return Err(ClientError::Config("empty abstract socket name".to_string()));
            }
            return Ok(Self::Abstract(name.to_string()));
        }
        let host = s
            .strip_prefix("inet:")
            .or_else(|| s.strip_prefix("tcp:"))
            .unwrap_or(s);
        match host.rsplit_once(':') {
            Some((name, port)) if !name.is_empty() && port.parse::<u16>().is_ok() => Ok(Self::Tcp(host.to_string())),
            _ => Err(ClientError::Config(format!(
                "invalid address {s:?}, expected inet:HOST:PORT, unix:PATH or abstract:NAME"
            ))),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(host) => write!(f, "inet:{host}"),
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
            Self::Abstract(name) => write!(f, "abstract:{name}"),
        }
    }
}

/// Configuration for one client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Player name sent on join.
    pub name: String,
    /// Server address.
    pub address: Address,
    /// JSON key bindings file; built-in bindings when absent.
    pub keybindings: Option<PathBuf>,
    /// File the message log is appended to.
    pub log_file: Option<PathBuf>,
    /// File diagnostics are written to.
    pub trace_file: PathBuf,
    /// Whether to use the alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: std::env::var("USER").unwrap_or_else(|_| "player".to_string()),
            address: Address::default(),
            keybindings: None,
            log_file: None,
            trace_file: std::env::temp_dir().join("battilde-client.log"),
            alternate_screen: true,
        }
    }
}
