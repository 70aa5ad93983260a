//! Diagnostics setup and the user-visible message log file.

use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Send `tracing` output to `path`.
///
/// The terminal is in raw mode while the client runs, so diagnostics never
/// go to stderr. The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Optional append-only copy of the message log.
///
/// The file is opened per write; no handle is held between writes.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    path: Option<PathBuf>,
}

impl MessageLog {
    /// Log to `path`, or nowhere when `None`.
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// The configured file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one line as `[kind] text`. Failures are traced and otherwise ignored.
    pub fn append(&self, text: &str, kind: Option<&str>) {
        let Some(path) = &self.path else {
            return;
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "[{}] {text}", kind.unwrap_or("")));
        if let Err(e) = written {
            warn!(path = %path.display(), error = %e, "cannot write message log");
        }
    }
}
