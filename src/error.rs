use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Expected a mapping at the top of {path}")]
    NotAMapping { path: PathBuf },

    #[error("Failed to emit YAML: {0}")]
    EmitError(#[source] serde_yaml::Error),

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("Failed to replace {path}: {source} (original restored)")]
    ReplaceRolledBack {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "Failed to replace {path}: {source}; restoring the original also failed ({rollback}), previous contents remain at {backup}"
    )]
    ReplaceUnrecoverable {
        path: PathBuf,
        backup: PathBuf,
        source: std::io::Error,
        rollback: std::io::Error,
    },

    #[error("Config path is required: call .path() or .app_name() on the builder")]
    PathRequired,

    #[error("No platform config directory could be determined for '{0}'")]
    NoPlatformDir(String),

    #[error("Task gate requires a running tokio runtime")]
    NoRuntime,

    #[error("Task gate is closed")]
    GateClosed,

    #[error("Queued config task panicked: {0}")]
    TaskPanicked(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::IoError {
            path: path.into(),
            source,
        }
    }
}
