use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unsupported config version {0} (expected 1)")]
    UnsupportedVersion(u32),

    #[error("mobile_breakpoint must be greater than zero")]
    ZeroBreakpoint,

    #[error("tick_ms must be greater than zero")]
    ZeroTick,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Failed to open journal '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write journal entry: {0}")]
    Write(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
