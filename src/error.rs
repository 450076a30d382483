use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum PlotlineError {
    #[error("Not logged in. Run 'plotline login' first.")]
    NotLoggedIn,

    #[error("No project selected. Pass --project or run 'plotline project use <id>'.")]
    NoProjectSelected,

    #[error("Please fill in all fields")]
    InvalidCredentials,

    #[error("Cancelled")]
    Cancelled,

    #[error("Use --force to delete in non-interactive mode")]
    ForceRequired,

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Loro error: {0}")]
    Loro(#[from] loro::LoroError),

    #[error("Loro encode error: {0}")]
    LoroEncode(#[from] loro::LoroEncodeError),
}

pub type Result<T> = std::result::Result<T, PlotlineError>;
