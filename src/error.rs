use std::io;

use thiserror::Error;

/// Failures while loading or validating simulation rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures while reading or writing the persisted high score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("high score storage error: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Failures reported by the wallet shell.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum WalletError {
    #[error("no wallet provider is installed")]
    Unavailable,
    #[error("the wallet provider rejected the connection request")]
    Rejected,
    #[error("wallet reported an unreadable balance: {0}")]
    InvalidBalance(String),
}
