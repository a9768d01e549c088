//! Error types shared by the store, provider client and sync publisher.

use std::path::PathBuf;

/// Everything that can go wrong while looking up, generating or persisting a
/// plant profile.
#[derive(Debug, thiserror::Error)]
pub enum PlantError {
    #[error("store I/O failed for {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store table error: {0}")]
    Table(#[from] polars::prelude::PolarsError),

    #[error("provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("provider returned no completion")]
    EmptyCompletion,

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("invalid plant name: {0:?}")]
    InvalidName(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PlantError {
    pub(crate) fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlantError::StoreIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlantError>;
