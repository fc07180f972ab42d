use std::path::PathBuf;

use mailmind_core::InvokeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document is not a valid cache. Never reset silently.
    #[error("corrupt cache document {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize cache document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<CacheError> for InvokeError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Invoke(inner) => inner,
            other => InvokeError::Storage(Box::new(other)),
        }
    }
}
