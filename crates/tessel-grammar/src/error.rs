use tessel_mesh::{FaceId, MeshError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    /// Unknown operator, attribute, strategy or tag; arity mismatch; bad ratio.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The division operation failed; the whole step was discarded.
    #[error("division of face {face} failed: {source}")]
    DivisionFailure { face: FaceId, source: MeshError },

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("grammar file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GrammarError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        GrammarError::Configuration(msg.into())
    }
}

pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
