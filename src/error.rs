use thiserror::Error;
use crate::node::Key;
use crate::path::Path;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The rewriter needs key/value pairs at the top level.
    #[error("expected a table at the root, found {found}")]
    NotComposite { found: &'static str },

    #[error("key `{key}` not found at {path}")]
    MissingKey { path: Path, key: Key },

    #[error("cannot descend into a scalar at {path}")]
    NotCompositeAt { path: Path },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("at JSON path {path} → {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("jq: {0}")]
    Jq(String),
}
