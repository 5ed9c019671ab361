use crate::model::PostSelector;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("post not found: {0}")]
    NotFound(PostSelector),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("editor not available: {0}")]
    EditorUnavailable(String),

    #[error("content cannot be empty when using editor: {0}")]
    ContentEmpty(String),

    #[error("failed to edit content: {0}")]
    Editor(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("{0}")]
    InvalidSelector(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Api(String),

    #[error("{op}: {source}")]
    Op {
        op: &'static str,
        #[source]
        source: Box<CmsError>,
    },
}

impl CmsError {
    /// Wraps the error with the name of the operation that produced it.
    pub fn in_op(self, op: &'static str) -> Self {
        CmsError::Op {
            op,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any operation wrappers.
    pub fn root(&self) -> &CmsError {
        match self {
            CmsError::Op { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), CmsError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;

/// Attaches an operation name to the error side of a `Result`.
pub trait ResultExt<T> {
    fn op(self, op: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn op(self, op: &'static str) -> Result<T> {
        self.map_err(|e| e.in_op(op))
    }
}
