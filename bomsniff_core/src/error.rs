use std::path::PathBuf;

/// Errors from file probing and configuration.
///
/// Classification itself never fails; see [`crate::BomKind::Unknown`].
#[derive(Debug, thiserror::Error)]
pub enum BomError {
    /// Opening or reading a file failed
    #[error("I/O error: {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Configuration validation errors
    #[error("Configuration validation error: {0}")]
    Config(String),
}

impl BomError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BomError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type BomResult<T> = Result<T, BomError>;
