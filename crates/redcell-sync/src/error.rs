use thiserror::Error;

/// Pull-layer failures. These never travel through the push layer's
/// connectivity flag; the two error paths stay separate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("pull request failed: {0}")]
    Http(String),
    #[error("pull response decode failed: {0}")]
    Decode(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
