use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream configuration error: {0}")]
    Configuration(String),
    #[error("stream transport error: {0}")]
    Transport(String),
    #[error("stream protocol error: {0}")]
    Protocol(String),
    #[error("stream internal error: {0}")]
    Internal(String),
}

pub type StreamResult<T> = Result<T, StreamError>;
