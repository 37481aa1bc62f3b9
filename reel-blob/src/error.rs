use reel_core::ReelError;
use thiserror::Error;

/// Result type for object store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Transport and request failures raised by an object store.
///
/// A missing object is not an error: `get` reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// `Invalid` is the caller's request (e.g. an oversized object), everything
/// else is a storage failure.
impl From<StoreError> for ReelError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid { message } => ReelError::bad_request(message),
            other => ReelError::storage(other.to_string()).with_source(other),
        }
    }
}
