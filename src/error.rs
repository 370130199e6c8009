//! Unified error types for jokeworker

use thiserror::Error;

/// Error raised while producing or emitting a joke
#[derive(Error, Debug)]
pub enum JokeError {
    /// Provider has nothing to hand out
    #[error("Joke source is empty")]
    EmptySource,

    /// Joke source is temporarily unavailable, the next tick may succeed
    #[error("Joke source unavailable: {0}")]
    Unavailable(String),

    /// Failed to read a joke file
    #[error("Failed to read jokes from '{path}': {source}")]
    Load {
        path: String,
        source: std::io::Error,
    },

    /// Provider panicked while producing a joke
    #[error("Joke provider panicked: {0}")]
    Panicked(String),

    /// Background worker went away without reporting an outcome
    #[error("Worker thread terminated unexpectedly")]
    WorkerLost,
}

/// Result type alias for joke operations
pub type Result<T> = std::result::Result<T, JokeError>;

impl JokeError {
    /// Create a load error with file context
    pub fn load(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is recoverable (the loop keeps going)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, JokeError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_recoverable() {
        assert!(JokeError::Unavailable("busy".into()).is_recoverable());
        assert!(!JokeError::EmptySource.is_recoverable());
        assert!(!JokeError::Panicked("boom".into()).is_recoverable());
        assert!(!JokeError::WorkerLost.is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!JokeError::load("jokes.txt", io).is_recoverable());
    }

    #[test]
    fn test_load_error_message_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = JokeError::load("C:\\jokes.txt", io);
        assert_eq!(
            err.to_string(),
            "Failed to read jokes from 'C:\\jokes.txt': missing"
        );
    }
}
