pub type VisageResult<T> = Result<T, VisageError>;

#[derive(thiserror::Error, Debug)]
pub enum VisageError {
    /// A config or input value failed a precondition.
    #[error("validation error: {0}")]
    Validation(String),

    /// The wire contract was violated: an incoming frame did not decode
    /// into a known event.
    #[error("channel error: {0}")]
    Channel(String),

    /// An outgoing payload failed to serialize.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VisageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
