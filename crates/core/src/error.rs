/// Result alias that carries the custom [`SmashError`] type.
pub type Result<T> = std::result::Result<T, SmashError>;

/// Common error type for the core crate.
///
/// Nothing in the session engine treats these as fatal. They surface at the
/// edges: loading configuration, replaying scripts, talking to a stopped
/// runtime, or a collaborator reporting that it could not do its job.
#[derive(Debug, thiserror::Error)]
pub enum SmashError {
    /// Free-form message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration or event script could not be (de)serialised.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// A configuration value is outside the range the engine accepts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// The session runtime has already shut down.
    #[error("session has been stopped")]
    SessionStopped,
    /// An external collaborator (playback, key blocking, capture) failed.
    #[error("{name} failed: {reason}")]
    Collaborator { name: &'static str, reason: String },
}

impl SmashError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Creates a collaborator failure.
    pub fn collaborator(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Collaborator {
            name,
            reason: reason.into(),
        }
    }
}

impl From<&str> for SmashError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SmashError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
