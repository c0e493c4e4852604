/// Error types for the chat core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Message text was empty or whitespace-only; rejected before any state change.
    EmptyMessage,
    /// A language tag outside the supported set.
    UnsupportedLanguage(String),
    /// The translation provider failed (network, auth, quota). Recoverable:
    /// the session returns to idle and nothing is stored.
    Translation(String),
    /// The identity provider rejected the credentials. A session cannot be
    /// constructed without an authenticated principal.
    Authentication(String),
    /// The durable message store failed.
    Storage(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyMessage => write!(f, "Message text is empty"),
            Error::UnsupportedLanguage(tag) => write!(f, "Unsupported language: {}", tag),
            Error::Translation(msg) => write!(f, "Translation error: {}", msg),
            Error::Authentication(msg) => write!(f, "Authentication error: {}", msg),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

/// Result type for chat core operations.
pub type Result<T> = std::result::Result<T, Error>;
