#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("not a valid word: {0:?}")]
    InvalidWord(String),
    #[error("no access token stored, login required")]
    AuthMissing,
    #[error("{operation} failed with HTTP {status}: {body}")]
    Http {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("access token rejected by backend")]
    TokenInvalid,
    #[error("device pairing expired before a login was confirmed")]
    PollTimeout,
    #[error("token store error: {0}")]
    Store(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

impl Error {
    /// HTTP status carried by the error, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
