use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The credential was missing or rejected by the provider.
    Authentication,
    /// The request was malformed or rejected by the provider.
    InvalidRequest,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The model provider is temporarily overloaded.
    Overloaded,
    /// The request could not be delivered, or the response could not be
    /// received.
    Transport,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Authentication => write!(f, "authentication error"),
            ErrorKind::InvalidRequest => write!(f, "invalid request"),
            ErrorKind::RateLimitExceeded => write!(f, "rate limit exceeded"),
            ErrorKind::Overloaded => write!(f, "provider overloaded"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Other => write!(f, "other error"),
        }
    }
}
