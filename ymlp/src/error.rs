#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller asked for something the client cannot send.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Connection, TLS or timeout failure. Never retried.
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body could not be decoded into a `{Code, Output}` envelope.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The service answered with a non-zero `Code`.
    #[error("YMLP error ({code}): {message}")]
    Api { code: i64, message: String },
}

impl Error {
    /// True when the request gave up because the configured timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_timeout())
    }

    /// The remote error code, if the service reported one.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_code() {
        let err = Error::Api {
            code: 5,
            message: "duplicate".to_string(),
        };
        assert_eq!(err.api_code(), Some(5));
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "YMLP error (5): duplicate");
    }

    #[test]
    fn other_errors_have_no_api_code() {
        let err = Error::MalformedResponse("not json".to_string());
        assert_eq!(err.api_code(), None);
        assert_eq!(err.to_string(), "Malformed response: not json");
    }
}
