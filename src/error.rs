use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("RIOT_API_KEY is not configured. Add it to your environment or .env file")]
    MissingCredential,

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Forbidden: API key may have expired")]
    Forbidden,

    #[error("Resource not found")]
    NotFound,

    #[error("Rate limit exceeded after {attempts} attempts, try again later")]
    RateLimited { attempts: u32 },

    #[error("Upstream server error ({status}), try again later")]
    UpstreamUnavailable { status: u16 },

    #[error("API error {status}: {message}")]
    UpstreamError { status: u16, message: String },

    #[error("No response received from server: {0}")]
    NoResponse(String),

    #[error("Malformed match: {0}")]
    MalformedMatch(String),

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl AppError {
    /// Maps a non-success, non-429 status onto the error taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => AppError::Unauthorized,
            403 => AppError::Forbidden,
            404 => AppError::NotFound,
            500..=599 => AppError::UpstreamUnavailable { status },
            _ => AppError::UpstreamError {
                status,
                message: message.into(),
            },
        }
    }

    /// Transient errors are worth a manual retry from the caller.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::RateLimited { .. } | AppError::UpstreamUnavailable { .. } | AppError::NoResponse(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(AppError::from_status(401, ""), AppError::Unauthorized));
        assert!(matches!(AppError::from_status(403, ""), AppError::Forbidden));
        assert!(matches!(AppError::from_status(404, ""), AppError::NotFound));
        assert!(matches!(
            AppError::from_status(503, ""),
            AppError::UpstreamUnavailable { status: 503 }
        ));
        match AppError::from_status(418, "I'm a teapot") {
            AppError::UpstreamError { status, message } => {
                assert_eq!(status, 418);
                assert_eq!(message, "I'm a teapot");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_transient() {
        assert!(AppError::NoResponse("reset".into()).is_transient());
        assert!(AppError::UpstreamUnavailable { status: 502 }.is_transient());
        assert!(!AppError::NotFound.is_transient());
        assert!(!AppError::MissingCredential.is_transient());
    }
}
