use thiserror::Error;

/// Application-wide error types for Octagon.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (non-2xx status, unreadable body, client setup).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The page does not have the structure of a fighter detail page.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// A CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    /// A URL could not be parsed or joined against its base.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Writing the crawl output failed.
    #[error("Output error: {0}")]
    OutputError(String),

    /// JSON serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::OutputError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(AppError::NetworkError("reset".into()).is_retryable());
        assert!(AppError::Timeout(30).is_retryable());
        assert!(AppError::HttpError("HTTP 503".into()).is_retryable());
        assert!(!AppError::ExtractionError("no name".into()).is_retryable());
        assert!(!AppError::OutputError("disk full".into()).is_retryable());
    }

    #[test]
    fn test_selector_error_display() {
        let err = AppError::SelectorError {
            selector: "td[".into(),
            message: "unexpected end".into(),
        };
        assert_eq!(err.to_string(), "Invalid selector 'td[': unexpected end");
    }

    #[test]
    fn test_io_error_maps_to_output() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(AppError::from(io), AppError::OutputError(_)));
    }
}
