use thiserror::Error;

/// Errors from conversation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("title '{0}' already exists")]
    DuplicateTitle(String),
}

/// Errors from the text generation collaborator.
///
/// The turn loop never propagates these to the user as a crash; they are
/// rendered as a fallback assistant message.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("api key is not configured")]
    MissingApiKey,

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("failed to parse response: {0}")]
    Deserialization(String),
}

/// Errors from attachment blob storage.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid blob name: {0}")]
    InvalidName(String),

    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("blob exceeds maximum size of {limit} bytes (got {actual})")]
    TooLarge { limit: u64, actual: u64 },
}

/// Errors from attachment content extraction.
///
/// Callers degrade to "attachment stored, content not extracted" -- these
/// are never fatal.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid text encoding: {0}")]
    InvalidEncoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::DuplicateTitle("Sorting in Rust".to_string());
        assert_eq!(err.to_string(), "title 'Sorting in Rust' already exists");
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_blob_error_display() {
        let err = BlobError::TooLarge {
            limit: 100,
            actual: 200,
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn test_extraction_error_display() {
        let err = ExtractionError::UnsupportedFormat("application/pdf".to_string());
        assert_eq!(err.to_string(), "unsupported format: application/pdf");
    }
}
