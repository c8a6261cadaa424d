use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodNoteError {
    // Pipeline errors
    #[error("Unsupported podcast service: {0}")]
    UnsupportedService(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed document: missing {0}")]
    MalformedDocument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Output errors
    #[error("No active document to insert into")]
    NoActiveDocument,

    #[error("Note already exists: {0}")]
    NoteAlreadyExists(String),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PodNoteError {
    fn from(err: reqwest::Error) -> Self {
        PodNoteError::Network(err.to_string())
    }
}

impl PodNoteError {
    /// One-line notice shown to the user. Pipeline failures are reported
    /// generically; the detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            PodNoteError::UnsupportedService(_) => {
                "This is not a valid podcast service.".to_string()
            }
            PodNoteError::Network(_) | PodNoteError::InvalidUrl(_) => {
                "Could not reach the podcast host.".to_string()
            }
            PodNoteError::MalformedDocument(_) => "The URL is invalid.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type PodNoteResult<T> = Result<T, PodNoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_document_message_hides_detail() {
        let err = PodNoteError::MalformedDocument("og:image".to_string());
        assert_eq!(err.user_message(), "The URL is invalid.");
        assert!(!err.user_message().contains("og:image"));
        assert!(err.to_string().contains("og:image"));
    }

    #[test]
    fn test_network_message_is_generic() {
        let err = PodNoteError::Network("connection reset by peer".to_string());
        assert_eq!(err.user_message(), "Could not reach the podcast host.");
    }

    #[test]
    fn test_other_errors_use_display() {
        let err = PodNoteError::NoActiveDocument;
        assert_eq!(err.user_message(), "No active document to insert into");
    }
}
