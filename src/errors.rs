use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to parse XML content
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Intermediate snapshot is unreadable or has an unexpected header
    #[error("Snapshot error: {0}")]
    SnapshotError(String),
    /// JSON encoding failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// A record carries no date attribute to resolve
    #[error("Record #{index} <{tag}> has no '{field}' attribute")]
    MissingDateField {
        index: usize,
        tag: String,
        field: String,
    },
    /// The date parser could not interpret a record's date attribute
    #[error("Record #{index} <{tag}> has an unparseable '{field}' value: {value:?}")]
    UnparseableDate {
        index: usize,
        tag: String,
        field: String,
        value: String,
    },
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<bincode::Error> for AppError {
    fn from(err: bincode::Error) -> Self {
        AppError::SnapshotError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::InvalidInput(format!("Failed to parse config: {err}"))
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn test_unparseable_date_display() {
        let err = AppError::UnparseableDate {
            index: 7,
            tag: "sms".to_string(),
            field: "readable_date".to_string(),
            value: "yesterday-ish".to_string(),
        };

        let error_msg = err.to_string();
        assert!(error_msg.contains("#7"));
        assert!(error_msg.contains("<sms>"));
        assert!(error_msg.contains("readable_date"));
        assert!(error_msg.contains("yesterday-ish"));
    }

    #[test]
    fn test_missing_date_field_display() {
        let err = AppError::MissingDateField {
            index: 0,
            tag: "call".to_string(),
            field: "readable_date".to_string(),
        };
        assert!(err.to_string().contains("has no 'readable_date' attribute"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = AppError::ParseError("unexpected end of file".to_string());
        assert!(err.to_string().contains("Parse error"));
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.snapshot");
        let err = AppError::from(io);
        assert!(matches!(err, AppError::IoError(_)));
        assert!(err.to_string().contains("missing.snapshot"));
    }

    #[test]
    fn test_snapshot_error_display() {
        let err = AppError::SnapshotError("bad magic".to_string());
        assert!(err.to_string().contains("Snapshot error"));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::InvalidInput("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
