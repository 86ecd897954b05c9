//! Error types for bunpo operations.
//!
//! Provides a structured error hierarchy with error codes and resolution
//! suggestions. The three families that matter to callers are `Validation`
//! (rejected input, nothing mutated), `Generation` (an external AI
//! collaborator failed; the orchestrator absorbs these into fallbacks), and
//! `Database` (a persistence write failed; surfaced so the caller can retry).

use thiserror::Error;

/// Result type alias for bunpo operations.
pub type TutorResult<T> = Result<T, TutorError>;

/// Main error type for all bunpo operations.
#[derive(Error, Debug)]
pub enum TutorError {
    /// Caller input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// An external generation collaborator (content, evaluation, speech) failed.
    #[error("Generation error: {message}")]
    Generation {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValEmptyAnswer,
    ValRatingOutOfRange,
    ValPhaseMismatch,

    // Generation (GEN_xxx)
    GenContentFailed,
    GenEvaluationFailed,
    GenSpeechFailed,
    GenInvalidResponse,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValEmptyAnswer => "VAL_002",
            ErrorCode::ValRatingOutOfRange => "VAL_003",
            ErrorCode::ValPhaseMismatch => "VAL_004",
            ErrorCode::GenContentFailed => "GEN_001",
            ErrorCode::GenEvaluationFailed => "GEN_002",
            ErrorCode::GenSpeechFailed => "GEN_003",
            ErrorCode::GenInvalidResponse => "GEN_004",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl TutorError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with a specific code.
    pub fn validation_with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: None,
        }
    }

    /// Create a phase-mismatch validation error.
    pub fn phase_mismatch(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValPhaseMismatch,
            suggestion: Some("Check the current session phase before calling".to_string()),
        }
    }

    /// Create a content generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            code: ErrorCode::GenContentFailed,
            source: None,
        }
    }

    /// Create an evaluation error.
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            code: ErrorCode::GenEvaluationFailed,
            source: None,
        }
    }

    /// Create a speech synthesis error.
    pub fn speech(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            code: ErrorCode::GenSpeechFailed,
            source: None,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Generation { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// True if the orchestrator should absorb this error into a fallback
    /// value instead of surfacing it.
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. } | Self::Network { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Generation { .. } => Some("Check your AI provider configuration and API key"),
            Self::Database { .. } => Some("The review was not recorded; retry the rating"),
            Self::Network { .. } => Some("Check your network connection"),
            Self::Configuration(_) => Some("Check your bunpo configuration file"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = TutorError::validation("empty answer");
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.to_string().contains("empty answer"));
        assert!(!err.is_generation());
    }

    #[test]
    fn test_generation_error_is_absorbable() {
        assert!(TutorError::generation("model unavailable").is_generation());
        assert!(TutorError::speech("tts down").is_generation());
        assert!(!TutorError::database("disk full").is_generation());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValPhaseMismatch.as_str(), "VAL_004");
        assert_eq!(ErrorCode::DbOperationFailed.as_str(), "DB_002");
    }

    #[test]
    fn test_database_error_suggests_retry() {
        let err = TutorError::database("write failed");
        assert!(err.suggestion().unwrap().contains("retry"));
    }
}
