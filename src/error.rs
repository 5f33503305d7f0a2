//! Error types for RepCoach
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with hints
//! - Exit codes for the CLI
//!
//! The simulation core (lexicon, persona engine, tone engine, evaluator) is
//! total over its inputs and never returns these errors. They are raised by
//! the surrounding layers: configuration, persona catalog, transcript stores
//! and the reply-generation collaborator.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for coach operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Persona catalog errors (3xx)
    PersonaNotFound = 300,
    PersonaInvalid = 301,

    // Session errors (4xx)
    SessionNotFound = 400,
    TranscriptCorrupt = 401,
    SessionIdInvalid = 402,
    SessionExists = 403,
    SessionEnded = 404,

    // Collaborator errors (5xx)
    GeneratorFailed = 500,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the coach
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration values are out of range
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Persona Catalog Errors
    // ─────────────────────────────────────────────────────────────

    /// Referenced persona does not exist in the catalog
    #[error("Persona not found: {persona_id}")]
    PersonaNotFound { persona_id: String },

    /// A persona definition could not be loaded
    #[error("Invalid persona definition {source_name}: {message}")]
    PersonaInvalid { source_name: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Stored transcript for session {session_id} is unreadable: {message}")]
    TranscriptCorrupt { session_id: String, message: String },

    /// Session ids double as file names, so only a safe alphabet is allowed
    #[error("Invalid session id: {session_id:?}")]
    SessionIdInvalid { session_id: String },

    #[error("Session already exists: {session_id}")]
    SessionExists { session_id: String },

    /// The doctor cut the call; no further turns are accepted
    #[error("Session has ended: {session_id}")]
    SessionEnded { session_id: String },

    // ─────────────────────────────────────────────────────────────
    // Collaborator Errors
    // ─────────────────────────────────────────────────────────────

    /// The reply generator could not produce a result
    #[error("Reply generation failed: {0}")]
    GeneratorFailed(String),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::TranscriptCorrupt,

            Error::PersonaNotFound { .. } => ErrorCode::PersonaNotFound,
            Error::PersonaInvalid { .. } => ErrorCode::PersonaInvalid,

            Error::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            Error::TranscriptCorrupt { .. } => ErrorCode::TranscriptCorrupt,
            Error::SessionIdInvalid { .. } => ErrorCode::SessionIdInvalid,
            Error::SessionExists { .. } => ErrorCode::SessionExists,
            Error::SessionEnded { .. } => ErrorCode::SessionEnded,

            Error::GeneratorFailed(_) => ErrorCode::GeneratorFailed,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Get a user-friendly hint for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => {
                Some("Run 'repcoach config init' to create a default configuration file.")
            }
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'repcoach config validate' to see details.",
            ),
            Error::ConfigValidation { .. } => {
                Some("Review the configuration file and fix the invalid values.")
            }
            Error::PersonaNotFound { .. } => {
                Some("Run 'repcoach personas list' to see the available persona ids.")
            }
            Error::PersonaInvalid { .. } => {
                Some("Check the persona TOML against one of the bundled personas.")
            }
            Error::SessionNotFound { .. } => {
                Some("Start a conversation first; session ids are issued by 'start'.")
            }
            Error::SessionIdInvalid { .. } => {
                Some("Session ids may only contain letters, digits, '-' and '_'.")
            }
            Error::SessionExists { .. } => {
                Some("Pick a new session id, or omit it to have one generated.")
            }
            Error::SessionEnded { .. } => Some("Evaluate the session or start a new one."),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code().as_str(), self);

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config_parse(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn persona_not_found(persona_id: impl Into<String>) -> Self {
        Error::PersonaNotFound {
            persona_id: persona_id.into(),
        }
    }

    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Error::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    pub fn session_exists(session_id: impl Into<String>) -> Self {
        Error::SessionExists {
            session_id: session_id.into(),
        }
    }

    pub fn session_ended(session_id: impl Into<String>) -> Self {
        Error::SessionEnded {
            session_id: session_id.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
