use std::sync::Arc;
use tracing::{error, warn};

/// Failures while loading the bundled flashcard catalog
///
/// Sources are held behind `Arc` so the error can sit in session state and be
/// published to observers at the same time.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("Flashcard resource not found: {name}")]
    ResourceNotFound { name: String },

    #[error("Failed to read flashcard resource {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Failed to decode flashcard resource {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("Flashcard load did not complete: {reason}")]
    Interrupted { reason: String },
}

/// Coarse classification used for log fields and UI decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    ResourceNotFound,
    Io,
    Decode,
    Interrupted,
}

impl LoadError {
    pub fn not_found(name: impl Into<String>) -> Self {
        LoadError::ResourceNotFound { name: name.into() }
    }

    pub fn io(name: impl Into<String>, source: std::io::Error) -> Self {
        LoadError::Io {
            name: name.into(),
            source: Arc::new(source),
        }
    }

    pub fn decode(name: impl Into<String>, source: serde_json::Error) -> Self {
        LoadError::Decode {
            name: name.into(),
            source: Arc::new(source),
        }
    }

    /// The load task panicked or was cancelled before producing a result
    pub fn interrupted(reason: impl Into<String>) -> Self {
        LoadError::Interrupted {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::ResourceNotFound { .. } => LoadErrorKind::ResourceNotFound,
            LoadError::Io { .. } => LoadErrorKind::Io,
            LoadError::Decode { .. } => LoadErrorKind::Decode,
            LoadError::Interrupted { .. } => LoadErrorKind::Interrupted,
        }
    }

    /// Text shown next to the retry action
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::ResourceNotFound { .. } => "Flashcard data file not found",
            LoadError::Io { .. } | LoadError::Decode { .. } => "Error decoding flashcard data",
            LoadError::Interrupted { .. } => "Error loading flashcard data",
        }
    }

    /// Short label for the decode failure category (syntax, data, eof, io)
    fn decode_category(&self) -> Option<&'static str> {
        match self {
            LoadError::Decode { source, .. } => Some(match source.classify() {
                serde_json::error::Category::Io => "io",
                serde_json::error::Category::Syntax => "syntax",
                serde_json::error::Category::Data => "data",
                serde_json::error::Category::Eof => "eof",
            }),
            _ => None,
        }
    }

    /// Emit a structured log line for this failure
    pub fn log_with_context(&self, context: &ErrorContext) {
        match self {
            LoadError::ResourceNotFound { name } => {
                warn!(
                    operation = %context.operation,
                    resource = %context.resource,
                    resource_name = %name,
                    "Flashcard resource missing"
                );
            }
            LoadError::Io { source, .. } => {
                error!(
                    operation = %context.operation,
                    resource = %context.resource,
                    error = %source,
                    "Flashcard resource unreadable"
                );
            }
            LoadError::Decode { source, .. } => {
                error!(
                    operation = %context.operation,
                    resource = %context.resource,
                    category = ?self.decode_category(),
                    line = source.line(),
                    column = source.column(),
                    error = %source,
                    "Flashcard resource malformed"
                );
            }
            LoadError::Interrupted { reason } => {
                error!(
                    operation = %context.operation,
                    resource = %context.resource,
                    reason = %reason,
                    "Flashcard load task failed"
                );
            }
        }
    }
}

impl PartialEq for LoadError {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_string() == other.to_string()
    }
}

/// Errors from sending commands to a running session
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Session task has stopped")]
    SessionClosed,
}

/// Error context for structured logging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub resource: String,
}

impl ErrorContext {
    pub fn new(operation: &str, resource: &str) -> Self {
        Self {
            operation: operation.to_string(),
            resource: resource.to_string(),
        }
    }
}
