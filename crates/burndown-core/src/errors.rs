use thiserror::Error;

/// Result type alias using BurndownError
pub type Result<T> = std::result::Result<T, BurndownError>;

/// Result type alias using the canonical ExError
pub type ExResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the CLI's diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/Validation
    InvalidInput,
    MissingConfig,
    NotFound,
    AlreadyExists,

    // Corpus/Snapshot shape
    /// Snapshot JSON is unreadable or lacks a required section
    InvalidSnapshot,
    /// A corpus document does not have the shape its adapter expects
    InvalidCorpus,
    /// A cache file exists but cannot be parsed
    MalformedCache,

    // Baseline
    /// The support evaluator failed with a condition that is not a known
    /// "unresolved support data" outcome
    SupportEvaluation,

    // Integration/IO
    ExternalTool,
    Io,
    Serialization,
    Persistence,

    // Interaction
    UserDeclined,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingConfig => "ERR_MISSING_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::InvalidCorpus => "ERR_INVALID_CORPUS",
            ExErrorKind::MalformedCache => "ERR_MALFORMED_CACHE",
            ExErrorKind::SupportEvaluation => "ERR_SUPPORT_EVALUATION",
            ExErrorKind::ExternalTool => "ERR_EXTERNAL_TOOL",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::UserDeclined => "ERR_USER_DECLINED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus context
/// (operation, entity) for diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (a compat key, a date, a path...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " ({})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for the burndown pipeline
#[derive(Error, Debug)]
pub enum BurndownError {
    /// No persisted snapshot at or before the requested date
    #[error("Snapshot not found for date {date}")]
    SnapshotNotFound { date: String },

    /// A different snapshot is already persisted under the same date
    #[error("Snapshot for {date} already exists with different content")]
    SnapshotDateCollision { date: String },

    /// Snapshot document is missing a section or has the wrong shape
    #[error("Invalid snapshot {path}: {reason}")]
    InvalidSnapshot { path: String, reason: String },

    /// Corpus document does not match the configured layout
    #[error("Invalid {corpus} corpus: {reason}")]
    InvalidCorpus { corpus: String, reason: String },

    /// Cache file exists but cannot be parsed
    #[error("Malformed cache file {path}: {reason}")]
    MalformedCache { path: String, reason: String },

    /// Support evaluator failed with an unclassified condition
    #[error("Support evaluation failed for {key}: {message}")]
    SupportEvaluationFailed { key: String, message: String },

    /// Required configuration value absent
    #[error("Missing configuration: {name} is not set")]
    MissingConfig { name: String },

    /// Invalid argument or input value
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// External tool exited unsuccessfully or could not be spawned
    #[error("External tool `{tool}` failed: {reason}")]
    ExternalToolFailed { tool: String, reason: String },

    /// Interactive confirmation was declined
    #[error("Declined by user")]
    UserDeclined,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BurndownError> for ExError {
    fn from(err: BurndownError) -> Self {
        match err {
            BurndownError::SnapshotNotFound { date } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(date.clone())
                .with_message(format!("Snapshot not found for date {}", date)),

            BurndownError::SnapshotDateCollision { date } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(date)
                    .with_message("a different snapshot is already persisted for this date")
            }

            BurndownError::InvalidSnapshot { path, reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_entity_id(path)
                    .with_message(reason)
            }

            BurndownError::InvalidCorpus { corpus, reason } => {
                ExError::new(ExErrorKind::InvalidCorpus)
                    .with_entity_id(corpus)
                    .with_message(reason)
            }

            BurndownError::MalformedCache { path, reason } => {
                ExError::new(ExErrorKind::MalformedCache)
                    .with_entity_id(path)
                    .with_message(reason)
            }

            BurndownError::SupportEvaluationFailed { key, message } => {
                ExError::new(ExErrorKind::SupportEvaluation)
                    .with_op("resolve_baseline")
                    .with_entity_id(key)
                    .with_message(message)
            }

            BurndownError::MissingConfig { name } => ExError::new(ExErrorKind::MissingConfig)
                .with_entity_id(name.clone())
                .with_message(format!("{} is not set", name)),

            BurndownError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            BurndownError::ExternalToolFailed { tool, reason } => {
                ExError::new(ExErrorKind::ExternalTool)
                    .with_op(tool)
                    .with_message(reason)
            }

            BurndownError::UserDeclined => ExError::new(ExErrorKind::UserDeclined)
                .with_message("confirmation declined; nothing was published"),

            BurndownError::Io(e) => ExError::new(ExErrorKind::Io).with_message(e.to_string()),

            BurndownError::Serialization(e) => {
                ExError::new(ExErrorKind::Serialization).with_message(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::MalformedCache, "ERR_MALFORMED_CACHE"),
            (ExErrorKind::SupportEvaluation, "ERR_SUPPORT_EVALUATION"),
            (ExErrorKind::UserDeclined, "ERR_USER_DECLINED"),
            (ExErrorKind::ExternalTool, "ERR_EXTERNAL_TOOL"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_snapshot_not_found_maps_to_not_found() {
        let err: ExError = BurndownError::SnapshotNotFound {
            date: "2024-01-10".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("2024-01-10"));
        assert!(err.to_string().contains("Snapshot not found for date 2024-01-10"));
    }

    #[test]
    fn test_display_includes_op_and_source() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let err = ExError::new(ExErrorKind::Persistence)
            .with_op("write_snapshot")
            .with_message("could not persist")
            .with_source(inner);
        let s = err.to_string();
        assert!(s.starts_with("[ERR_PERSISTENCE] in operation 'write_snapshot'"));
        assert!(s.contains("caused by [ERR_IO]: disk full"));
    }

    #[test]
    fn test_serde_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ExError = BurndownError::from(bad).into();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
