use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that tests and the CLI match on
/// instead of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    /// Manifest JSON is malformed or an entry cannot be interpreted
    InvalidManifest,
    NotFound,
    AlreadyExists,
    /// A custom image reference points at a card id with no stored card
    CorruptedMapping,
    /// Committed version does not follow the stored max version
    HeadMismatch,
    /// A catalog or classifier record could not be turned into a Card
    CardConversion,

    // Integration/IO
    Serialization,
    Persistence,
    ExternalService,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidManifest => "ERR_INVALID_MANIFEST",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::CorruptedMapping => "ERR_CORRUPTED_MAPPING",
            ExErrorKind::HeadMismatch => "ERR_HEAD_MISMATCH",
            ExErrorKind::CardConversion => "ERR_CARD_CONVERSION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the
/// operation, entity and message context for humans. Wrapping an error with
/// [`ExError::wrap`] keeps the inner error reachable through
/// [`std::error::Error::source`], so a failed build reports the full chain of
/// stages that led to the failure.
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

    /// Wrap `inner` as the source of a new error for operation `op`.
    ///
    /// The outer error inherits the inner kind, so callers matching on kind
    /// see the root classification regardless of how many stages wrapped it.
    pub fn wrap(op: impl Into<String>, inner: ExError) -> Self {
        Self::new(inner.kind).with_op(op).with_source(inner)
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (card id, cube id, image url)
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

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// The innermost error of the chain
    pub fn root_cause(&self) -> &ExError {
        let mut current = self;
        while let Some(inner) = current.source_error() {
            current = inner;
        }
        current
    }

    /// Operations from outermost to innermost, e.g. `["build_cube", "load_cards"]`
    pub fn op_chain(&self) -> Vec<&str> {
        let mut ops = Vec::new();
        let mut current = Some(self);
        while let Some(err) = current {
            if let Some(op) = err.op() {
                ops.push(op);
            }
            current = err.source_error();
        }
        ops
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
            write!(f, " (entity_id: {})", entity_id)?;
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

/// Failures converting an external record into a canonical Card
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardConversionError {
    /// Release date did not match `YYYY-MM-DD`
    #[error("Invalid release date '{value}' for card {card_id}")]
    InvalidReleaseDate { card_id: String, value: String },

    /// Classifier arguments were not valid card JSON
    #[error("Malformed card payload: {message}")]
    MalformedPayload { message: String },
}

impl From<CardConversionError> for ExError {
    fn from(err: CardConversionError) -> Self {
        let message = err.to_string();
        match err {
            CardConversionError::InvalidReleaseDate { card_id, .. } => {
                ExError::new(ExErrorKind::CardConversion)
                    .with_op("to_card")
                    .with_entity_id(card_id)
                    .with_message(message)
            }
            CardConversionError::MalformedPayload { .. } => {
                ExError::new(ExErrorKind::CardConversion)
                    .with_op("to_card")
                    .with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for CardConversionError {
    fn from(err: serde_json::Error) -> Self {
        CardConversionError::MalformedPayload {
            message: err.to_string(),
        }
    }
}
