use mdr_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using MdrError
pub type Result<T> = std::result::Result<T, MdrError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in logs, CLI output and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    ValidationFailed,
    NotFound,
    AlreadyExists,
    MalformedGraph,

    // Edit locks
    LockConflict,
    LockExpired,

    // Store mutations after validation passed
    CreateFailed,
    UpdateFailed,
    DestroyFailed,

    // Integration/IO
    Io,
    Serialization,
    Config,
    Persistence,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ValidationFailed => "ERR_VALIDATION_FAILED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::MalformedGraph => "ERR_MALFORMED_GRAPH",
            ExErrorKind::LockConflict => "ERR_LOCK_CONFLICT",
            ExErrorKind::LockExpired => "ERR_LOCK_EXPIRED",
            ExErrorKind::CreateFailed => "ERR_CREATE_FAILED",
            ExErrorKind::UpdateFailed => "ERR_UPDATE_FAILED",
            ExErrorKind::DestroyFailed => "ERR_DESTROY_FAILED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Collaborators (graph store, lock store, audit sink, terminology) report
/// failures with this type; the lifecycle layer wraps it in [`MdrError`].
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (item URI, lock id, migration id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
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

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
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

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for lifecycle operations
///
/// Validation failures, lock conflicts and permission skips are not errors:
/// they are returned as outcome values. Everything here is fatal to the
/// operation that raised it.
#[derive(Error, Debug, Clone)]
pub enum MdrError {
    /// No graph node exists for the requested URI
    #[error("Item not found: {uri}")]
    ItemNotFound { uri: String },

    /// The store rejected the write of a new item (CreateError)
    #[error("Failed to create {uri}: {reason}")]
    CreateFailed { uri: String, reason: String },

    /// The store rejected part of a replace (UpdateError)
    #[error("Failed to update {uri}: {reason}")]
    UpdateFailed { uri: String, reason: String },

    /// The store rejected a node deletion (DestroyError)
    #[error("Failed to destroy {uri}: {reason}")]
    DestroyFailed { uri: String, reason: String },

    /// Attempt to start a chain under an identifier that already has one
    #[error("Identifier {identifier} is already in use in scope {scope}")]
    DuplicateIdentifier { identifier: String, scope: String },

    /// The chain already holds the highest representable version
    #[error("No version after {version} is available for {identifier}")]
    VersionExhausted { identifier: String, version: u32 },

    /// A string could not be parsed as an item URI
    #[error("Invalid item URI: {value}")]
    InvalidUri { value: String },

    /// Stored triples do not describe a well-formed item
    #[error("Malformed graph for {subject}: {reason}")]
    MalformedGraph { subject: String, reason: String },

    /// Biomedical concept instance requested without a template
    #[error("No Biomedical Concept Template has been defined.")]
    TemplateMissing,

    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// Collaborator failure outside a create/update/destroy write
    #[error(transparent)]
    Store(#[from] ExError),
}

impl MdrError {
    /// Stable error kind of this error
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }
}

impl From<serde_json::Error> for MdrError {
    fn from(err: serde_json::Error) -> Self {
        MdrError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<MdrError> for ExError {
    fn from(err: MdrError) -> Self {
        match err {
            MdrError::ItemNotFound { uri } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(uri)
                .with_message("Item not found"),

            MdrError::CreateFailed { uri, reason } => ExError::new(ExErrorKind::CreateFailed)
                .with_entity_id(uri)
                .with_op("create")
                .with_message(reason),

            MdrError::UpdateFailed { uri, reason } => ExError::new(ExErrorKind::UpdateFailed)
                .with_entity_id(uri)
                .with_op("update")
                .with_message(reason),

            MdrError::DestroyFailed { uri, reason } => ExError::new(ExErrorKind::DestroyFailed)
                .with_entity_id(uri)
                .with_op("destroy")
                .with_message(reason),

            MdrError::DuplicateIdentifier { identifier, scope } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(identifier)
                    .with_message(format!("Identifier already in use in scope {}", scope))
            }

            MdrError::VersionExhausted {
                identifier,
                version,
            } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(identifier)
                .with_message(format!("No version after {}", version)),

            MdrError::InvalidUri { value } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(value)
                .with_message("Invalid item URI"),

            MdrError::MalformedGraph { subject, reason } => {
                ExError::new(ExErrorKind::MalformedGraph)
                    .with_entity_id(subject)
                    .with_message(reason)
            }

            MdrError::TemplateMissing => ExError::new(ExErrorKind::InvalidInput)
                .with_op("create_from_template")
                .with_message("No Biomedical Concept Template has been defined."),

            MdrError::Serialization { reason } => {
                ExError::new(ExErrorKind::Serialization).with_message(reason)
            }

            MdrError::Config { reason } => ExError::new(ExErrorKind::Config).with_message(reason),

            MdrError::Store(ex) => ex,
        }
    }
}
