use std::sync::Arc;
use thiserror::Error;
use trailmark_core_types::ColumnEncoding;

/// Result type alias using TrailError
pub type Result<T> = std::result::Result<T, TrailError>;

/// Boxed error produced by an installed override adapter.
pub type AdapterFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmErrorKind {
    // Caller input
    InvalidArgument,
    InvalidEvent,

    // Column encoding
    UnsupportedColumnType,
    UnknownColumn,

    // Payloads
    DecodeFailure,
    EncodeFailure,

    // Override adapter
    Adapter,

    // Integration/IO
    NotFound,
    Schema,
    Config,
    Persistence,
}

impl TmErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            TmErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            TmErrorKind::InvalidEvent => "ERR_INVALID_EVENT",
            TmErrorKind::UnsupportedColumnType => "ERR_UNSUPPORTED_COLUMN_TYPE",
            TmErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            TmErrorKind::DecodeFailure => "ERR_DECODE_FAILURE",
            TmErrorKind::EncodeFailure => "ERR_ENCODE_FAILURE",
            TmErrorKind::Adapter => "ERR_ADAPTER",
            TmErrorKind::NotFound => "ERR_NOT_FOUND",
            TmErrorKind::Schema => "ERR_SCHEMA",
            TmErrorKind::Config => "ERR_CONFIG",
            TmErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context describing where the failure happened.
#[derive(Debug, Clone)]
pub struct TmError {
    kind: TmErrorKind,
    op: Option<String>,
    table: Option<String>,
    column: Option<String>,
    record_id: Option<i64>,
    message: String,
    adapter_source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TmError {
    /// Create a new error with the specified kind
    pub fn new(kind: TmErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            column: None,
            record_id: None,
            message: String::new(),
            adapter_source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add history record id context
    pub fn with_record_id(mut self, id: i64) -> Self {
        self.record_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> TmErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The untouched error raised by an override adapter, if this error came
    /// from one. Callers can downcast it to their own error type.
    pub fn adapter_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.adapter_source.as_deref()
    }
}

impl std::fmt::Display for TmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(id) = self.record_id {
            write!(f, " (record_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for TmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.adapter_source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for the diff encoding and query-translation core
#[derive(Error, Debug, Clone)]
pub enum TrailError {
    /// A builder or operation received an argument of the wrong shape
    #[error("Invalid argument for {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    /// A query shape has no implementation for the column's encoding
    #[error("{op} is not supported on a column of type {encoding}")]
    UnsupportedColumnType {
        op: &'static str,
        encoding: ColumnEncoding,
    },

    /// A declared column type that cannot hold an encoded payload
    #[error("Column {table}.{column} has unsupported declared type '{declared}'")]
    UnsupportedDeclaredType {
        table: String,
        column: String,
        declared: String,
    },

    /// The table or column does not exist in the live schema
    #[error("Unknown column {table}.{column}")]
    UnknownColumn { table: String, column: String },

    /// A stored payload could not be decoded
    #[error("Failed to decode {strategy} payload: {reason}")]
    DecodeFailure { strategy: String, reason: String },

    /// A mapping could not be encoded
    #[error("Failed to encode {strategy} payload: {reason}")]
    EncodeFailure { strategy: String, reason: String },

    /// The override adapter failed; the original error is kept intact
    #[error("Override adapter failed in {op}: {source}")]
    Adapter {
        op: &'static str,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Schema metadata could not be read
    #[error("Schema introspection failed: {reason}")]
    Schema { reason: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// A history event was missing data it requires
    #[error("Invalid {event} event: {reason}")]
    InvalidEvent { event: String, reason: String },
}

impl TrailError {
    pub fn invalid_argument(op: &'static str, reason: impl Into<String>) -> Self {
        TrailError::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }

    pub fn unsupported(op: &'static str, encoding: ColumnEncoding) -> Self {
        TrailError::UnsupportedColumnType { op, encoding }
    }

    pub fn decode(strategy: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        TrailError::DecodeFailure {
            strategy: strategy.into(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(strategy: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        TrailError::EncodeFailure {
            strategy: strategy.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an adapter failure without translating it.
    pub fn adapter(op: &'static str, source: AdapterFailure) -> Self {
        TrailError::Adapter {
            op,
            source: Arc::from(source),
        }
    }
}

impl From<TrailError> for TmError {
    fn from(err: TrailError) -> Self {
        let message = err.to_string();
        match err {
            TrailError::InvalidArgument { op, .. } => TmError::new(TmErrorKind::InvalidArgument)
                .with_op(op)
                .with_message(message),

            TrailError::UnsupportedColumnType { op, .. } => {
                TmError::new(TmErrorKind::UnsupportedColumnType)
                    .with_op(op)
                    .with_message(message)
            }

            TrailError::UnsupportedDeclaredType { table, column, .. } => {
                TmError::new(TmErrorKind::UnsupportedColumnType)
                    .with_op("resolve_encoding")
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            TrailError::UnknownColumn { table, column } => {
                TmError::new(TmErrorKind::UnknownColumn)
                    .with_op("resolve_encoding")
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            TrailError::DecodeFailure { .. } => {
                TmError::new(TmErrorKind::DecodeFailure).with_message(message)
            }

            TrailError::EncodeFailure { .. } => {
                TmError::new(TmErrorKind::EncodeFailure).with_message(message)
            }

            TrailError::Adapter { op, source } => {
                let mut ex = TmError::new(TmErrorKind::Adapter)
                    .with_op(op)
                    .with_message(message);
                ex.adapter_source = Some(source);
                ex
            }

            TrailError::Schema { .. } => TmError::new(TmErrorKind::Schema).with_message(message),

            TrailError::Config { .. } => TmError::new(TmErrorKind::Config).with_message(message),

            TrailError::InvalidEvent { .. } => {
                TmError::new(TmErrorKind::InvalidEvent).with_message(message)
            }
        }
    }
}
