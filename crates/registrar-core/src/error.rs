//! Error taxonomy for the registrar adapter
//!
//! Every failure that crosses a component boundary is a [`ServiceError`]: one
//! [`ErrorKind`] from a closed enumeration plus a human-readable message.
//!
//! Kinds translate to two code spaces:
//!
//! - HTTP status codes ([`ErrorKind::http_status`] / [`ErrorKind::from_http_status`])
//! - canonical RPC codes ([`ErrorKind::rpc_code`] / [`ErrorKind::from_rpc_code`])
//!
//! Forward translation is total. Reverse translation is best-effort and never
//! fails: codes without a designated kind fall back to [`ErrorKind::Internal`]
//! (HTTP) or [`ErrorKind::Unknown`] (RPC).

use std::fmt;
use thiserror::Error;

/// Result type alias for registrar operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Closed set of error kinds raised by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced entity does not exist
    NotFound,
    /// Missing or malformed arguments supplied by a caller
    InvalidArgument,
    /// The entity being created already exists
    AlreadyExists,
    /// The caller lacks permission for the resource
    PermissionDenied,
    /// The request lacks valid credentials
    Unauthenticated,
    /// The operation is not implemented
    Unimplemented,
    /// An error with no better classification
    Unknown,
    /// An internal invariant or dependency failed
    Internal,
    /// The dependency is temporarily unavailable
    Unavailable,
    /// The system is not in a state required for the operation
    FailedPrecondition,
    /// The operation expired before completion
    DeadlineExceeded,
    /// A quota or resource has been exhausted
    ResourceExhausted,
    /// The operation was aborted, typically by a concurrency conflict
    Aborted,
}

impl ErrorKind {
    /// All kinds, in declaration order
    pub const ALL: [ErrorKind; 13] = [
        ErrorKind::NotFound,
        ErrorKind::InvalidArgument,
        ErrorKind::AlreadyExists,
        ErrorKind::PermissionDenied,
        ErrorKind::Unauthenticated,
        ErrorKind::Unimplemented,
        ErrorKind::Unknown,
        ErrorKind::Internal,
        ErrorKind::Unavailable,
        ErrorKind::FailedPrecondition,
        ErrorKind::DeadlineExceeded,
        ErrorKind::ResourceExhausted,
        ErrorKind::Aborted,
    ];

    /// Stable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::Unauthenticated => "Unauthenticated",
            ErrorKind::Unimplemented => "Unimplemented",
            ErrorKind::Unknown => "Unknown",
            ErrorKind::Internal => "Internal",
            ErrorKind::Unavailable => "Unavailable",
            ErrorKind::FailedPrecondition => "FailedPrecondition",
            ErrorKind::DeadlineExceeded => "DeadlineExceeded",
            ErrorKind::ResourceExhausted => "ResourceExhausted",
            ErrorKind::Aborted => "Aborted",
        }
    }

    /// HTTP status code designated for this kind
    ///
    /// `Unknown`, `Internal` and `Aborted` share 500.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidArgument => 400,
            ErrorKind::AlreadyExists => 409,
            ErrorKind::PermissionDenied => 403,
            ErrorKind::Unauthenticated => 401,
            ErrorKind::Unimplemented => 501,
            ErrorKind::FailedPrecondition => 412,
            ErrorKind::DeadlineExceeded => 408,
            ErrorKind::ResourceExhausted => 429,
            ErrorKind::Unavailable => 503,
            ErrorKind::Aborted | ErrorKind::Unknown | ErrorKind::Internal => 500,
        }
    }

    /// Classify an HTTP status code
    ///
    /// Codes without a designated kind (including 500) classify as `Internal`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthenticated,
            403 => ErrorKind::PermissionDenied,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::AlreadyExists,
            412 => ErrorKind::FailedPrecondition,
            429 => ErrorKind::ResourceExhausted,
            501 => ErrorKind::Unimplemented,
            503 => ErrorKind::Unavailable,
            _ => ErrorKind::Internal,
        }
    }

    /// Canonical RPC code designated for this kind
    pub fn rpc_code(&self) -> RpcCode {
        match self {
            ErrorKind::NotFound => RpcCode::NotFound,
            ErrorKind::InvalidArgument => RpcCode::InvalidArgument,
            ErrorKind::AlreadyExists => RpcCode::AlreadyExists,
            ErrorKind::PermissionDenied => RpcCode::PermissionDenied,
            ErrorKind::Unauthenticated => RpcCode::Unauthenticated,
            ErrorKind::Unimplemented => RpcCode::Unimplemented,
            ErrorKind::Unknown => RpcCode::Unknown,
            ErrorKind::Internal => RpcCode::Internal,
            ErrorKind::Unavailable => RpcCode::Unavailable,
            ErrorKind::FailedPrecondition => RpcCode::FailedPrecondition,
            ErrorKind::DeadlineExceeded => RpcCode::DeadlineExceeded,
            ErrorKind::ResourceExhausted => RpcCode::ResourceExhausted,
            ErrorKind::Aborted => RpcCode::Aborted,
        }
    }

    /// Classify a canonical RPC code
    ///
    /// `Ok`, `Cancelled`, `OutOfRange` and `DataLoss` have no designated kind
    /// and classify as `Unknown`.
    pub fn from_rpc_code(code: RpcCode) -> Self {
        match code {
            RpcCode::NotFound => ErrorKind::NotFound,
            RpcCode::InvalidArgument => ErrorKind::InvalidArgument,
            RpcCode::AlreadyExists => ErrorKind::AlreadyExists,
            RpcCode::PermissionDenied => ErrorKind::PermissionDenied,
            RpcCode::Unauthenticated => ErrorKind::Unauthenticated,
            RpcCode::Unimplemented => ErrorKind::Unimplemented,
            RpcCode::Internal => ErrorKind::Internal,
            RpcCode::Unavailable => ErrorKind::Unavailable,
            RpcCode::FailedPrecondition => ErrorKind::FailedPrecondition,
            RpcCode::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            RpcCode::ResourceExhausted => ErrorKind::ResourceExhausted,
            RpcCode::Aborted => ErrorKind::Aborted,
            RpcCode::Ok
            | RpcCode::Cancelled
            | RpcCode::Unknown
            | RpcCode::OutOfRange
            | RpcCode::DataLoss => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical RPC status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RpcCode {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl RpcCode {
    /// Decode a wire value; out-of-range values decode as `Unknown`
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => RpcCode::Ok,
            1 => RpcCode::Cancelled,
            3 => RpcCode::InvalidArgument,
            4 => RpcCode::DeadlineExceeded,
            5 => RpcCode::NotFound,
            6 => RpcCode::AlreadyExists,
            7 => RpcCode::PermissionDenied,
            8 => RpcCode::ResourceExhausted,
            9 => RpcCode::FailedPrecondition,
            10 => RpcCode::Aborted,
            11 => RpcCode::OutOfRange,
            12 => RpcCode::Unimplemented,
            13 => RpcCode::Internal,
            14 => RpcCode::Unavailable,
            15 => RpcCode::DataLoss,
            16 => RpcCode::Unauthenticated,
            _ => RpcCode::Unknown,
        }
    }
}

/// A classified error: one [`ErrorKind`] plus a message
///
/// Errors produced from an upstream HTTP response also carry the original
/// status code. Fields are private; a `ServiceError` is never modified after
/// construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
}

impl ServiceError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Create an error from a non-success upstream HTTP status
    ///
    /// The kind is derived from the status with [`ErrorKind::from_http_status`].
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::from_http_status(status),
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create an error from an RPC status
    pub fn from_rpc(code: RpcCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::from_rpc_code(code), message)
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg)
    }

    /// Create an unknown error
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, msg)
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, msg)
    }

    /// Create an aborted error
    pub fn aborted(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Aborted, msg)
    }

    /// The error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The upstream HTTP status, when the error came from a response
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether this error has the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// HTTP status for reporting this error to a caller
    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    /// RPC code for reporting this error to a caller
    pub fn rpc_code(&self) -> RpcCode {
        self.kind.rpc_code()
    }

    /// Message safe to expose over RPC
    ///
    /// Unclassified errors do not leak their message.
    pub fn rpc_message(&self) -> &str {
        match self.kind {
            ErrorKind::Unknown => "Unknown server error.",
            _ => &self.message,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}
