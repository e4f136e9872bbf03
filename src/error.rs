//! Connection-core error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by connection-state operations.
///
/// Messages carry the concrete numeric values involved so callers can act on
/// them without re-deriving context.
#[derive(Debug, Error)]
pub enum ConnError {
    /// No connection is associated with the current request.
    #[error("no connection")]
    NoConnection,

    /// The underlying socket was detached (e.g. for channel hand-off).
    #[error("connection socket already detached")]
    SocketDetached,

    /// The connection was already closed.
    #[error("connection already closed")]
    AlreadyClosed,

    /// Request line and headers have not been parsed yet.
    #[error("connection not yet configured")]
    NotConfigured,

    /// Offset points past the end of the available content.
    #[error("offset {offset} exceeds available content length ({available})")]
    OffsetOutOfRange { offset: usize, available: usize },

    /// Offset plus requested length overruns the available content.
    #[error("offset ({offset}) + length ({length}) exceeds available content length ({available})")]
    LengthOutOfRange {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// Charset name not known to the encoding registry.
    #[error("unknown charset \"{0}\"")]
    UnknownCharset(String),

    /// Request body was spooled to a file; in-memory access is not possible.
    #[error("content was spooled to file {path:?}, must be handled externally")]
    ContentSpooled { path: PathBuf },

    /// Writing slice data to an output channel failed.
    #[error("write to output channel failed: {0}")]
    Write(#[from] std::io::Error),

    /// Lookup of an uploaded file by form-field key failed.
    #[error("no uploaded file for key \"{0}\"")]
    UnknownUpload(String),
}

/// Result type for connection-state operations.
pub type ConnResult<T> = Result<T, ConnError>;
