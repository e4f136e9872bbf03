//! Lifecycle gate: validates a connection's state before an operation.
//!
//! # Responsibilities
//! - Check required-state predicates (CONFIGURED, CONNECTED, OPEN)
//! - Classify failures as hard errors or policy-suppressible soft skips
//!
//! # Evaluation order (first failure wins)
//! ```text
//! 1. no connection          → hard, always
//! 2. CONNECTED, no socket   → soft under lenient policy
//! 3. OPEN, CLOSED flag set  → soft under lenient policy
//! 4. CONFIGURED flag absent → hard, always
//! ```
//!
//! # Design Decisions
//! - Detached/closed connections occur legitimately during shutdown races;
//!   the soft path lets callers skip the operation silently instead of
//!   surfacing an error
//! - CONFIGURED can never be softened: an unconfigured record has no
//!   request to act on, so skipping would hide a real bug

use std::ops::BitOr;

use crate::config::RuntimeConfig;
use crate::conn::flags::ConnFlags;
use crate::conn::record::ConnectionRecord;
use crate::error::ConnError;

/// Set of state predicates an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirements(u32);

impl Requirements {
    /// No requirements; only the presence of a connection is checked.
    pub const NONE: Requirements = Requirements(0);
    /// Request line and headers must be parsed.
    pub const CONFIGURED: Requirements = Requirements(1 << 0);
    /// An underlying socket must still be attached.
    pub const CONNECTED: Requirements = Requirements(1 << 1);
    /// The CLOSED flag must not be set.
    pub const OPEN: Requirements = Requirements(1 << 2);

    pub const fn contains(self, other: Requirements) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Requirements {
    type Output = Requirements;

    fn bitor(self, rhs: Requirements) -> Requirements {
        Requirements(self.0 | rhs.0)
    }
}

/// A failed gate check.
///
/// `Soft` means the caller should discard any partially-built output, skip
/// the operation, and report success upward; the event has already been
/// logged at info level. `Hard` propagates as an error.
#[derive(Debug)]
pub enum GateDenial {
    Hard(ConnError),
    Soft(ConnError),
}

impl GateDenial {
    pub fn is_soft(&self) -> bool {
        matches!(self, GateDenial::Soft(_))
    }

    /// The underlying state error, regardless of classification.
    pub fn into_error(self) -> ConnError {
        match self {
            GateDenial::Hard(e) | GateDenial::Soft(e) => e,
        }
    }
}

fn deny(err: ConnError, conn: &ConnectionRecord, runtime: &RuntimeConfig) -> GateDenial {
    if runtime.reject_already_closed {
        GateDenial::Hard(err)
    } else {
        tracing::info!(id = %conn.id(), error = %err, "skipping operation on unavailable connection");
        GateDenial::Soft(err)
    }
}

/// Validate `conn` against `req`, returning the connection reference on
/// success.
pub fn require<'a>(
    conn: Option<&'a ConnectionRecord>,
    req: Requirements,
    runtime: &RuntimeConfig,
) -> Result<&'a ConnectionRecord, GateDenial> {
    let Some(conn) = conn else {
        return Err(GateDenial::Hard(ConnError::NoConnection));
    };

    if req.contains(Requirements::CONNECTED) && !conn.is_connected() {
        return Err(deny(ConnError::SocketDetached, conn, runtime));
    }

    if req.contains(Requirements::OPEN) && conn.is_closed() {
        return Err(deny(ConnError::AlreadyClosed, conn, runtime));
    }

    if req.contains(Requirements::CONFIGURED) && !conn.flags().contains(ConnFlags::CONFIGURED) {
        return Err(GateDenial::Hard(ConnError::NotConfigured));
    }

    Ok(conn)
}
