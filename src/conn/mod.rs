//! Connection subsystem: per-request state and the operations over it.
//!
//! # Data Flow
//! ```text
//! accept/dispatch path (external)
//!     → record.rs (ConnectionRecord created, accept time stamped)
//!     → worker thread owns the record exclusively
//!         gate.rs     (state validated before every operation)
//!         timing.rs   (phase boundaries stamped as work progresses)
//!         peer.rs     (trust-sensitive peer address resolution)
//!         content.rs  (bounds-checked body access)
//!     → timing.rs finalize() folds spans into the pool aggregate
//!     → record closed, recycled or dropped
//! ```
//!
//! # Design Decisions
//! - A record is single-owner for its whole processing span; the pool
//!   aggregate is the only shared state it ever touches
//! - All content-adjacent accessors re-check CLOSED defensively: the
//!   backing memory may be gone once the connection is torn down

pub mod content;
pub mod flags;
pub mod gate;
pub mod peer;
pub mod record;
pub mod timing;

pub use content::{copy_to_writer, slice, ContentMode, SliceData};
pub use flags::ConnFlags;
pub use gate::{require, GateDenial, Requirements};
pub use record::{ConnId, ConnectionRecord, RequestContent, UploadedFile};
pub use timing::TimeSpans;
