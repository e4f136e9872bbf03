//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → log aggregation (stdout, file, remote)
//! ```
//!
//! # Design Decisions
//! - Structured logging with per-connection id fields throughout
//! - Timing aggregates live in `pool`; exposing them is the embedding
//!   server's concern, not this crate's

pub mod logging;
