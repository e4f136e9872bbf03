//! Connection-state core for a multithreaded HTTP server.
//!
//! This crate is the in-flight representation of one request/response
//! exchange and the algorithms that operate on it: the lifecycle gate that
//! decides which operations are legal in the connection's current state,
//! the phase timing that folds into pool-wide statistics, the
//! trust-sensitive peer address and location resolution, and bounds-checked
//! access to the posted body.
//!
//! # Architecture Overview
//!
//! ```text
//!   accept/dispatch (external)
//!        │
//!        ▼
//!   ┌──────────────────┐   gate ok    ┌─────────────────────────────┐
//!   │ ConnectionRecord │─────────────▶│ request handling (external) │
//!   │  conn::record    │              │   conn::peer   (addresses)  │
//!   └────────┬─────────┘              │   location     (abs. URLs)  │
//!            │                        │   conn::content (body)      │
//!            │ phase marks            └─────────────────────────────┘
//!            ▼
//!   ┌──────────────────┐  finalize    ┌──────────────┐
//!   │   conn::timing   │─────────────▶│ pool (stats) │
//!   └──────────────────┘  (mutex)     └──────────────┘
//! ```
//!
//! A record is owned exclusively by the worker thread processing it; the
//! pool statistics are the only shared mutable state, guarded by a single
//! mutex whose critical section is a five-value addition.
//!
//! Out of scope on purpose: HTTP wire parsing, TLS, socket I/O, and the
//! thread pool's scheduling policy. Those live in the embedding server and
//! reach this crate through the `driver` traits.

// Core subsystems
pub mod config;
pub mod conn;
pub mod driver;
pub mod encoding;
pub mod location;
pub mod pool;

// Cross-cutting concerns
pub mod error;
pub mod observability;

pub use config::{CoreConfig, RuntimeConfig};
pub use conn::{ConnFlags, ConnectionRecord, Requirements};
pub use error::{ConnError, ConnResult};
pub use pool::Pool;
