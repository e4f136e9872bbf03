//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CoreConfig (validated)
//!     → RuntimeConfig (immutable view, shared via Arc to all resolvers)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload in the core
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{CoreConfig, GateConfig, ObservabilityConfig, ReverseProxyConfig, VhostConfig};

/// Immutable-after-initialization view of the process-wide policies the
/// resolvers and the lifecycle gate consult on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeConfig {
    /// Trust forwarded-for addresses and proxy-set Host headers.
    pub reverse_proxy_mode: bool,
    /// Hard-fail operations on closed/detached connections. When false,
    /// such failures become benign no-ops.
    pub reject_already_closed: bool,
}

impl RuntimeConfig {
    /// Derive the runtime view from a validated configuration.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            reverse_proxy_mode: config.reverse_proxy.enabled,
            reject_already_closed: config.gate.reject_already_closed,
        }
    }
}
