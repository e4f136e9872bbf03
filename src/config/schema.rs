//! Configuration schema definitions.
//!
//! This module defines the process-wide configuration for the connection
//! core. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the connection core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    /// Reverse-proxy trust settings.
    pub reverse_proxy: ReverseProxyConfig,

    /// Virtual-hosting settings.
    pub vhost: VhostConfig,

    /// Lifecycle-gate policy.
    pub gate: GateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Reverse-proxy trust mode.
///
/// When enabled, forwarded-for addresses and Host headers from the upstream
/// proxy are trusted per the rules in `conn::peer` and `location`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReverseProxyConfig {
    /// Trust headers set by an upstream reverse proxy.
    pub enabled: bool,

    /// Host header values accepted for location building while in
    /// reverse-proxy mode (exact match).
    pub trusted_hosts: Vec<String>,
}

/// Virtual-hosting settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VhostConfig {
    /// Derive per-request identity from the Host header.
    pub enabled: bool,
}

/// Lifecycle-gate policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Treat operations on already-closed or detached connections as hard
    /// errors. When false they become benign no-ops (logged, skipped,
    /// reported as success), which tolerates shutdown races.
    pub reject_already_closed: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            reject_already_closed: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
