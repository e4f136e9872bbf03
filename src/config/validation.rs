//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check trusted host entries against the host-header grammar
//! - Check the log level is one tracing understands
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the parsed config
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::CoreConfig;
use crate::location::host::is_valid_host_header;

/// One semantic problem found in a parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A trusted host entry does not satisfy the host-header grammar.
    InvalidTrustedHost(String),
    /// Trusted hosts configured while reverse-proxy mode is disabled.
    UnusedTrustedHosts,
    /// Unknown log level name.
    InvalidLogLevel(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidTrustedHost(host) => {
                write!(f, "trusted host {host:?} fails host-header grammar")
            }
            ValidationError::UnusedTrustedHosts => {
                write!(f, "trusted_hosts set but reverse_proxy.enabled is false")
            }
            ValidationError::InvalidLogLevel(level) => {
                write!(f, "unknown log level {level:?}")
            }
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &CoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for host in &config.reverse_proxy.trusted_hosts {
        if !is_valid_host_header(host) {
            errors.push(ValidationError::InvalidTrustedHost(host.clone()));
        }
    }

    if !config.reverse_proxy.enabled && !config.reverse_proxy.trusted_hosts.is_empty() {
        errors.push(ValidationError::UnusedTrustedHosts);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
