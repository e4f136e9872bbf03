//! Location resolution: the `scheme://host[:port]` prefix for absolute URLs.
//!
//! # Fallback chain
//! ```text
//! 1. registered location callback (modern form, with output buffer)
//! 2. registered location callback (legacy form, connection only)
//! 3. vhosting: validated Host header       → scheme://host
//! 4. reverse-proxy: trusted Host header    → scheme://host
//! 5. (3/4 enabled but not applicable       → warn, keep falling)
//! 6. static per-connection override from the vhost mapping table
//! 7. numeric local address and port (socket if attached, else driver)
//! ```
//!
//! First tier producing a string wins; tier 7 always produces one.
//!
//! # Design Decisions
//! - The Host header is only trusted after strict grammar validation
//!   (vhosting) or an exact match against the operator's trusted set
//!   (reverse-proxy mode); everything else falls through with a warning
//! - Tiers are separate conditions evaluated in order with early exit,
//!   keeping each independently testable

pub mod host;

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{CoreConfig, RuntimeConfig};
use crate::conn::record::ConnectionRecord;
use host::{http_location_string, is_valid_host_header};

/// Modern location callback: receives the connection and the output buffer.
///
/// Implementations may attach request-scoped context to their own state
/// before producing a location (the original registers a scripting
/// interpreter here); the resolver only consumes the returned string.
pub trait LocationProc: Send + Sync {
    fn location(&self, conn: &ConnectionRecord, dest: &mut String) -> Option<String>;
}

/// Legacy location callback: connection only; the resolver appends the
/// returned string to the output buffer itself.
pub trait LegacyLocationProc: Send + Sync {
    fn location(&self, conn: &ConnectionRecord) -> Option<String>;
}

/// The per-server registered location override, if any.
#[derive(Clone)]
pub enum LocationCallback {
    Modern(Arc<dyn LocationProc>),
    Legacy(Arc<dyn LegacyLocationProc>),
}

/// Per-server virtual-hosting state consulted by the resolver.
#[derive(Clone, Default)]
pub struct ServerVhost {
    /// Virtual hosting enabled: derive locations from the Host header.
    pub enabled: bool,
    /// Exact-match set of Host values trusted in reverse-proxy mode.
    pub trusted_hosts: HashSet<String>,
    /// Registered location callback, tried before everything else.
    pub callback: Option<LocationCallback>,
}

impl ServerVhost {
    /// Build the vhost state from a validated configuration. Callbacks are
    /// registered separately at server initialization.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            enabled: config.vhost.enabled,
            trusted_hosts: config.reverse_proxy.trusted_hosts.iter().cloned().collect(),
            callback: None,
        }
    }

    pub fn set_location_callback(&mut self, callback: LocationCallback) {
        self.callback = Some(callback);
    }
}

/// Resolve the location of `conn`, appending it to `dest` and returning it.
///
/// Never fails: tier 7 falls back to the driver's statically configured
/// address when even the socket is gone.
pub fn resolve(
    conn: &ConnectionRecord,
    dest: &mut String,
    server: &ServerVhost,
    runtime: &RuntimeConfig,
) -> String {
    tracing::debug!(
        callback = server.callback.is_some(),
        vhost_enabled = server.enabled,
        reverse_proxy = runtime.reverse_proxy_mode,
        "resolving connection location"
    );

    let protocol = conn.driver().protocol();
    let mut location: Option<String> = None;

    if let Some(callback) = &server.callback {
        match callback {
            LocationCallback::Modern(cb) => {
                location = cb.location(conn, dest);
                tracing::debug!(location = ?location, "location callback returned");
            }
            LocationCallback::Legacy(cb) => {
                if let Some(value) = cb.location(conn) {
                    dest.push_str(&value);
                    tracing::debug!(location = %value, "legacy location callback returned");
                    location = Some(value);
                }
            }
        }
    } else if server.enabled || runtime.reverse_proxy_mode {
        // A present-but-empty header is not "missing": it falls through the
        // match guards below and draws the invalid-host warning instead.
        match conn.headers.iget("host") {
            Some(header_host) if server.enabled && is_valid_host_header(header_host) => {
                // Do not append an extra port: it must already be embedded
                // in the host value if needed.
                let value = http_location_string(dest, protocol, header_host, 0, 0);
                tracing::debug!(location = %value, "vhost location from host header");
                location = Some(value);
            }
            Some(header_host)
                if runtime.reverse_proxy_mode
                    && !header_host.is_empty()
                    && server.trusted_hosts.contains(header_host) =>
            {
                let value = http_location_string(dest, protocol, header_host, 0, 0);
                tracing::debug!(location = %value, "reverse-proxy location from trusted host");
                location = Some(value);
            }
            Some(header_host) => {
                tracing::warn!(
                    host = %header_host,
                    "ignoring invalid or untrusted host header field"
                );
            }
            None => {
                tracing::warn!("required host header field is missing");
            }
        }
    }

    if location.is_none() {
        // Static override assigned from the virtual-host mapping table at
        // accept time.
        if let Some(mapped) = conn.location_override() {
            dest.push_str(mapped);
            tracing::debug!(location = %mapped, "location from mapping table");
            location = Some(mapped.to_string());
        }
    }

    let location = match location {
        Some(value) => value,
        None => {
            // Last resort: numeric local address. Live socket if attached,
            // otherwise the driver's static configuration.
            let (addr, port) = match conn.socket() {
                Some(sock) => (sock.local_addr(), sock.local_port()),
                None => (conn.driver().address().to_string(), conn.driver().port()),
            };
            tracing::debug!(%addr, port, "location final resort, numeric address");
            http_location_string(dest, protocol, &addr, port, conn.driver().default_port())
        }
    };

    tracing::debug!(location = %location, "resolved connection location");
    location
}
