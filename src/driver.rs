//! Collaborator interfaces consumed by the connection core.
//!
//! # Responsibilities
//! - `Driver`: the protocol/transport adapter a connection arrived through
//! - `Socket`: the attached transport endpoint (detachable for hand-off)
//! - `Headers`: case-insensitive key/value collection for request metadata
//!
//! # Design Decisions
//! - Driver and socket are trait objects: the core never depends on a
//!   concrete I/O implementation
//! - `Headers` is concrete; storage policy is simple enough that an
//!   abstraction seam would buy nothing

use crate::conn::record::ConnectionRecord;

/// Protocol/transport adapter for a listening endpoint.
pub trait Driver: Send + Sync {
    /// Protocol scheme, e.g. `"http"` or `"https"`.
    fn protocol(&self) -> &str;

    /// Statically configured listen address.
    fn address(&self) -> &str;

    /// Statically configured listen port.
    fn port(&self) -> u16;

    /// Default port for the protocol (omitted from location strings).
    fn default_port(&self) -> u16;

    /// Module/display name for logging.
    fn name(&self) -> &str;

    /// Optional structured diagnostic record for a connection.
    fn connection_info(&self, conn: &ConnectionRecord) -> Option<serde_json::Value> {
        let _ = conn;
        None
    }
}

/// A connected transport endpoint.
///
/// The core only queries addresses and toggles blocking mode; reading and
/// writing stay with the driver implementation.
pub trait Socket: Send + Sync {
    /// Local address of the live socket.
    fn local_addr(&self) -> String;

    /// Local port of the live socket.
    fn local_port(&self) -> u16;

    /// Peer address of the live socket.
    fn peer_addr(&self) -> String;

    /// Peer port of the live socket.
    fn peer_port(&self) -> u16;

    /// Toggle blocking mode on the descriptor.
    fn set_blocking(&self, blocking: bool);

    /// Raw descriptor, for hand-off to external channel code.
    fn raw_fd(&self) -> i32;
}

/// A driver backed by static configuration, for embedding servers that
/// resolve their listen parameters up front.
#[derive(Debug, Clone)]
pub struct StaticDriver {
    protocol: String,
    address: String,
    port: u16,
    default_port: u16,
    name: String,
}

impl StaticDriver {
    pub fn new(
        protocol: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        default_port: u16,
        name: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            address: address.into(),
            port,
            default_port,
            name: name.into(),
        }
    }
}

impl Driver for StaticDriver {
    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn default_port(&self) -> u16 {
        self.default_port
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered key/value collection with case-insensitive lookup.
///
/// Insertion order is preserved; duplicate keys are allowed and `iget`
/// returns the first match, matching usual header-set behavior.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Case-insensitive get of the first value for `key`.
    pub fn iget(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
