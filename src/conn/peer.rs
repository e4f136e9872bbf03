//! Peer address resolution under the reverse-proxy trust policy.
//!
//! # Responsibilities
//! - Record the direct TCP peer and the forwarded (proxy-reported) peer
//! - Resolve the "configured" peer address per the trust mode
//!
//! # Design Decisions
//! - The forwarded address comes from an attacker-controllable header, so
//!   it is only ever honored when the operator enabled reverse-proxy mode
//! - Unknown addresses are empty strings, not options: every caller of the
//!   original API treats empty as "unknown" and the string form travels
//!   into log fields unchanged

use std::net::SocketAddr;

use crate::config::RuntimeConfig;
use crate::conn::record::ConnectionRecord;

impl ConnectionRecord {
    /// Direct TCP peer address recorded at accept time. Empty when unknown.
    pub fn peer_addr(&self) -> &str {
        &self.peer
    }

    /// Peer address reported by a forwarded-for style header. Empty when
    /// absent.
    pub fn forwarded_peer_addr(&self) -> &str {
        &self.proxy_peer
    }

    /// Direct TCP peer port.
    pub fn peer_port(&self) -> u16 {
        self.peer_port
    }

    /// Mode-specific peer address. In reverse-proxy mode, prefer the
    /// forwarded address and fall back to the direct one when it is empty;
    /// otherwise always the direct address.
    pub fn configured_peer_addr(&self, runtime: &RuntimeConfig) -> &str {
        if runtime.reverse_proxy_mode && !self.proxy_peer.is_empty() {
            &self.proxy_peer
        } else {
            &self.peer
        }
    }

    /// Record the peer of this connection. `proxy_peer` carries the
    /// proxy-reported client address when present; when absent the
    /// forwarded slot is cleared.
    pub fn set_peer(&mut self, peer: SocketAddr, proxy_peer: Option<SocketAddr>) {
        self.peer = peer.ip().to_string();
        self.peer_port = peer.port();
        match proxy_peer {
            Some(addr) => self.proxy_peer = addr.ip().to_string(),
            None => self.proxy_peer.clear(),
        }
    }

    /// Local address of the live socket; `None` once detached.
    pub fn current_addr(&self) -> Option<String> {
        self.socket().map(|s| s.local_addr())
    }

    /// Local port of the live socket; 0 once detached.
    pub fn current_port(&self) -> u16 {
        self.socket().map(|s| s.local_port()).unwrap_or(0)
    }
}
