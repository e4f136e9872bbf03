//! Connection status flags.
//!
//! # Responsibilities
//! - Define the independent per-connection status bits
//! - Decode a mask into the human-readable `A|B|C` form
//!
//! # Design Decisions
//! - Decode order follows the declaration table, not bit numeric order,
//!   so diagnostic output stays stable across releases
//! - `CLOSED` is sticky: the record API never clears it once set

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Bitmask of independent connection status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ConnFlags(u32);

impl ConnFlags {
    /// Connection socket is closed.
    pub const CLOSED: ConnFlags = ConnFlags(1 << 0);
    /// Client expects no headers.
    pub const SKIPHDRS: ConnFlags = ConnFlags(1 << 1);
    /// HEAD request: send headers only.
    pub const SKIPBODY: ConnFlags = ConnFlags(1 << 2);
    /// Request headers have been read.
    pub const READHDRS: ConnFlags = ConnFlags(1 << 3);
    /// Response headers have been sent.
    pub const SENTHDRS: ConnFlags = ConnFlags(1 << 4);
    /// Character data is converted through the output encoding on write.
    pub const WRITE_ENCODED: ConnFlags = ConnFlags(1 << 5);
    /// Streaming output mode.
    pub const STREAM: ConnFlags = ConnFlags(1 << 6);
    /// Streaming output will close the connection.
    pub const STREAM_CLOSE: ConnFlags = ConnFlags(1 << 7);
    /// Chunked transfer encoding in use.
    pub const CHUNK: ConnFlags = ConnFlags(1 << 8);
    /// Terminating chunk was sent.
    pub const SENT_LAST_CHUNK: ConnFlags = ConnFlags(1 << 9);
    /// Response went through the writer thread.
    pub const SENT_VIA_WRITER: ConnFlags = ConnFlags(1 << 10);
    /// Socket output is corked.
    pub const SOCK_CORKED: ConnFlags = ConnFlags(1 << 11);
    /// Socket is parked in an event wait.
    pub const SOCK_WAITING: ConnFlags = ConnFlags(1 << 12);
    /// Client accepts gzip responses.
    pub const ZIPACCEPTED: ConnFlags = ConnFlags(1 << 13);
    /// Client accepts brotli responses.
    pub const BROTLIACCEPTED: ConnFlags = ConnFlags(1 << 14);
    /// Client sent Expect: 100-continue.
    pub const CONTINUE: ConnFlags = ConnFlags(1 << 15);
    /// Request entity exceeded the configured maximum.
    pub const ENTITYTOOLARGE: ConnFlags = ConnFlags(1 << 16);
    /// Request URI exceeded the configured maximum.
    pub const REQUESTURITOOLONG: ConnFlags = ConnFlags(1 << 17);
    /// A request line exceeded the configured maximum.
    pub const LINETOOLONG: ConnFlags = ConnFlags(1 << 18);
    /// Request line and headers are parsed; the record is usable.
    pub const CONFIGURED: ConnFlags = ConnFlags(1 << 19);
    /// TLS layer wants a write before it can proceed.
    pub const SSL_WANT_WRITE: ConnFlags = ConnFlags(1 << 20);

    /// Empty mask.
    pub const fn empty() -> Self {
        ConnFlags(0)
    }

    /// Raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: ConnFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: ConnFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Decode the set bits into a `|`-joined string in declaration order.
    pub fn decode(self) -> String {
        let mut out = String::new();
        for (flag, name) in FLAG_TABLE {
            if self.contains(*flag) {
                if !out.is_empty() {
                    out.push('|');
                }
                out.push_str(name);
            }
        }
        out
    }
}

/// Decode table. Order here is the output order.
const FLAG_TABLE: &[(ConnFlags, &str)] = &[
    (ConnFlags::CLOSED, "SOCK_CLOSED"),
    (ConnFlags::SKIPHDRS, "SKIPHDRS"),
    (ConnFlags::SKIPBODY, "SKIPBODY"),
    (ConnFlags::READHDRS, "READHDRS"),
    (ConnFlags::SENTHDRS, "SENTHDRS"),
    (ConnFlags::WRITE_ENCODED, "WRITE_ENCODED"),
    (ConnFlags::STREAM, "STREAM"),
    (ConnFlags::STREAM_CLOSE, "STREAM_CLOSE"),
    (ConnFlags::CHUNK, "CHUNK"),
    (ConnFlags::SENT_LAST_CHUNK, "SENT_LAST_CHUNK"),
    (ConnFlags::SENT_VIA_WRITER, "SENT_VIA_WRITER"),
    (ConnFlags::SOCK_CORKED, "SOCK_CORKED"),
    (ConnFlags::SOCK_WAITING, "SOCK_WAITING"),
    (ConnFlags::ZIPACCEPTED, "ZIPACCEPTED"),
    (ConnFlags::BROTLIACCEPTED, "BROTLIACCEPTED"),
    (ConnFlags::CONTINUE, "CONTINUE"),
    (ConnFlags::ENTITYTOOLARGE, "ENTITYTOOLARGE"),
    (ConnFlags::REQUESTURITOOLONG, "REQUESTURITOOLONG"),
    (ConnFlags::LINETOOLONG, "LINETOOLONG"),
    (ConnFlags::CONFIGURED, "CONFIGURED"),
    (ConnFlags::SSL_WANT_WRITE, "SSL_WANT_WRITE"),
];

impl BitOr for ConnFlags {
    type Output = ConnFlags;

    fn bitor(self, rhs: ConnFlags) -> ConnFlags {
        ConnFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConnFlags {
    fn bitor_assign(&mut self, rhs: ConnFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ConnFlags {
    type Output = ConnFlags;

    fn bitand(self, rhs: ConnFlags) -> ConnFlags {
        ConnFlags(self.0 & rhs.0)
    }
}

impl Not for ConnFlags {
    type Output = ConnFlags;

    fn not(self) -> ConnFlags {
        ConnFlags(!self.0)
    }
}

impl fmt::Display for ConnFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}
