//! Host-header grammar and location-string building.
//!
//! # Responsibilities
//! - Strict validation of Host header contents before they are trusted for
//!   absolute-URL building
//! - Assemble `scheme://host[:port]` location strings
//!
//! # Design Decisions
//! - Validation is strict on purpose: the Host header is attacker
//!   controlled, and anything that fails the grammar falls through to the
//!   configured fallbacks instead of being echoed into URLs

use url::Host;

/// Split an optional `:port` suffix off a host header value.
///
/// Returns `None` when the structure is not even splittable (e.g. an
/// unbracketed IPv6 literal or an empty port).
fn split_host_port(value: &str) -> Option<(&str, Option<&str>)> {
    if let Some(rest) = value.strip_prefix('[') {
        // Bracketed IPv6 literal, optionally followed by :port.
        let end = rest.find(']')?;
        let host = &value[..end + 2];
        match &rest[end + 1..] {
            "" => Some((host, None)),
            port => Some((host, Some(port.strip_prefix(':')?))),
        }
    } else if let Some((host, port)) = value.rsplit_once(':') {
        // A second colon means an unbracketed IPv6 literal; reject.
        if host.contains(':') {
            None
        } else {
            Some((host, Some(port)))
        }
    } else {
        Some((value, None))
    }
}

/// Strict host-header grammar check: a valid registered name, IPv4, or
/// bracketed IPv6 literal, with an optional decimal port.
pub fn is_valid_host_header(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let Some((host, port)) = split_host_port(value) else {
        return false;
    };
    if host.is_empty() || Host::parse(host).is_err() {
        return false;
    }
    match port {
        None => true,
        Some(port) => {
            // Digits only: u16 parsing alone would admit a leading '+'.
            !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && port.parse::<u16>().is_ok()
        }
    }
}

/// Append `scheme://host[:port]` to `dest` and return the appended segment.
///
/// A bare IPv6 address is bracketed. The port is omitted when it is zero or
/// equals the protocol's default port (it may then already be embedded in
/// `host`).
pub fn http_location_string(
    dest: &mut String,
    protocol: &str,
    host: &str,
    port: u16,
    default_port: u16,
) -> String {
    let mut segment = String::with_capacity(protocol.len() + host.len() + 9);
    segment.push_str(protocol);
    segment.push_str("://");
    if host.contains(':') && !host.starts_with('[') {
        segment.push('[');
        segment.push_str(host);
        segment.push(']');
    } else {
        segment.push_str(host);
    }
    if port != 0 && port != default_port {
        segment.push(':');
        segment.push_str(&port.to_string());
    }
    dest.push_str(&segment);
    segment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_forms() {
        for host in [
            "example.com",
            "example.com:8080",
            "sub.example.com",
            "192.0.2.1",
            "192.0.2.1:80",
            "[::1]",
            "[::1]:443",
            "localhost",
        ] {
            assert!(is_valid_host_header(host), "{host} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_forms() {
        for host in [
            "",
            "exa mple.com",
            "example.com/path",
            "user@example.com",
            "example.com:",
            "example.com:notaport",
            "example.com:123456",
            "::1",
            "[::1",
        ] {
            assert!(!is_valid_host_header(host), "{host:?} should be invalid");
        }
    }

    #[test]
    fn location_string_basic() {
        let mut dest = String::new();
        let loc = http_location_string(&mut dest, "https", "example.com", 0, 0);
        assert_eq!(loc, "https://example.com");
        assert_eq!(dest, "https://example.com");
    }

    #[test]
    fn location_string_appends_to_existing_buffer() {
        let mut dest = String::from("location: ");
        let loc = http_location_string(&mut dest, "http", "10.0.0.1", 8080, 80);
        assert_eq!(loc, "http://10.0.0.1:8080");
        assert_eq!(dest, "location: http://10.0.0.1:8080");
    }

    #[test]
    fn default_port_is_omitted() {
        let mut dest = String::new();
        let loc = http_location_string(&mut dest, "http", "10.0.0.1", 80, 80);
        assert_eq!(loc, "http://10.0.0.1");
    }

    #[test]
    fn bare_ipv6_gets_brackets() {
        let mut dest = String::new();
        let loc = http_location_string(&mut dest, "https", "::1", 8443, 443);
        assert_eq!(loc, "https://[::1]:8443");
    }
}
