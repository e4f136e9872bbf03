//! Location resolution across the vhosting / reverse-proxy / fallback
//! matrix, driven through configuration the way an embedding server would
//! set it up.

use std::sync::Arc;

use conncore::config::RuntimeConfig;
use conncore::location::{resolve, ServerVhost};
use conncore::CoreConfig;

mod common;

fn setup(vhost_enabled: bool, reverse_proxy: bool, trusted: &[&str]) -> (ServerVhost, RuntimeConfig) {
    let mut config = CoreConfig::default();
    config.vhost.enabled = vhost_enabled;
    config.reverse_proxy.enabled = reverse_proxy;
    config.reverse_proxy.trusted_hosts = trusted.iter().map(|s| s.to_string()).collect();

    let server = ServerVhost::from_config(&config);
    let runtime = RuntimeConfig::from_config(&config);
    (server, runtime)
}

#[test]
fn vhosting_builds_location_from_host_header() {
    let pool = Arc::new(conncore::Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.headers.insert("Host", "example.com:8443");

    let (server, runtime) = setup(true, false, &[]);
    let mut dest = String::new();
    // Port comes from the header itself; none is appended.
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://example.com:8443"
    );
}

#[test]
fn missing_host_header_falls_back_to_driver_address() {
    let pool = Arc::new(conncore::Pool::new("default"));
    let conn = common::record_in_pool(&pool);

    let (server, runtime) = setup(true, false, &[]);
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://10.0.0.1:8080"
    );
}

#[test]
fn reverse_proxy_trusts_only_the_configured_set() {
    let pool = Arc::new(conncore::Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.headers.insert("Host", "app.example.com");

    let (server, runtime) = setup(false, true, &["app.example.com"]);
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://app.example.com"
    );

    let (server, runtime) = setup(false, true, &["other.example.com"]);
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://10.0.0.1:8080"
    );
}

#[test]
fn everything_disabled_ignores_host_header() {
    let pool = Arc::new(conncore::Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.headers.insert("Host", "example.com");

    let (server, runtime) = setup(false, false, &[]);
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://10.0.0.1:8080"
    );
}

#[test]
fn live_socket_beats_static_driver_address() {
    let pool = Arc::new(conncore::Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.attach_socket(Arc::new(common::LoopbackSocket {
        local_addr: "10.0.0.99",
        local_port: 9090,
    }));

    let (server, runtime) = setup(false, false, &[]);
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://10.0.0.99:9090"
    );

    // After detach, resolution returns to the driver's configuration.
    conn.detach_socket();
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "http://10.0.0.1:8080"
    );
}

#[test]
fn mapping_table_override_wins_over_numeric_fallback() {
    let pool = Arc::new(conncore::Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.set_location_override("https://mapped.example.org:8443");

    let (server, runtime) = setup(false, false, &[]);
    let mut dest = String::new();
    assert_eq!(
        resolve(&conn, &mut dest, &server, &runtime),
        "https://mapped.example.org:8443"
    );
}
