//! End-to-end walk of one connection through its lifecycle, and the gate
//! behavior around shutdown races.

use std::sync::Arc;
use std::time::Duration;

use conncore::conn::{require, slice, ConnFlags, ContentMode, Requirements, SliceData};
use conncore::{ConnError, Pool, RuntimeConfig};

mod common;

fn strict() -> RuntimeConfig {
    RuntimeConfig {
        reverse_proxy_mode: false,
        reject_already_closed: true,
    }
}

fn lenient() -> RuntimeConfig {
    RuntimeConfig {
        reverse_proxy_mode: false,
        reject_already_closed: false,
    }
}

#[test]
fn full_lifecycle_folds_into_pool_stats() {
    let pool = Arc::new(Pool::new("default"));
    let mut conn = common::attached_record(&pool);

    // Accept path: peer recorded, headers parsed, body buffered.
    conn.set_peer("198.51.100.7:40000".parse().unwrap(), None);
    conn.headers.insert("Host", "example.com");
    conn.set_content(b"name=value".to_vec());
    conn.set_flags(ConnFlags::CONFIGURED);

    // Worker thread advances through the phases.
    conn.mark_queued();
    std::thread::sleep(Duration::from_millis(2));
    conn.mark_dequeued();
    conn.mark_filters_done();

    // Handler runs under a passed gate.
    {
        let validated = require(
            Some(&conn),
            Requirements::CONFIGURED | Requirements::OPEN,
            &strict(),
        )
        .expect("configured open connection must pass");
        let body = slice(validated, 0, None, ContentMode::Binary).unwrap();
        assert_eq!(body, SliceData::Bytes(b"name=value".to_vec()));
    }

    conn.update_spans();
    conn.finalize();
    conn.close();

    let stats = pool.snapshot();
    assert_eq!(stats.finalized, 1);
    assert!(stats.queue_time >= Duration::from_millis(2));
    assert!(stats.total_time() >= stats.queue_time);
}

#[test]
fn double_finalize_is_visible_in_the_aggregate() {
    let pool = Arc::new(Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.mark_queued();
    std::thread::sleep(Duration::from_millis(2));
    conn.mark_dequeued();
    conn.mark_filters_done();
    conn.update_spans();

    conn.finalize();
    let once = pool.snapshot();
    conn.finalize();
    let twice = pool.snapshot();

    // Caller contract, not silently tolerated: the totals double.
    assert_eq!(twice.finalized, 2);
    assert_eq!(twice.queue_time, once.queue_time * 2);
}

#[test]
fn closed_connection_rejects_content_access_under_both_policies() {
    let pool = Arc::new(Pool::new("default"));
    let mut conn = common::record_in_pool(&pool);
    conn.set_content(b"payload".to_vec());
    conn.close();

    // The content accessor itself is unconditional, independent of the
    // gate policy.
    let err = slice(&conn, 0, Some(0), ContentMode::Binary).unwrap_err();
    assert!(matches!(err, ConnError::AlreadyClosed));

    // The gate, in contrast, softens under the lenient policy.
    let denial = require(Some(&conn), Requirements::OPEN, &strict()).unwrap_err();
    assert!(!denial.is_soft());
    let denial = require(Some(&conn), Requirements::OPEN, &lenient()).unwrap_err();
    assert!(denial.is_soft());
}

#[test]
fn detached_connection_gate_policy() {
    let pool = Arc::new(Pool::new("default"));
    let mut conn = common::attached_record(&pool);
    conn.set_flags(ConnFlags::CONFIGURED);

    assert!(require(Some(&conn), Requirements::CONNECTED, &strict()).is_ok());
    assert_eq!(conn.current_addr().as_deref(), Some("10.0.0.1"));
    assert_eq!(conn.current_port(), 8080);

    let sock = conn.detach_socket();
    assert!(sock.is_some());

    // The socket is gone, and so is its local endpoint.
    assert_eq!(conn.current_addr(), None);
    assert_eq!(conn.current_port(), 0);

    let denial = require(Some(&conn), Requirements::CONNECTED, &strict()).unwrap_err();
    assert!(!denial.is_soft());
    let denial = require(Some(&conn), Requirements::CONNECTED, &lenient()).unwrap_err();
    assert!(denial.is_soft());

    // CONFIGURED alone still passes: detaching loses the socket, not the
    // parsed request.
    assert!(require(Some(&conn), Requirements::CONFIGURED, &strict()).is_ok());
}

#[test]
fn recycled_record_starts_a_fresh_exchange() {
    let pool = Arc::new(Pool::new("default"));
    let mut conn = common::attached_record(&pool);
    conn.set_content(b"old body".to_vec());
    conn.set_response_status(404);
    conn.set_flags(ConnFlags::CONFIGURED | ConnFlags::SENTHDRS);
    conn.close();
    let old_id = conn.id();

    conn.reset();

    assert_ne!(conn.id(), old_id);
    assert_eq!(conn.response_status(), 200);
    assert_eq!(conn.flags().decode(), "");
    assert!(!conn.is_connected());
    let empty = slice(&conn, 0, None, ContentMode::Binary).unwrap();
    assert!(empty.is_empty());
}
