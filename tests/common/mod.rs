//! Shared fixtures for integration tests.

use std::sync::Arc;

use conncore::conn::ConnectionRecord;
use conncore::driver::{Socket, StaticDriver};
use conncore::Pool;

/// Socket double with fixed addresses.
pub struct LoopbackSocket {
    pub local_addr: &'static str,
    pub local_port: u16,
}

impl Socket for LoopbackSocket {
    fn local_addr(&self) -> String {
        self.local_addr.to_string()
    }

    fn local_port(&self) -> u16 {
        self.local_port
    }

    fn peer_addr(&self) -> String {
        "192.0.2.1".to_string()
    }

    fn peer_port(&self) -> u16 {
        49152
    }

    fn set_blocking(&self, _blocking: bool) {}

    fn raw_fd(&self) -> i32 {
        -1
    }
}

/// A record on an http driver at 10.0.0.1:8080 (default port 80), attached
/// to the given pool.
pub fn record_in_pool(pool: &Arc<Pool>) -> ConnectionRecord {
    let driver = Arc::new(StaticDriver::new("http", "10.0.0.1", 8080, 80, "nssock"));
    ConnectionRecord::new(driver, Arc::clone(pool))
}

#[allow(dead_code)]
pub fn attached_record(pool: &Arc<Pool>) -> ConnectionRecord {
    let mut conn = record_in_pool(pool);
    conn.attach_socket(Arc::new(LoopbackSocket {
        local_addr: "10.0.0.1",
        local_port: 8080,
    }));
    conn
}
