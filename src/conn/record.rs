//! Per-request connection record.
//!
//! # Responsibilities
//! - Hold all in-flight state for one request/response exchange
//! - Enforce the sticky CLOSED flag and the "200 means unset" status rule
//! - Own the request body (in memory or spooled) and the uploaded-file table
//!
//! # Design Decisions
//! - A record is owned exclusively by the worker processing it; nothing in
//!   here is synchronized except the pool back-reference it finalizes into
//! - Buffered vs. spooled content is an enum, so the exclusivity invariant
//!   cannot be violated by construction
//! - Driver and pool are non-owning associations from the record's point of
//!   view: the server keeps them alive for the whole process

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::conn::flags::ConnFlags;
use crate::driver::{Driver, Headers, Socket};
use crate::encoding::Charset;
use crate::error::{ConnError, ConnResult};
use crate::pool::Pool;

/// Process-wide counter for connection IDs. Relaxed ordering is enough,
/// only uniqueness matters.
static CONN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl ConnId {
    /// Allocate the next unique ID.
    pub fn next() -> Self {
        Self(CONN_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Request body storage. Buffered and spooled are mutually exclusive by
/// construction.
#[derive(Debug, Clone, Default)]
pub enum RequestContent {
    /// No body was uploaded.
    #[default]
    None,
    /// Body held in memory.
    Buffered(Vec<u8>),
    /// Body written to an external spool file.
    Spooled(PathBuf),
}

/// Byte range of one uploaded file within the request content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadedFile {
    pub offset: usize,
    pub length: usize,
}

/// Keep-alive decision for the connection. `None` until negotiated.
pub type KeepAlive = Option<bool>;

/// Per-request state for one HTTP exchange.
pub struct ConnectionRecord {
    id: ConnId,
    pub(crate) flags: ConnFlags,

    /// Parsed request headers.
    pub headers: Headers,
    /// Headers staged for the response.
    pub output_headers: Headers,
    auth: Option<Headers>,

    pub(crate) peer: String,
    pub(crate) proxy_peer: String,
    pub(crate) peer_port: u16,

    response_status: u16,
    content: RequestContent,
    files: HashMap<String, UploadedFile>,

    pub(crate) accept_time: Option<Instant>,
    pub(crate) queue_time: Option<Instant>,
    pub(crate) dequeue_time: Option<Instant>,
    pub(crate) filter_done_time: Option<Instant>,
    pub(crate) run_done_time: Option<Instant>,
    pub(crate) spans: crate::conn::timing::TimeSpans,

    timeout: Option<Instant>,

    output_encoding: Charset,
    url_encoding: Charset,
    compression: u8,
    rate_limit: i64,
    keep_alive: KeepAlive,
    location: Option<String>,

    driver: Arc<dyn Driver>,
    sock: Option<Arc<dyn Socket>>,
    pool: Arc<Pool>,
}

impl ConnectionRecord {
    /// Create a record for a freshly accepted connection. Stamps the accept
    /// time.
    pub fn new(driver: Arc<dyn Driver>, pool: Arc<Pool>) -> Self {
        Self {
            id: ConnId::next(),
            flags: ConnFlags::empty(),
            headers: Headers::new(),
            output_headers: Headers::new(),
            auth: None,
            peer: String::new(),
            proxy_peer: String::new(),
            peer_port: 0,
            response_status: 200,
            content: RequestContent::None,
            files: HashMap::new(),
            accept_time: Some(Instant::now()),
            queue_time: None,
            dequeue_time: None,
            filter_done_time: None,
            run_done_time: None,
            spans: Default::default(),
            timeout: None,
            output_encoding: Charset::default(),
            url_encoding: Charset::default(),
            compression: 0,
            rate_limit: -1,
            keep_alive: None,
            location: None,
            driver,
            sock: None,
            pool,
        }
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    // --- flags ---------------------------------------------------------

    pub fn flags(&self) -> ConnFlags {
        self.flags
    }

    pub fn set_flags(&mut self, mask: ConnFlags) {
        self.flags |= mask;
    }

    /// Clear flags from the mask. CLOSED is sticky and is never cleared.
    pub fn clear_flags(&mut self, mask: ConnFlags) {
        self.flags = self.flags & !(mask & !ConnFlags::CLOSED);
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(ConnFlags::CLOSED)
    }

    pub fn is_configured(&self) -> bool {
        self.flags.contains(ConnFlags::CONFIGURED)
    }

    /// True while a socket is attached.
    pub fn is_connected(&self) -> bool {
        self.sock.is_some()
    }

    /// Mark the connection closed. One-directional.
    pub fn close(&mut self) {
        if !self.is_closed() {
            self.flags |= ConnFlags::CLOSED;
            tracing::trace!(id = %self.id, "connection closed");
        }
    }

    // --- socket & driver ----------------------------------------------

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    pub fn socket(&self) -> Option<&Arc<dyn Socket>> {
        self.sock.as_ref()
    }

    pub fn attach_socket(&mut self, sock: Arc<dyn Socket>) {
        self.sock = Some(sock);
    }

    /// Detach the socket for channel hand-off. Gate checks requiring
    /// CONNECTED fail after this.
    pub fn detach_socket(&mut self) -> Option<Arc<dyn Socket>> {
        self.sock.take()
    }

    /// Structured diagnostic record from the driver, if it provides one.
    pub fn connection_info(&self) -> Option<serde_json::Value> {
        self.driver.connection_info(self)
    }

    // --- response status ----------------------------------------------

    pub fn response_status(&self) -> u16 {
        self.response_status
    }

    /// Record the response status. Setting 200 is a no-op: 200 is the
    /// initial value and cannot be distinguished from "never set".
    pub fn set_response_status(&mut self, status: u16) {
        if status != 200 {
            self.response_status = status;
        }
    }

    // --- auth ----------------------------------------------------------

    pub fn auth(&self) -> Option<&Headers> {
        self.auth.as_ref()
    }

    pub fn set_auth(&mut self, auth: Headers) {
        self.auth = Some(auth);
    }

    // --- content --------------------------------------------------------

    pub fn content(&self) -> &RequestContent {
        &self.content
    }

    /// Store the request body in memory, replacing any previous body.
    pub fn set_content(&mut self, body: Vec<u8>) {
        self.content = RequestContent::Buffered(body);
    }

    /// Record that the body was spooled to `path`, replacing any previous
    /// body.
    pub fn set_content_file(&mut self, path: PathBuf) {
        self.content = RequestContent::Spooled(path);
    }

    /// Length of the in-memory body; zero when absent or spooled.
    pub fn content_length(&self) -> usize {
        match &self.content {
            RequestContent::Buffered(buf) => buf.len(),
            _ => 0,
        }
    }

    /// Spool file path, when the body was spooled.
    pub fn content_file(&self) -> Option<&PathBuf> {
        match &self.content {
            RequestContent::Spooled(path) => Some(path),
            _ => None,
        }
    }

    pub fn add_uploaded_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.insert(key.into(), file);
    }

    /// Look up an uploaded file's offsets by form-field key.
    pub fn uploaded_file(&self, key: &str) -> ConnResult<UploadedFile> {
        self.files
            .get(key)
            .copied()
            .ok_or_else(|| ConnError::UnknownUpload(key.to_string()))
    }

    // --- misc knobs -----------------------------------------------------

    /// Absolute deadline beyond which the connection should not wait on
    /// resources. Stored and returned only; enforcement lives elsewhere.
    pub fn timeout(&self) -> Option<Instant> {
        self.timeout
    }

    pub fn set_timeout(&mut self, deadline: Instant) {
        self.timeout = Some(deadline);
    }

    pub fn output_encoding(&self) -> Charset {
        self.output_encoding
    }

    pub fn set_output_encoding(&mut self, charset: Charset) {
        self.output_encoding = charset;
    }

    pub fn url_encoding(&self) -> Charset {
        self.url_encoding
    }

    pub fn set_url_encoding(&mut self, charset: Charset) {
        self.url_encoding = charset;
    }

    pub fn compression(&self) -> u8 {
        self.compression
    }

    /// Set the compression level, clamped to 0..=9.
    pub fn set_compression(&mut self, level: u8) {
        self.compression = level.min(9);
    }

    /// Rate limit in KB/s; -1 means unlimited.
    pub fn rate_limit(&self) -> i64 {
        self.rate_limit
    }

    pub fn set_rate_limit(&mut self, limit: i64) {
        self.rate_limit = limit;
    }

    pub fn keep_alive(&self) -> KeepAlive {
        self.keep_alive
    }

    pub fn set_keep_alive(&mut self, keep: bool) {
        self.keep_alive = Some(keep);
    }

    /// Static location override from the virtual-host mapping table.
    pub fn location_override(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location_override(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    // --- recycling ------------------------------------------------------

    /// Reset the record for reuse on the next request of the same driver
    /// and pool. Allocates a fresh ID and accept time; request-handling
    /// code must never touch the old incarnation again.
    pub fn reset(&mut self) {
        self.id = ConnId::next();
        self.flags = ConnFlags::empty();
        self.headers.clear();
        self.output_headers.clear();
        self.auth = None;
        self.peer.clear();
        self.proxy_peer.clear();
        self.peer_port = 0;
        self.response_status = 200;
        self.content = RequestContent::None;
        self.files.clear();
        self.accept_time = Some(Instant::now());
        self.queue_time = None;
        self.dequeue_time = None;
        self.filter_done_time = None;
        self.run_done_time = None;
        self.spans = Default::default();
        self.timeout = None;
        self.output_encoding = Charset::default();
        self.url_encoding = Charset::default();
        self.compression = 0;
        self.rate_limit = -1;
        self.keep_alive = None;
        self.location = None;
        self.sock = None;
    }
}

impl fmt::Debug for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRecord")
            .field("id", &self.id)
            .field("flags", &self.flags.decode())
            .field("peer", &self.peer)
            .field("status", &self.response_status)
            .field("pool", &self.pool.name())
            .finish_non_exhaustive()
    }
}
