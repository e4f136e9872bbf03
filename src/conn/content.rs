//! Bounds-checked, encoding-aware access to the posted request body.
//!
//! # Responsibilities
//! - Slice the body as raw bytes or as decoded text
//! - Copy byte ranges to an output writer
//! - Keep every access behind the CLOSED re-check
//!
//! # Design Decisions
//! - A closed connection is rejected unconditionally: when the content is
//!   memory-mapped it is unmapped on close and touching it would crash the
//!   server. The same rule applies to heap-backed content so behavior does
//!   not depend on the allocation strategy
//! - Text-mode offsets index the decoded character sequence, not the raw
//!   bytes; the two only coincide for 1:1 encodings

use std::io::Write;

use crate::conn::record::{ConnectionRecord, RequestContent};
use crate::error::{ConnError, ConnResult};

/// How slice data should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Byte-exact window of the raw body.
    Binary,
    /// Window of the body decoded through the connection's output charset,
    /// indexed by character position.
    Text,
}

/// Result of a content slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceData {
    Bytes(Vec<u8>),
    Text(String),
}

impl SliceData {
    pub fn is_empty(&self) -> bool {
        match self {
            SliceData::Bytes(b) => b.is_empty(),
            SliceData::Text(t) => t.is_empty(),
        }
    }

    fn empty(mode: ContentMode) -> Self {
        match mode {
            ContentMode::Binary => SliceData::Bytes(Vec::new()),
            ContentMode::Text => SliceData::Text(String::new()),
        }
    }
}

/// Validate `offset`/`length` against the raw body and return the requested
/// window. `length` of `None` means "the rest".
pub fn slice(
    conn: &ConnectionRecord,
    offset: usize,
    length: Option<usize>,
    mode: ContentMode,
) -> ConnResult<SliceData> {
    // Closing may have invalidated the backing memory (e.g. an unmapped
    // spool region); reject regardless of how this body is allocated.
    if conn.is_closed() {
        return Err(ConnError::AlreadyClosed);
    }

    // A bodyless request validates like an empty buffer so both zero-length
    // shapes reject the same out-of-range requests.
    let buf: &[u8] = match conn.content() {
        RequestContent::Spooled(path) => {
            return Err(ConnError::ContentSpooled { path: path.clone() });
        }
        RequestContent::None => &[],
        RequestContent::Buffered(buf) => buf,
    };

    let available = buf.len();
    if offset > available {
        return Err(ConnError::OffsetOutOfRange { offset, available });
    }
    if let Some(length) = length {
        // Checked addition: a huge length must be a range error, not an
        // overflow panic or a wrapped sum that slips past the check.
        if offset.checked_add(length).map_or(true, |end| end > available) {
            return Err(ConnError::LengthOutOfRange {
                offset,
                length,
                available,
            });
        }
    }
    if available == 0 {
        if matches!(conn.content(), RequestContent::None) {
            tracing::debug!(id = %conn.id(), "content access on bodyless request, returning empty");
        }
        return Ok(SliceData::empty(mode));
    }

    match mode {
        ContentMode::Binary => {
            let length = length.unwrap_or(available - offset);
            Ok(SliceData::Bytes(buf[offset..offset + length].to_vec()))
        }
        ContentMode::Text => {
            let decoded = conn.output_encoding().decode(buf);
            let length =
                length.unwrap_or_else(|| decoded.chars().count().saturating_sub(offset));
            let text: String = decoded.chars().skip(offset).take(length).collect();
            Ok(SliceData::Text(text))
        }
    }
}

/// Copy the raw byte window `[offset, offset+length)` to `out`.
///
/// Spooled content cannot be copied from memory and is a resource error;
/// write failures surface as resource errors as well.
pub fn copy_to_writer(
    conn: &ConnectionRecord,
    offset: usize,
    length: usize,
    out: &mut dyn Write,
) -> ConnResult<()> {
    let window = match slice(conn, offset, Some(length), ContentMode::Binary)? {
        SliceData::Bytes(window) => window,
        SliceData::Text(text) => text.into_bytes(),
    };
    out.write_all(&window)?;
    Ok(())
}
