//! Owned, transcoded copy of a response body for display.
//!
//! A `DisplayBuffer` is released when it goes out of scope. The optional
//! `BufferLedger` counts live buffers; the count drops in `Drop`, so it is
//! balanced on every exit path that unwinds scopes.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts display buffers that are currently alive.
#[derive(Debug, Clone, Default)]
pub struct BufferLedger {
    live: Arc<AtomicUsize>,
}

impl BufferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Releases the ledger slot when dropped.
#[derive(Debug)]
struct LedgerGuard {
    live: Arc<AtomicUsize>,
}

impl LedgerGuard {
    fn acquire(ledger: &BufferLedger) -> Self {
        ledger.live.fetch_add(1, Ordering::SeqCst);
        Self {
            live: Arc::clone(&ledger.live),
        }
    }
}

impl Drop for LedgerGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Body text decoded into UTF-8 for the terminal.
#[derive(Debug)]
pub struct DisplayBuffer {
    text: String,
    reencoded: bool,
    _guard: Option<LedgerGuard>,
}

impl DisplayBuffer {
    /// Decode `bytes` according to `charset` (the `Content-Type` parameter).
    pub fn decode(bytes: &[u8], charset: Option<&str>) -> Self {
        let (text, reencoded) = transcode(bytes, charset);
        Self {
            text,
            reencoded,
            _guard: None,
        }
    }

    /// Like `decode`, but accounted for in `ledger` until dropped.
    pub fn decode_tracked(bytes: &[u8], charset: Option<&str>, ledger: &BufferLedger) -> Self {
        let guard = LedgerGuard::acquire(ledger);
        Self {
            _guard: Some(guard),
            ..Self::decode(bytes, charset)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the bytes needed a charset conversion, not just validation.
    pub fn was_reencoded(&self) -> bool {
        self.reencoded
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// At most `max_bytes` of text, cut on a char boundary.
    pub fn truncated(&self, max_bytes: usize) -> &str {
        if self.text.len() <= max_bytes {
            return &self.text;
        }
        let mut end = max_bytes;
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        &self.text[..end]
    }
}

fn transcode(bytes: &[u8], charset: Option<&str>) -> (String, bool) {
    match charset {
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1") => {
            // Latin-1 bytes map one-to-one onto U+0000..U+00FF.
            (bytes.iter().map(|&b| char::from(b)).collect(), true)
        }
        _ => match String::from_utf8_lossy(bytes) {
            Cow::Borrowed(s) => (s.to_string(), false),
            Cow::Owned(s) => (s, true),
        },
    }
}
