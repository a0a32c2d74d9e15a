//! User-facing error channel.
//!
//! The retry loop sends progress notices (scheduled waits) and terminal
//! failures here. `report` takes the failure by value, so the response body it
//! carries and any transcoded copy made from it are dropped before `report`
//! returns.

mod buffer;

pub use buffer::{BufferLedger, DisplayBuffer};

use crate::retry::{FailureKind, RetryError};
use std::io::{self, Write};

/// Longest slice of a response body echoed under an error.
pub const MAX_BODY_DISPLAY_BYTES: usize = 4096;

/// Receiver for notices and failures of the retry loop.
pub trait ErrorReporter {
    /// A non-fatal notice, e.g. that a wait-then-retry is happening.
    fn notice(&mut self, message: &str);

    /// A terminal failure.
    fn report(&mut self, error: RetryError);
}

/// Writes notices as `vcfetch: ...` and failures as `error: ...` plus the
/// server's body prefixed with `remote: `.
#[derive(Debug)]
pub struct WriterReporter<W: Write> {
    out: W,
    ledger: BufferLedger,
}

/// The reporter the CLI uses.
pub type StderrReporter = WriterReporter<io::Stderr>;

impl StderrReporter {
    pub fn stderr() -> Self {
        WriterReporter::new(io::stderr())
    }
}

impl<W: Write> WriterReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ledger: BufferLedger::new(),
        }
    }

    /// Display buffers currently alive for this reporter.
    pub fn ledger(&self) -> &BufferLedger {
        &self.ledger
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ErrorReporter for WriterReporter<W> {
    fn notice(&mut self, message: &str) {
        // Nowhere left to report a failing error channel.
        let _ = writeln!(self.out, "vcfetch: {message}");
    }

    fn report(&mut self, error: RetryError) {
        let kind = error.kind();
        let (message, response) = error.into_parts();
        tracing::warn!(?kind, "{}", message);
        let _ = writeln!(self.out, "error: {message}");

        if let Some(response) = response {
            let charset = response.charset();
            let body =
                DisplayBuffer::decode_tracked(&response.body, charset.as_deref(), &self.ledger);
            let text = body.truncated(MAX_BODY_DISPLAY_BYTES).trim();
            for line in text.lines() {
                let _ = writeln!(self.out, "remote: {line}");
            }
        }
        let _ = self.out.flush();
    }
}

/// Keeps everything in memory. Used by tests and by callers that render later.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub notices: Vec<String>,
    pub failures: Vec<(FailureKind, String)>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorReporter for CollectingReporter {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn report(&mut self, error: RetryError) {
        let kind = error.kind();
        self.failures.push((kind, error.to_string()));
    }
}
