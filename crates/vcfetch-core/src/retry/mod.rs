//! Rate-limit retry controller.
//!
//! Decides, for one logical request, whether a `429 Too Many Requests`
//! response is retried, how long to wait first (`Retry-After` or the policy
//! default), and when to give up. Everything else the server says is passed
//! through untouched.

mod classify;
mod error;
mod policy;
mod retry_after;
mod run;
mod state;

pub use classify::{classify, Decision};
pub use error::{FailureKind, RetryError};
pub use policy::{RetryPolicy, DEFAULT_RETRY_AFTER};
pub use retry_after::{parse_retry_after, ParsedDelay};
pub use run::{run_with_retry, RetryEngine};
pub use state::{Phase, RetryState};

pub(crate) use policy::display_secs;
