//! vcfetch core: the HTTP rate-limit retry controller of a version-control client.
//!
//! A request goes through [`retry::RetryEngine`], which calls a
//! [`http::RequestExecutor`] once per attempt, waits on a [`clock::Clock`]
//! between attempts, and returns either the response or a [`retry::RetryError`]
//! for a [`report::ErrorReporter`]. The policy it enforces comes from
//! [`config::resolve_policy`].

pub mod clock;
pub mod config;
pub mod http;
pub mod logging;
pub mod report;
pub mod retry;
