//! CLI command handlers. Each command is in its own file.

mod get;
mod policy;

pub use get::{run_get, GetArgs};
pub use policy::run_policy;
