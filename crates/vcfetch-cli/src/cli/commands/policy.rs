//! `vcfetch policy` – show the resolved retry policy.

use anyhow::Result;
use vcfetch_core::config;
use vcfetch_core::retry::RetryPolicy;

pub fn run_policy(policy: &RetryPolicy) -> Result<()> {
    print!("{}", config::policy_to_toml(policy)?);
    if policy.max_retry_time.is_none() {
        println!("# http.maxRetryTime unset: waits are not bounded");
    }
    Ok(())
}
