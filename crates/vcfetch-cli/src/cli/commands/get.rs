//! `vcfetch get` – fetch one URL through the retry engine.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use vcfetch_core::clock::{Clock, SystemClock};
use vcfetch_core::http::{CurlExecutor, HttpRequest, HttpResponse, RequestExecutor};
use vcfetch_core::report::ErrorReporter;
use vcfetch_core::retry::{run_with_retry, RetryPolicy};

#[derive(Debug, Clone)]
pub struct GetArgs {
    pub url: String,
    pub output: Option<PathBuf>,
    pub headers: Vec<String>,
    pub head: bool,
}

/// Split a `Name: value` request header.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => anyhow::bail!("invalid header `{}`: expected `Name: value`", raw),
    }
}

fn build_request(args: &GetArgs) -> Result<HttpRequest> {
    let mut request = if args.head {
        HttpRequest::head(&args.url)
    } else {
        HttpRequest::get(&args.url)
    };
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        request.headers.push(name, value);
    }
    Ok(request)
}

fn write_response<W: Write>(args: &GetArgs, response: &HttpResponse, out: &mut W) -> Result<()> {
    if args.head {
        writeln!(out, "HTTP {}", response.status)?;
        for (name, value) in response.headers.iter() {
            writeln!(out, "{}: {}", name, value)?;
        }
        out.flush()?;
        return Ok(());
    }
    match &args.output {
        Some(path) => fs::write(path, &response.body)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            out.write_all(&response.body)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// `vcfetch get` over libcurl and the system clock, printing to stdout.
pub fn run_get<R: ErrorReporter>(
    policy: &RetryPolicy,
    args: &GetArgs,
    reporter: &mut R,
) -> Result<ExitCode> {
    let mut executor = CurlExecutor::default();
    let mut stdout = io::stdout().lock();
    fetch(policy, args, SystemClock, &mut executor, reporter, &mut stdout)
}

/// Send the request through the retry engine and write the response to `out`
/// (or to `--output`). Any terminal failure goes to `reporter` and becomes
/// `ExitCode::FAILURE`.
pub fn fetch<C, E, R, W>(
    policy: &RetryPolicy,
    args: &GetArgs,
    clock: C,
    executor: &mut E,
    reporter: &mut R,
    out: &mut W,
) -> Result<ExitCode>
where
    C: Clock,
    E: RequestExecutor + ?Sized,
    R: ErrorReporter + ?Sized,
    W: Write,
{
    let request = build_request(args)?;

    let Some(response) = run_with_retry(policy, clock, executor, reporter, &request) else {
        return Ok(ExitCode::FAILURE);
    };

    write_response(args, &response, out)?;
    if let Some(path) = &args.output {
        tracing::info!(
            "wrote {} bytes from {} to {}",
            response.body.len(),
            args.url,
            path.display()
        );
    }
    Ok(ExitCode::SUCCESS)
}
