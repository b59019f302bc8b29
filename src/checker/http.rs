// src/checker/http.rs
// =============================================================================
// This module runs the check protocol for a single URL.
//
// Key functionality:
// - Makes one HTTP GET per attempt and classifies the response by status code
// - Retries transient network failures up to the retry budget
// - Never retries timeouts, cancellations, or HTTP-level errors (4xx/5xx)
// - Bounds every attempt by the per-attempt timeout AND the batch deadline
//
// Rust concepts:
// - tokio::select!: Races the HTTP attempt against batch cancellation
// - tokio::time::timeout: Wraps a future with a deadline
// - thiserror: Gives our internal error enum Display impls for free
// =============================================================================

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::context::CheckContext;

// The outcome of checking one URL
//
// Serializes to the wire shape {url, ok, status, error, attempts}, with
// `error` omitted when empty. `Default` doubles as the zero value left in
// output slots whose URL was never dispatched (cancelled batches).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The URL exactly as it appeared in the input
    pub url: String,
    /// True iff the final attempt got a response with status in [200, 400)
    pub ok: bool,
    /// Status code of the final attempt, 0 if no response was ever received
    pub status: u16,
    /// Text of the last transport failure, empty when a response arrived
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Number of attempts actually made (at least 1 once dispatched)
    pub attempts: u32,
}

// How a single attempt can fail.
//
// Only `Transport` failures are ever candidates for retry. A timeout means
// the server is slow, and retrying a slow server under the same budget just
// times out again; a cancellation means the whole batch is shutting down.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    #[error("check cancelled")]
    Cancelled,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Timeout(_) | AttemptError::Cancelled => false,
            // reqwest reports its own timeouts as plain errors, so check.
            // Builder errors (unsupported scheme etc.) won't get better on
            // a second try either.
            AttemptError::Transport(err) => !err.is_timeout() && !err.is_builder(),
        }
    }

    // The Display of a reqwest error is only the top layer ("error sending
    // request for url ..."). The useful part ("connection refused") lives
    // in the source chain, so render the whole chain.
    fn text(&self) -> String {
        match self {
            AttemptError::Transport(err) => {
                let mut text = err.to_string();
                let mut source = err.source();
                while let Some(cause) = source {
                    let _ = write!(text, ": {cause}");
                    source = cause.source();
                }
                text
            }
            other => other.to_string(),
        }
    }
}

/// Status codes in [200, 400) count as reachable: success responses and
/// redirects, but not client or server errors.
pub(super) fn is_reachable(status: u16) -> bool {
    (200..400).contains(&status)
}

// Checks a single URL, retrying transient network failures.
//
// The attempt loop runs while `attempts <= retries`, so a retry budget of
// 2 allows at most 3 attempts. The loop exits early on:
// - a response (any status code - a 500 is an answer, not a failure)
// - a malformed URL (retrying can't fix the input)
// - a non-retryable attempt error (timeout, cancellation)
pub(super) async fn check_one(
    client: &Client,
    ctx: &CheckContext,
    target: &str,
    timeout: Duration,
    retries: u32,
) -> CheckResult {
    let mut attempts = 0;
    let mut last_error = String::new();

    while attempts <= retries {
        attempts += 1;

        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(err) => {
                last_error = format!("invalid url: {err}");
                break;
            }
        };

        // The attempt budget is the configured timeout, capped by whatever
        // time the batch deadline has left.
        let budget = match ctx.remaining() {
            Some(remaining) => remaining.min(timeout),
            None => timeout,
        };

        match attempt(client, ctx, url, budget).await {
            Ok(status) => {
                return CheckResult {
                    url: target.to_string(),
                    ok: is_reachable(status),
                    status,
                    error: String::new(),
                    attempts,
                };
            }
            Err(err) => {
                last_error = err.text();
                if err.is_retryable() && attempts <= retries {
                    continue;
                }
                break;
            }
        }
    }

    CheckResult {
        url: target.to_string(),
        ok: false,
        status: 0,
        error: last_error,
        attempts,
    }
}

// One request/response cycle, racing against the batch cancellation signal.
async fn attempt(
    client: &Client,
    ctx: &CheckContext,
    url: Url,
    budget: Duration,
) -> Result<u16, AttemptError> {
    let request = async {
        let mut response = client.get(url).send().await?;
        let status = response.status().as_u16();
        // Drain the body so the connection can go back into the pool.
        while response.chunk().await?.is_some() {}
        Ok::<u16, reqwest::Error>(status)
    };

    tokio::select! {
        _ = ctx.done() => Err(AttemptError::Cancelled),
        outcome = tokio::time::timeout(budget, request) => match outcome {
            Ok(result) => result.map_err(AttemptError::from),
            Err(_) => Err(AttemptError::Timeout(budget)),
        },
    }
}
