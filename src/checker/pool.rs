// src/checker/pool.rs
// =============================================================================
// This module implements the concurrent checking engine: a fixed pool of
// worker tasks fed from a shared work queue.
//
// How it works:
// 1. N workers each pull (index, url) pairs from a shared MPMC channel
// 2. A dispatcher task pushes every pair in input order, stopping early if
//    the batch is cancelled
// 3. Workers run the single-URL protocol and send (index, result) to a
//    results channel
// 4. The caller drains the results channel into a pre-sized vector, so
//    results[i] always belongs to urls[i] no matter which worker finished
//    first
//
// Rust concepts:
// - async_channel: An MPMC queue (tokio's mpsc allows only one consumer)
// - tokio::spawn: Each worker is an independent task on the runtime
// - Channel closure: Dropping the last sender ends the receivers' loops,
//   which is how the pool shuts down without explicit signaling
// =============================================================================

use futures::future;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

use super::context::CheckContext;
use super::http::{self, CheckResult};

/// Per-attempt timeout used when the caller passes a zero duration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How a batch check can fail as a whole.
///
/// Per-URL failures never abort the batch; they are recorded in the
/// individual results. The only batch-level failure is an expired deadline,
/// and even that hands back everything that finished in time.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("batch deadline exceeded before all checks completed")]
    DeadlineExceeded {
        /// Whatever finished before the deadline; unfinished slots keep
        /// their default value
        results: Vec<CheckResult>,
    },
}

// Checks batches of URLs under a bounded concurrency budget
//
// Construction never fails: out-of-range settings are normalized instead of
// rejected. The reqwest client is shared by all workers; cloning it only
// copies a handle, the connection pool behind it stays shared.
#[derive(Debug, Clone)]
pub struct Checker {
    client: Client,
    concurrency: usize,
    timeout: Duration,
    retries: u32,
}

impl Checker {
    /// Creates a checker with a default HTTP client.
    ///
    /// A concurrency of 0 becomes 1 and a zero timeout becomes
    /// [`DEFAULT_TIMEOUT`]; negative retry budgets can't be expressed in a
    /// `u32`, the CLI layer clamps them before they get here.
    pub fn new(concurrency: usize, timeout: Duration, retries: u32) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("failed to build HTTP client"),
            concurrency: concurrency.max(1),
            timeout: if timeout.is_zero() {
                DEFAULT_TIMEOUT
            } else {
                timeout
            },
            retries,
        }
    }

    /// Replaces the HTTP client, e.g. one with a custom TLS setup.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Checks every URL in the batch, returning one result per URL in the
    /// same order the URLs came in.
    ///
    /// Completion order across URLs is unspecified (workers race), but each
    /// output slot is written by exactly the worker that processed that
    /// index. If `ctx` is cancelled, URLs not yet handed to a worker keep
    /// the default `CheckResult`; if the context deadline expires, the
    /// partial results come back inside [`CheckError::DeadlineExceeded`].
    pub async fn check(
        &self,
        ctx: &CheckContext,
        urls: &[String],
    ) -> Result<Vec<CheckResult>, CheckError> {
        let mut results = vec![CheckResult::default(); urls.len()];
        if urls.is_empty() {
            return Ok(results);
        }

        // Capacity 1 keeps the queue a near-rendezvous: once the batch is
        // cancelled, at most one already-queued URL still reaches a worker.
        let (job_tx, job_rx) = async_channel::bounded::<(usize, String)>(1);
        let (result_tx, mut result_rx) = mpsc::channel::<(usize, CheckResult)>(urls.len());

        let mut workers = Vec::with_capacity(self.concurrency);
        for _ in 0..self.concurrency {
            let jobs = job_rx.clone();
            let out = result_tx.clone();
            let checker = self.clone();
            let ctx = ctx.clone();
            workers.push(tokio::spawn(async move {
                while let Ok((index, url)) = jobs.recv().await {
                    let result =
                        http::check_one(&checker.client, &ctx, &url, checker.timeout, checker.retries)
                            .await;
                    if out.send((index, result)).await.is_err() {
                        break;
                    }
                }
            }));
        }
        // The workers hold their own clones; dropping ours lets the results
        // channel close when the last worker exits.
        drop(job_rx);
        drop(result_tx);

        let dispatcher = {
            let ctx = ctx.clone();
            let batch: Vec<(usize, String)> = urls.iter().cloned().enumerate().collect();
            tokio::spawn(async move {
                for job in batch {
                    tokio::select! {
                        _ = ctx.done() => break,
                        sent = job_tx.send(job) => {
                            if sent.is_err() {
                                break;
                            }
                        }
                    }
                }
                // job_tx drops here, closing the work queue.
            })
        };

        // Drain until every worker has dropped its result sender.
        while let Some((index, result)) = result_rx.recv().await {
            results[index] = result;
        }

        let _ = dispatcher.await;
        future::join_all(workers).await;

        if ctx.deadline_expired() {
            return Err(CheckError::DeadlineExceeded { results });
        }
        Ok(results)
    }
}
