// src/checker/mod.rs
// =============================================================================
// This module contains the concurrent checking engine.
//
// Submodules:
// - context: The cancellation/deadline signal scoping one batch
// - http: The per-URL protocol (attempt loop, retry classification)
// - pool: The worker pool that fans a batch out under a concurrency limit
//
// This file (mod.rs) is the module root - it exports the public API that
// the rest of the application uses.
// =============================================================================

mod context;
mod http;
mod pool;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export public items from submodules
// This lets users write `checker::Checker` instead of
// `checker::pool::Checker`
pub use context::CheckContext;
pub use http::CheckResult;
pub use pool::{CheckError, Checker, DEFAULT_TIMEOUT};
