//! Per-request tracing.
//!
//! Every request runs inside a `request` span carrying a random id, the
//! method and the path, so log lines emitted by handlers and stores can be
//! correlated. Completion is logged with the final status and latency.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::response::Response;

/// Runs `respond` inside a request span and logs its outcome.
pub async fn traced<F>(method: &str, path: &str, respond: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", id = %Uuid::new_v4(), %method, %path);
    let started = Instant::now();
    let response = respond.instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = response.status_code().code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });
    response
}
