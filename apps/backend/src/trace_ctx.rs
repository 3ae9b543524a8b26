//! Task-local trace id for the request being served.
//!
//! Set by `middleware::RequestTrace`; read by error rendering and by the
//! DB error mapper so log lines and problem bodies share one id.

use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current task, or "unknown" outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` visible to `trace_id()`.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
