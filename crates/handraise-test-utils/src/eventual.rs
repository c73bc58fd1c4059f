//! Convergence helpers for timing-dependent tests.
//!
//! Replicas converge asynchronously: a raise published by one coordinator
//! reaches its peers only after the room hub and the receiving actor have
//! both run. Tests assert on convergence with a bounded retry loop instead
//! of fixed sleeps.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How long in-process replicas get to converge before a test fails.
const CONVERGENCE_TIMEOUT: Duration = Duration::from_secs(2);

/// Polling interval between condition checks.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Assert that a condition becomes true within the convergence timeout.
///
/// # Example
///
/// ```rust,ignore
/// assert_eventually(|| async {
///     bob.snapshot().await.unwrap().entries.len() == 1
/// })
/// .await
/// .expect("bob should observe alice's raise");
/// ```
///
/// # Errors
///
/// Returns an error naming the timeout if the condition never held.
pub async fn assert_eventually<F, Fut>(mut condition: F) -> Result<(), String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = tokio::time::Instant::now();

    loop {
        if condition().await {
            return Ok(());
        }

        if start.elapsed() >= CONVERGENCE_TIMEOUT {
            return Err(format!(
                "Condition not met within {CONVERGENCE_TIMEOUT:?}"
            ));
        }

        sleep(POLL_INTERVAL).await;
    }
}
