use std::future::Future;
use std::time::Duration;

use anyhow::Context;

/// Drives `future` to completion on a fresh multi-thread runtime, then shuts
/// the runtime down.
///
/// Blocking tasks still running at that point (a wedged sampler read, an
/// alert the user has not dismissed) get at most `grace` before they are
/// abandoned, so the process can always exit.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn block_on_bounded<F: Future>(future: F, grace: Duration) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ramwatch-worker")
        .build()
        .context("Failed to start the async runtime")?;

    let output = runtime.block_on(future);
    runtime.shutdown_timeout(grace);
    Ok(output)
}
