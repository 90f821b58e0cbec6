//! # User routine (`Routine`)
//!
//! [`Routine`] wraps the student code a console runs. It holds a closure that *creates*
//! a new unit of work per `start()`, so restarting never shares hidden state between runs.
//!
//! Two flavors exist:
//! - [`Routine::from_async`]: the closure returns a future, spawned as a detached tokio task;
//! - [`Routine::from_blocking`]: synchronous code, run on the blocking pool. It uses the
//!   `blocking_*` console operations, which park the thread on the bridge.
//!
//! Both return `anyhow::Result<()>`, so student code can use `?` on anything; the
//! controller sorts the error into canceled / failed / unknown.
//!
//! ## Example
//! ```rust
//! use consolevisor::{Routine, TextRun};
//!
//! let hello = Routine::from_async(|console: TextRun| async move {
//!     console.write("hello").await?;
//!     Ok(())
//! });
//!
//! let counter = Routine::from_blocking(|console: TextRun| {
//!     for i in 0..3 {
//!         console.blocking_write(format!("{i} iteration"))?;
//!     }
//!     Ok(())
//! });
//! # let _ = (hello, counter);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Boxed future returned by an async routine.
pub type BoxRoutineFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

type AsyncFn<R> = dyn Fn(R) -> BoxRoutineFuture + Send + Sync + 'static;
type BlockingFn<R> = dyn Fn(R) -> anyhow::Result<()> + Send + Sync + 'static;

/// Student code run by a console; `R` is the run-bound console handle it receives.
pub enum Routine<R> {
    /// Runs as a detached tokio task.
    Async(Arc<AsyncFn<R>>),
    /// Runs on the blocking thread pool.
    Blocking(Arc<BlockingFn<R>>),
}

impl<R> Clone for Routine<R> {
    fn clone(&self) -> Self {
        match self {
            Routine::Async(f) => Routine::Async(Arc::clone(f)),
            Routine::Blocking(f) => Routine::Blocking(Arc::clone(f)),
        }
    }
}

impl<R: Send + 'static> Routine<R> {
    /// Wraps an async closure (`Fn`, not `FnMut`: a fresh future per run).
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(R) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Routine::Async(Arc::new(move |run: R| -> BoxRoutineFuture { Box::pin(f(run)) }))
    }

    /// Wraps synchronous code.
    pub fn from_blocking<F>(f: F) -> Self
    where
        F: Fn(R) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Routine::Blocking(Arc::new(f))
    }

    /// Schedules one run detached from the caller.
    pub(crate) fn spawn(&self, runtime: &Handle, run: R) -> JoinHandle<anyhow::Result<()>> {
        match self {
            Routine::Async(f) => runtime.spawn(f(run)),
            Routine::Blocking(f) => {
                let f = Arc::clone(f);
                runtime.spawn_blocking(move || f(run))
            }
        }
    }
}
