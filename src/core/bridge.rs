//! # Owner context and the sync-over-async bridge.
//!
//! All console state lives in a single value `S` owned by one tokio task, the **owner
//! loop**. Nothing else touches `S`: callers send closures through a [`Bridge`] and get
//! the closure's result back on a one-shot reply channel.
//!
//! ## Architecture
//! ```text
//!  async caller ──► call(op).await ──┐
//!                                    ├──► [unbounded queue] ──► owner loop ──► op(&mut S)
//!  blocking caller ──► call_blocking ┘                                  │
//!        ▲                                                              │
//!        └──────────────── oneshot reply (result or panic) ◄────────────┘
//! ```
//!
//! ## Rules
//! - Operations run **strictly in arrival order**, one at a time
//! - A caller is released only after its operation has been applied (happens-before)
//! - A panicking operation is caught on the owner loop and re-raised to its caller as
//!   [`BridgeError::Panicked`]; the loop keeps serving
//! - The loop exits once every `Bridge` clone is dropped

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::BridgeError;

type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Handle to a state owned by an owner loop.
pub struct Bridge<S> {
    tx: mpsc::UnboundedSender<Job<S>>,
}

impl<S> Clone for Bridge<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S: Send + 'static> Bridge<S> {
    /// Moves `state` into a new owner loop and returns the bridge to it.
    ///
    /// # Panics
    /// Must be called within a tokio runtime.
    pub fn spawn(state: S) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job<S>>();
        let owner = tokio::spawn(async move {
            let mut state = state;
            while let Some(job) = rx.recv().await {
                job(&mut state);
            }
        });
        (Self { tx }, owner)
    }

    /// Runs `op` on the owner context and waits asynchronously for its result.
    pub async fn call<R, F>(&self, op: F) -> Result<R, BridgeError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let reply = self.submit(op)?;
        reply.await.map_err(|_| BridgeError::Closed)?
    }

    /// Runs `op` on the owner context and blocks the current thread until it completes.
    ///
    /// # Panics
    /// Panics when called from within an asynchronous execution context (like
    /// `oneshot::Receiver::blocking_recv`). Use it from `spawn_blocking` or plain threads.
    pub fn call_blocking<R, F>(&self, op: F) -> Result<R, BridgeError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let reply = self.submit(op)?;
        reply.blocking_recv().map_err(|_| BridgeError::Closed)?
    }

    fn submit<R, F>(&self, op: F) -> Result<oneshot::Receiver<Result<R, BridgeError>>, BridgeError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job<S> = Box::new(move |state: &mut S| {
            let out = panic::catch_unwind(AssertUnwindSafe(|| op(state))).map_err(|payload| {
                let info = panic_message(payload.as_ref());
                tracing::error!(%info, "bridged operation panicked on owner context");
                BridgeError::Panicked { info }
            });
            let _ = reply_tx.send(out);
        });
        self.tx.send(job).map_err(|_| BridgeError::Closed)?;
        Ok(reply_rx)
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_apply_in_order() {
        let (bridge, _owner) = Bridge::spawn(Vec::<u32>::new());
        for i in 0..10 {
            bridge.call(move |v: &mut Vec<u32>| v.push(i)).await.unwrap();
        }
        let seen = bridge.call(|v: &mut Vec<u32>| v.clone()).await.unwrap();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_panic_is_reraised_and_loop_survives() {
        let (bridge, _owner) = Bridge::spawn(0u32);
        let err = bridge
            .call(|_: &mut u32| -> u32 { panic!("bad op") })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Panicked {
                info: "bad op".to_string()
            }
        );

        let value = bridge
            .call(|n: &mut u32| {
                *n += 1;
                *n
            })
            .await
            .unwrap();
        assert_eq!(value, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_caller_sees_prior_effects() {
        let (bridge, _owner) = Bridge::spawn(String::new());
        bridge
            .call(|s: &mut String| s.push_str("async;"))
            .await
            .unwrap();

        let blocking = bridge.clone();
        let seen = tokio::task::spawn_blocking(move || {
            blocking
                .call_blocking(|s: &mut String| {
                    s.push_str("blocking;");
                    s.clone()
                })
                .unwrap()
        })
        .await
        .unwrap();

        assert_eq!(seen, "async;blocking;");
    }

    #[tokio::test]
    async fn test_closed_owner_is_reported() {
        let (bridge, owner) = Bridge::spawn(0u8);
        owner.abort();
        let _ = owner.await;
        let err = bridge.call(|n: &mut u8| *n).await.unwrap_err();
        assert_eq!(err, BridgeError::Closed);
    }
}
