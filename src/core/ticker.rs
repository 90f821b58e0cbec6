//! # Frame ticker.
//!
//! The engine never ticks on its own. [`Console::spawn_ticker`] is the opt-in driver a
//! presentation layer can use instead of its own frame callback: it calls
//! [`Console::tick`] every [`Config::tick_interval`](crate::Config::tick_interval) until
//! the token is cancelled.

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::console::Console;
use super::session::ConsoleKind;

impl<K: ConsoleKind> Console<K> {
    /// Spawns a task that ticks this console at the configured interval.
    pub fn spawn_ticker(&self, token: CancellationToken) -> JoinHandle<()> {
        let console = self.clone();
        let period = self.config.tick_interval_clamped();

        self.runtime.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => console.tick().await,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use crate::{Routine, TextConsole, TextRun};

    #[tokio::test(start_paused = true)]
    async fn test_ticker_refreshes_live_duration() {
        let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
            run.pause(Duration::from_secs(5)).await?;
            Ok(())
        }));
        let token = CancellationToken::new();
        let ticker = console.spawn_ticker(token.clone());

        console.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let status = console.status().await.unwrap();
        assert!(status.state.is_running());
        assert!(status.duration.starts_with("1."), "{}", status.duration);

        token.cancel();
        ticker.await.unwrap();
        console.stop().await;
    }
}
