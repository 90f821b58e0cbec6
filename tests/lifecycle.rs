use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use consolevisor::{
    Config, ConsoleError, Event, EventKind, LifecycleError, Routine, RunState, Severity,
    Subscribe, TextConsole, TextRun, UNKNOWN_ERROR,
};

async fn wait_for_terminal(events: &mut broadcast::Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            match events.recv().await {
                Ok(ev) if ev.is_terminal() => return ev,
                Ok(_) => {}
                Err(err) => panic!("event stream broke: {err}"),
            }
        }
    })
    .await
    .expect("run never finished")
}

fn idle_routine() -> Routine<TextRun> {
    Routine::from_async(|run: TextRun| async move {
        run.pause(Duration::from_secs(3600)).await?;
        Ok(())
    })
}

#[tokio::test]
async fn test_stop_from_idle_is_canceled() {
    let console = TextConsole::new(idle_routine());
    assert_eq!(console.state().await.unwrap(), RunState::Idle);

    console.stop().await;
    assert_eq!(console.state().await.unwrap(), RunState::Canceled);

    // stopping twice is harmless
    console.stop().await;
    let status = console.status().await.unwrap();
    assert_eq!(status.state, RunState::Canceled);
    assert_eq!(status.state.severity(), Severity::Warning);
}

#[tokio::test(start_paused = true)]
async fn test_start_stop_clear_returns_to_idle() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        run.write("before").await?;
        run.pause(Duration::from_secs(10)).await?;
        run.write("after").await?;
        Ok(())
    }));

    console.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(console.lines().await.unwrap().len(), 1);

    console.stop().await;
    assert_eq!(console.state().await.unwrap(), RunState::Canceled);

    console.clear().await.unwrap();
    let status = console.status().await.unwrap();
    assert_eq!(status.state, RunState::Idle);
    assert!(status.disable_clear);
    assert!(console.lines().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_while_running_is_rejected() {
    let console = TextConsole::new(idle_routine());
    console.start().await.unwrap();
    assert_eq!(
        console.start().await.unwrap_err(),
        LifecycleError::AlreadyRunning
    );
    assert_eq!(console.clear().await.unwrap_err(), LifecycleError::Running);
    assert_eq!(console.state().await.unwrap(), RunState::Running);
    console.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_success_records_duration() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        run.pause(Duration::from_millis(1250)).await?;
        run.write("done").await?;
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    let ev = wait_for_terminal(&mut events).await;
    assert_eq!(ev.kind, EventKind::RunSucceeded);

    let status = console.status().await.unwrap();
    assert_eq!(status.state, RunState::Succeeded);
    assert!(status.status_line().starts_with("Success in 1.2"), "{}", status.status_line());
}

#[tokio::test]
async fn test_domain_error_is_shown_verbatim() {
    let console = TextConsole::new(Routine::from_async(|_run: TextRun| async move {
        Err(anyhow::Error::new(ConsoleError::domain("number out of range")))
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    let ev = wait_for_terminal(&mut events).await;
    assert_eq!(ev.kind, EventKind::RunFailed);
    assert_eq!(ev.reason.as_deref(), Some("number out of range"));

    let status = console.status().await.unwrap();
    assert_eq!(status.status_line(), "number out of range");
    assert_eq!(status.state.severity(), Severity::Error);
}

#[tokio::test]
async fn test_other_errors_become_unknown() {
    let console = TextConsole::new(Routine::from_async(|_run: TextRun| async move {
        anyhow::bail!("connection reset by peer")
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for_terminal(&mut events).await;
    assert_eq!(
        console.state().await.unwrap(),
        RunState::Failed(UNKNOWN_ERROR.to_string())
    );
}

#[tokio::test]
async fn test_panicking_routine_becomes_unknown() {
    let console = TextConsole::new(Routine::from_async(|_run: TextRun| async move {
        if true {
            panic!("student bug");
        }
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for_terminal(&mut events).await;
    assert_eq!(
        console.state().await.unwrap(),
        RunState::Failed("Unknown Error".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_wins_over_late_completion() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let console = TextConsole::new(Routine::from_async(move |run: TextRun| {
        let tx = tx.clone();
        async move {
            // swallow the cancellation and pretend success
            let _ = run.pause(Duration::from_secs(1)).await;
            let _ = tx.send(());
            Ok(())
        }
    }));

    console.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    console.stop().await;

    rx.recv().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(console.state().await.unwrap(), RunState::Canceled);
}

#[tokio::test(start_paused = true)]
async fn test_stale_run_cannot_finish_new_run() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        if run.generation() == 1 {
            // ignores cancellation entirely
            tokio::time::sleep(Duration::from_millis(100)).await;
            return Ok(());
        }
        run.pause(Duration::from_secs(10)).await?;
        Ok(())
    }));

    console.start().await.unwrap();
    console.stop().await;
    console.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(console.state().await.unwrap(), RunState::Running);
    console.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_without_stop_finishes_canceled() {
    let console = TextConsole::new(Routine::from_async(|_run: TextRun| async move {
        Err(anyhow::Error::new(ConsoleError::Canceled))
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    let ev = wait_for_terminal(&mut events).await;
    assert_eq!(ev.kind, EventKind::RunCanceled);
    assert_eq!(console.state().await.unwrap(), RunState::Canceled);
}

#[tokio::test(start_paused = true)]
async fn test_rerun_clears_then_starts() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        run.write("line").await?;
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for_terminal(&mut events).await;
    console.rerun().await.unwrap();
    wait_for_terminal(&mut events).await;

    assert_eq!(console.lines().await.unwrap().len(), 1);
    assert_eq!(console.state().await.unwrap(), RunState::Succeeded);
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<EventKind>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.seen.lock().unwrap().push(event.kind);
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test]
async fn test_subscribers_see_run_events_in_order() {
    let recorder = Arc::new(Recorder::default());
    let console = TextConsole::builder(Config::default())
        .with_subscribers(vec![recorder.clone()])
        .build(Routine::from_async(|run: TextRun| async move {
            run.write("hi").await?;
            Ok(())
        }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for_terminal(&mut events).await;
    console.clear().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while recorder.seen.lock().unwrap().len() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("subscriber never caught up");

    assert_eq!(
        *recorder.seen.lock().unwrap(),
        vec![
            EventKind::RunStarted,
            EventKind::RunSucceeded,
            EventKind::RunCleared
        ]
    );
}

struct DropFlag {
    dropped: Arc<AtomicBool>,
}

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Subscribe for DropFlag {
    async fn on_event(&self, _event: &Event) {}

    fn name(&self) -> &'static str {
        "drop-flag"
    }
}

#[tokio::test]
async fn test_dropping_console_releases_subscribers() {
    let dropped = Arc::new(AtomicBool::new(false));
    let subscriber = Arc::new(DropFlag {
        dropped: Arc::clone(&dropped),
    });
    let console = TextConsole::builder(Config::default())
        .with_subscribers(vec![subscriber])
        .build(Routine::from_async(|run: TextRun| async move {
            run.write("hi").await?;
            Ok(())
        }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for_terminal(&mut events).await;
    drop(events);
    drop(console);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !dropped.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("subscriber still alive after the console was dropped");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_lifecycle_from_plain_thread() {
    let console = TextConsole::new(Routine::from_blocking(|run: TextRun| {
        for i in 0..3 {
            run.blocking_write(i.to_string())?;
        }
        Ok(())
    }));
    let mut events = console.subscribe();

    let handle = console.clone();
    tokio::task::spawn_blocking(move || handle.blocking_start())
        .await
        .unwrap()
        .unwrap();
    wait_for_terminal(&mut events).await;

    let handle = console.clone();
    let (state, lines) = tokio::task::spawn_blocking(move || {
        (
            handle.blocking_state().unwrap(),
            handle.blocking_lines().unwrap(),
        )
    })
    .await
    .unwrap();
    assert_eq!(state, RunState::Succeeded);
    assert_eq!(lines.len(), 3);
}
