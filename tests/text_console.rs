use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use consolevisor::{
    Color, Config, ConsoleError, Event, EventKind, LineContent, Routine, RunState, StyledText,
    TextConsole, TextRun,
};

async fn wait_for(events: &mut broadcast::Receiver<Event>, kind: EventKind) -> Event {
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            match events.recv().await {
                Ok(ev) if ev.kind == kind => return ev,
                Ok(_) => {}
                Err(err) => panic!("event stream broke: {err}"),
            }
        }
    })
    .await
    .expect("event never arrived")
}

fn texts(lines: &[consolevisor::Line]) -> Vec<String> {
    lines.iter().filter_map(|l| l.text()).collect()
}

#[tokio::test]
async fn test_buffer_keeps_most_recent_hundred_lines() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        for i in 0..150 {
            run.write(i.to_string()).await?;
        }
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for(&mut events, EventKind::RunSucceeded).await;

    let lines = console.lines().await.unwrap();
    let expected: Vec<String> = (50..150).map(|i| i.to_string()).collect();
    assert_eq!(lines.len(), 100);
    assert_eq!(texts(&lines), expected);
}

#[tokio::test]
async fn test_buffer_length_is_min_of_writes_and_capacity() {
    for (writes, capacity) in [(0usize, 4usize), (3, 4), (4, 4), (9, 4)] {
        let mut cfg = Config::default();
        cfg.max_lines = capacity;
        let console = TextConsole::builder(cfg).build(Routine::from_async(
            move |run: TextRun| async move {
                for i in 0..writes {
                    run.write(i.to_string()).await?;
                }
                Ok(())
            },
        ));
        let mut events = console.subscribe();
        console.start().await.unwrap();
        wait_for(&mut events, EventKind::RunSucceeded).await;

        let lines = console.lines().await.unwrap();
        assert_eq!(lines.len(), writes.min(capacity));
        if let Some(last) = lines.last() {
            assert_eq!(last.text(), Some((writes - 1).to_string()));
        }
    }
}

#[tokio::test]
async fn test_read_then_submit() {
    let (tx, mut answers) = mpsc::unbounded_channel();
    let console = TextConsole::new(Routine::from_async(move |run: TextRun| {
        let tx = tx.clone();
        async move {
            let input = run.read("Enter a number").await?;
            let _ = tx.send(input.clone());
            let num: u32 = input.parse().unwrap_or(0);
            for i in 0..=num {
                run.write(format!("{i} iteration")).await?;
            }
            Ok(())
        }
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    let ev = wait_for(&mut events, EventKind::InputRequested).await;
    assert_eq!(ev.reason.as_deref(), Some("Enter a number"));

    let lines = console.lines().await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].content, LineContent::PendingInput);

    console.set_input("5").await.unwrap();
    assert!(console.submit_input(true).await.unwrap());
    assert_eq!(answers.recv().await.unwrap(), "5");
    assert_eq!(console.input().await.unwrap(), "");

    wait_for(&mut events, EventKind::RunSucceeded).await;
    let lines = texts(&console.lines().await.unwrap());
    assert_eq!(lines[0], "Enter a number");
    assert_eq!(lines[1], "5");
    assert_eq!(lines[2], "0 iteration");
    assert_eq!(lines.last().map(String::as_str), Some("5 iteration"));
    assert_eq!(lines.len(), 8);
}

#[tokio::test]
async fn test_stop_during_read_returns_empty() {
    let (tx, mut outcomes) = mpsc::unbounded_channel();
    let console = TextConsole::new(Routine::from_async(move |run: TextRun| {
        let tx = tx.clone();
        async move {
            let input = run.read("name?").await?;
            let write = run.write("unreachable").await;
            let _ = tx.send((input, write));
            Ok(())
        }
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for(&mut events, EventKind::InputRequested).await;
    console.set_input("half typed").await.unwrap();
    console.stop().await;

    let (input, write) = outcomes.recv().await.unwrap();
    assert_eq!(input, "");
    assert_eq!(write, Err(ConsoleError::Canceled));

    assert_eq!(console.state().await.unwrap(), RunState::Canceled);
    assert_eq!(texts(&console.lines().await.unwrap()), vec!["name?"]);
    assert_eq!(console.lines().await.unwrap().len(), 1);
    assert_eq!(console.input().await.unwrap(), "");
}

#[tokio::test]
async fn test_second_pending_read_fails_the_run() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        let other = run.clone();
        tokio::try_join!(run.read("first"), other.read("second"))?;
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    let ev = wait_for(&mut events, EventKind::RunFailed).await;
    assert_eq!(ev.reason.as_deref(), Some("a read is already pending"));
}

#[tokio::test]
async fn test_write_outside_run_is_canceled() {
    let (tx, mut handles) = mpsc::unbounded_channel();
    let console = TextConsole::new(Routine::from_async(move |run: TextRun| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(run);
            Ok(())
        }
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for(&mut events, EventKind::RunSucceeded).await;

    let stale = handles.recv().await.unwrap();
    assert_eq!(stale.write("late").await, Err(ConsoleError::Canceled));
    assert!(console.lines().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_styled_text_is_kept() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        let line = StyledText::colored("error: ", Color::RED) + StyledText::from("file not found");
        run.write(line).await?;
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for(&mut events, EventKind::RunSucceeded).await;

    let lines = console.lines().await.unwrap();
    let LineContent::Output(text) = &lines[0].content else {
        panic!("expected output line");
    };
    assert_eq!(text.spans().len(), 2);
    assert_eq!(text.spans()[0].color, Color::RED);
    assert_eq!(text.spans()[1].color, Color::Primary);
    assert_eq!(text.plain(), "error: file not found");
}

#[tokio::test]
async fn test_presentation_hints() {
    let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
        run.write("x").await?;
        Ok(())
    }));
    let status = console.status().await.unwrap();
    assert_eq!(status.title, "Console");
    assert!(status.disable_clear);
    assert!(!console.submit_input(true).await.unwrap());

    let mut events = console.subscribe();
    console.start().await.unwrap();
    wait_for(&mut events, EventKind::RunSucceeded).await;
    assert!(!console.status().await.unwrap().disable_clear);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_routine_reads_and_writes() {
    let console = TextConsole::new(Routine::from_blocking(|run: TextRun| {
        let input = run.blocking_read("Enter a number")?;
        let num: u32 = input.parse().unwrap_or(0);
        for i in 0..=num {
            run.blocking_write(format!("{i} iteration"))?;
        }
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for(&mut events, EventKind::InputRequested).await;
    console.set_input("2").await.unwrap();
    console.submit_input(true).await.unwrap();
    wait_for(&mut events, EventKind::RunSucceeded).await;

    let lines = texts(&console.lines().await.unwrap());
    assert_eq!(
        lines,
        vec!["Enter a number", "2", "0 iteration", "1 iteration", "2 iteration"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_unblocks_blocking_read() {
    let (tx, mut outcomes) = mpsc::unbounded_channel();
    let console = TextConsole::new(Routine::from_blocking(move |run: TextRun| {
        let input = run.blocking_read("waiting")?;
        let _ = tx.send(input);
        Ok(())
    }));
    let mut events = console.subscribe();

    console.start().await.unwrap();
    wait_for(&mut events, EventKind::InputRequested).await;
    console.stop().await;

    assert_eq!(outcomes.recv().await.unwrap(), "");
    assert_eq!(console.state().await.unwrap(), RunState::Canceled);
}
