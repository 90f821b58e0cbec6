//! # Example: Text console
//!
//! The classic first program: ask for a number, then count up to it.
//! The "user" answer comes from the first CLI argument (default `5`).
//!
//! Run with: `cargo run --example text_main --features logging -- 7`

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use consolevisor::{
    Config, Console, EventKind, LineContent, LogWriter, Routine, Subscribe, TextBuffer, TextRun,
};

async fn student_main(console: TextRun) -> anyhow::Result<()> {
    let input = console.read("Enter a number").await?;
    let num: u32 = input.trim().parse().unwrap_or(0);
    for i in 0..=num {
        console.write(format!("{i} iteration")).await?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let answer = std::env::args().nth(1).unwrap_or_else(|| "5".to_string());

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let console = Console::<TextBuffer>::builder(Config::default())
        .with_subscribers(subs)
        .build(Routine::from_async(student_main));

    let ticker_token = CancellationToken::new();
    let ticker = console.spawn_ticker(ticker_token.clone());

    let mut events = console.subscribe();
    console.start().await?;

    while let Ok(ev) = events.recv().await {
        match ev.kind {
            EventKind::InputRequested => {
                console.set_input(answer.clone()).await?;
                console.submit_input(true).await?;
            }
            _ if ev.is_terminal() => break,
            _ => {}
        }
    }

    ticker_token.cancel();
    ticker.await?;

    let status = console.status().await?;
    println!("--- {} ({}) ---", status.title, status.status_line());
    for line in console.lines().await? {
        if let LineContent::Output(text) = line.content {
            println!("{text}");
        }
    }
    Ok(())
}
