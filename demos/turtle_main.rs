//! # Example: Turtle console
//!
//! Two turtles, one drawing a looping figure with color changes. The routine is written
//! in the blocking style and runs on the blocking pool.
//!
//! Run with: `cargo run --example turtle_main --features logging`

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use consolevisor::{Color, Config, Console, LogWriter, Routine, Subscribe, TurtleRun, TurtleScene};

fn student_main(console: TurtleRun) -> anyhow::Result<()> {
    let turtle = console.blocking_add_turtle()?;
    let turtle2 = console.blocking_add_turtle()?;
    turtle2.blocking_pen_down()?;
    turtle.blocking_pen_down()?;
    turtle.blocking_rotate(30.0)?;
    turtle.blocking_forward(50.0)?;
    turtle2.blocking_forward(100.0)?;
    turtle.blocking_arc(40.0, 270.0)?;
    turtle.blocking_set_color(Color::RED)?;
    turtle.blocking_forward(100.0)?;
    turtle.blocking_arc(40.0, 270.0)?;
    turtle.blocking_forward(100.0)?;
    turtle.blocking_arc(40.0, -270.0)?;
    turtle.blocking_forward(200.0)?;
    turtle.blocking_arc(40.0, -30.0)?;
    turtle.blocking_forward(200.0)?;
    Ok(())
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    // 5x the default speeds keeps the demo short.
    let mut cfg = Config::default();
    cfg.linear_speed *= 5.0;
    cfg.angular_speed *= 5.0;

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let console = Console::<TurtleScene>::builder(cfg)
        .with_subscribers(subs)
        .build(Routine::from_blocking(student_main));

    let ticker_token = CancellationToken::new();
    let ticker = console.spawn_ticker(ticker_token.clone());

    let mut events = console.subscribe();
    console.start().await?;

    let stop_after = tokio::time::sleep(Duration::from_secs(30));
    tokio::pin!(stop_after);
    loop {
        tokio::select! {
            ev = events.recv() => match ev {
                Ok(ev) if ev.is_terminal() => break,
                Ok(_) => {}
                Err(_) => break,
            },
            _ = &mut stop_after => {
                console.stop().await;
                break;
            }
        }
    }

    ticker_token.cancel();
    ticker.await?;

    println!("--- {} ---", console.status().await?.status_line());
    for turtle in console.turtles().await? {
        let pose = turtle.pose;
        println!(
            "turtle #{} at ({:.1}, {:.1}) heading {:.0}°, {} segment(s)",
            turtle.id.get(),
            pose.position.x,
            pose.position.y,
            pose.heading_degrees(),
            turtle.segments.len()
        );
    }
    Ok(())
}
