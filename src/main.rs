//! Console driver (default binary).
//!
//! Reads one command per stdin line, feeds the game runtime, and prints every
//! new snapshot either as a text board or as one JSON object per line.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tetris_engine::console::{parse_args, parse_input, render_json, render_text, ConsoleInput};
use tetris_engine::runtime::{
    GameRuntime, JsonFileSettings, MemorySettings, RuntimeConfig, SettingsStore,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let console = parse_args(&args)?;
    let mut config = RuntimeConfig::from_env();
    console.apply_to(&mut config);

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(run(config, console.json))
}

async fn run(config: RuntimeConfig, json: bool) -> Result<()> {
    let store: Arc<dyn SettingsStore> = match &config.settings_path {
        Some(path) => Arc::new(JsonFileSettings::new(path)),
        None => Arc::new(MemorySettings::default()),
    };
    let runtime = GameRuntime::spawn(config, store);
    let handle = runtime.handle();
    let show_ghost = handle.show_ghost_piece();

    let mut states = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            let frame = {
                let state = states.borrow_and_update();
                if json {
                    render_json(&state)
                } else {
                    Ok(render_text(&state, show_ghost))
                }
            };
            match frame {
                Ok(frame) => println!("{}", frame),
                Err(err) => eprintln!("failed to render state: {}", err),
            }
            if states.changed().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_input(&line) {
            Some(ConsoleInput::Command(command)) => handle.send(command).await?,
            Some(ConsoleInput::Quit) => break,
            None => debug!(line = line.as_str(), "ignored input"),
        }
    }

    let top_score = *handle.top_score().borrow();
    drop(handle);
    runtime.shutdown().await?;
    printer.abort();
    info!(top_score, "bye");
    Ok(())
}
