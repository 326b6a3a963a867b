#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Maze Chase session without a display.

mod script;
mod settings;

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use maze_chase_engine::Engine;
use maze_chase_system_pursuit::StrategyKind;
use maze_chase_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use script::IntentScript;
use settings::Overrides;

const DEFAULT_LOG_FILTER: &str = "maze_chase=info";

/// Runs a Maze Chase session on the classic board and prints the final board.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version)]
struct Cli {
    /// TOML file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pursuer behaviour, overriding the config file
    #[arg(long)]
    strategy: Option<StrategyArg>,

    /// Seed for the random walk, overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to play
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Milliseconds between ticks, overriding the config file
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Player intents replayed one per tick: U, D, L, R, or - for none
    #[arg(long, default_value = "LLLLUUUURRRRDDDD")]
    intents: String,

    /// Tick on the wall clock and feed intents from a producer thread
    #[arg(long)]
    realtime: bool,
}

/// Pursuer behaviour selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Scatter to a corner, then chase along shortest paths.
    ShortestPathChase,
    /// Wander with momentum-weighted random turns.
    WeightedRandomWalk,
}

impl From<StrategyArg> for StrategyKind {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::ShortestPathChase => StrategyKind::ShortestPathChase,
            StrategyArg::WeightedRandomWalk => StrategyKind::WeightedRandomWalk,
        }
    }
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let script = IntentScript::parse(&cli.intents).context("invalid --intents value")?;
    let config = settings::load(
        cli.config.as_deref(),
        Overrides {
            strategy: cli.strategy.map(StrategyKind::from),
            seed: cli.seed,
            tick_interval_ms: cli.tick_ms,
        },
    )?;
    let mut engine = Engine::new(config).context("failed to build the classic board")?;
    info!(
        strategy = ?engine.config().strategy,
        ticks = cli.ticks,
        realtime = cli.realtime,
        "session configured"
    );

    if cli.realtime {
        run_realtime(&mut engine, &script, cli.ticks)?;
    } else {
        run_headless(&mut engine, &script, cli.ticks);
    }
    engine.stop();

    let snapshot = engine.snapshot();
    info!(
        status = %snapshot.status,
        score = snapshot.score,
        ticks = snapshot.tick_index,
        remaining = snapshot.remaining_collectibles,
        "session finished"
    );
    for row in engine.with_world(query::render_rows) {
        println!("{row}");
    }
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_headless(engine: &mut Engine, script: &IntentScript, ticks: u64) {
    for tick in 0..ticks {
        if let Some(direction) = script.at(tick) {
            let _ = engine.push_intent(direction);
        }
        if engine.step().is_game_over() {
            break;
        }
    }
}

fn run_realtime(engine: &mut Engine, script: &IntentScript, ticks: u64) -> Result<()> {
    let completed = Arc::new(AtomicU64::new(0));
    let stop = engine.stop_handle();
    let counter = Arc::clone(&completed);
    engine.subscribe(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) + 1 >= ticks {
            stop.request();
        }
    });

    let interval = engine.config().tick_interval();
    let finished = Arc::new(AtomicBool::new(false));
    let producer = {
        let sender = engine.intents();
        let finished = Arc::clone(&finished);
        let completed = Arc::clone(&completed);
        let script = script.clone();
        thread::Builder::new()
            .name("maze-chase-input".to_owned())
            .spawn(move || {
                while !finished.load(Ordering::SeqCst) {
                    if let Some(direction) = script.at(completed.load(Ordering::SeqCst)) {
                        let _ = sender.push(direction);
                    }
                    thread::sleep(interval);
                }
            })
            .context("failed to spawn the intent producer")?
    };

    engine.start().context("failed to start the tick loop")?;
    while engine.is_started() {
        thread::sleep(interval);
    }

    finished.store(true, Ordering::SeqCst);
    if producer.join().is_err() {
        bail!("intent producer panicked");
    }
    Ok(())
}
