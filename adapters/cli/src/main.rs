#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver that runs a Lane Defence session to completion.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use lane_defence_core::{
    CellCoord, Event, GamePhase, MapId, SessionSnapshot, TowerKind, WELCOME_BANNER,
};
use lane_defence_simulation::{Simulation, SimulationConfig, StandardMaps};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Run a lane defence session without a display
#[derive(Debug, Parser)]
#[command(name = "lane-defence", version, long_about = None)]
struct Args {
    /// Map to play (1, 2 or 3)
    #[arg(short, long, default_value_t = 1)]
    map: u32,

    /// Maximum number of simulation ticks to run
    #[arg(short, long, default_value_t = 2_000)]
    ticks: u32,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Tower to place before play starts, as KIND@COLUMN,ROW (repeatable)
    #[arg(long = "tower", value_name = "KIND@COLUMN,ROW", value_parser = parse_tower)]
    towers: Vec<TowerPlacement>,

    /// Seed for the wave variant picker, overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with economy and wave settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resume automatically after the break between waves
    #[arg(long)]
    auto_resume: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the terrain grid after the run
    #[arg(long)]
    show_grid: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TowerPlacement {
    kind: TowerKind,
    cell: CellCoord,
}

fn parse_tower(value: &str) -> Result<TowerPlacement> {
    let (kind, cell) = value
        .split_once('@')
        .with_context(|| format!("expected KIND@COLUMN,ROW, got `{value}`"))?;
    let kind = match kind.trim().to_ascii_lowercase().as_str() {
        "basic" => TowerKind::Basic,
        "sniper" => TowerKind::Sniper,
        "slow" => TowerKind::Slow,
        "aoe" => TowerKind::Aoe,
        other => bail!("unknown tower kind `{other}`; expected basic, sniper, slow or aoe"),
    };
    let (column, row) = cell
        .split_once(',')
        .with_context(|| format!("expected COLUMN,ROW, got `{cell}`"))?;
    let column = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column `{column}`"))?;
    let row = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row `{row}`"))?;
    Ok(TowerPlacement {
        kind,
        cell: CellCoord::new(column, row),
    })
}

fn load_config(path: Option<&std::path::Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Totals gathered while the session runs.
#[derive(Debug, Default, Serialize)]
struct Tally {
    ticks: u32,
    spawned: u32,
    killed: u32,
    escaped: u32,
    projectiles_fired: u32,
    waves_started: u32,
}

impl Tally {
    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyKilled { .. } => self.killed += 1,
                Event::EnemyEscaped { .. } => self.escaped += 1,
                Event::ProjectileFired { .. } => self.projectiles_fired += 1,
                Event::WaveStarted { .. } => self.waves_started += 1,
                _ => {}
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    map: u32,
    session: SessionSnapshot,
    towers: usize,
    enemies_alive: usize,
    totals: Tally,
}

fn run(args: &Args) -> Result<Summary> {
    ensure!(args.dt_ms > 0, "--dt-ms must be positive");
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.waves.seed = seed;
    }

    let mut simulation = Simulation::new(config);
    info!(banner = WELCOME_BANNER, "session created");
    let mut tally = Tally::default();
    if !simulation.select_map(MapId::new(args.map)) {
        let known: Vec<String> = StandardMaps::IDS
            .iter()
            .map(|id| id.get().to_string())
            .collect();
        bail!("map {} is not available; choose one of {}", args.map, known.join(", "));
    }
    tally.observe(simulation.last_events());

    for placement in &args.towers {
        if !simulation.place_tower(placement.cell, placement.kind) {
            let reason = simulation.last_events().iter().find_map(|event| match event {
                Event::TowerPlacementRejected { reason, .. } => Some(*reason),
                _ => None,
            });
            warn!(
                kind = ?placement.kind,
                column = placement.cell.column(),
                row = placement.cell.row(),
                ?reason,
                "tower placement rejected"
            );
        }
    }

    ensure!(simulation.begin(), "session refused to start");
    let dt = Duration::from_millis(args.dt_ms);
    for _ in 0..args.ticks {
        if simulation.phase() == GamePhase::Paused {
            if !args.auto_resume {
                info!(wave = simulation.wave().get(), "wave cleared, stopping");
                break;
            }
            let _ = simulation.begin();
        }
        simulation.tick(dt);
        tally.ticks += 1;
        tally.observe(simulation.last_events());
        if simulation.phase() == GamePhase::GameOver {
            break;
        }
    }

    if args.show_grid && !args.json {
        println!("{}\n", simulation.grid().render());
    }

    Ok(Summary {
        map: args.map,
        session: simulation.session(),
        towers: simulation.towers().len(),
        enemies_alive: simulation.enemies().len(),
        totals: tally,
    })
}

fn print_summary(summary: &Summary) {
    let session = &summary.session;
    println!("map {} after {} ticks", summary.map, summary.totals.ticks);
    println!("phase:   {:?}", session.phase);
    println!("wave:    {}", session.wave.get());
    println!("score:   {}", session.score);
    println!("gold:    {}", session.gold);
    println!("health:  {}", session.health);
    println!("towers:  {}", summary.towers);
    println!(
        "enemies: {} spawned, {} killed, {} escaped, {} alive",
        summary.totals.spawned,
        summary.totals.killed,
        summary.totals.escaped,
        summary.enemies_alive
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let summary = run(&args)?;
    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}
