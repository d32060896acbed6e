use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tilecube_common::ManualClock;
use tilecube_game::{GameConfig, Scene, SceneBuilder, SceneDef};
use tilecube_input::Key;
use tilecube_kernel::World;
use tilecube_tools::{SceneInspector, ascii_map, custom_tile_report};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilecube-cli", about = "CLI tool for tilecube levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Build a level and report its layout
    Validate {
        /// Scene file (.yaml, .yml or .json)
        level: PathBuf,
    },
    /// Play scripted moves headlessly
    Simulate {
        /// Scene file; the built-in arena when omitted
        #[arg(short, long)]
        level: Option<PathBuf>,
        /// Tunables file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keys to press, one per move: w/a/s/d to roll, r to respawn, anything else waits
        #[arg(short, long)]
        moves: String,
        /// Frames to run after each key press
        #[arg(short, long, default_value = "30")]
        frames_per_move: u32,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tilecube-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: tick={}", World::new().tick());
            println!("ecs: {}", tilecube_ecs::crate_info());
            println!("terrain: {}", tilecube_terrain::crate_info());
            println!("input: {}", tilecube_input::crate_info());
            println!("game: {}", tilecube_game::crate_info());
            println!("tools: {}", tilecube_tools::crate_info());
        }
        Commands::Validate { level } => {
            let def = SceneDef::load(&level)
                .with_context(|| format!("loading {}", level.display()))?;
            let scene = build(def, GameConfig::default())?;
            tracing::debug!(actors = scene.world().actor_count(), "level built");
            let terrain = scene.terrain();
            println!(
                "{}: {}x{} tiles, {} walkable, {} teleport pads",
                level.display(),
                terrain.width(),
                terrain.height(),
                terrain.walkable_count(),
                scene.teleports().len()
            );
            print!("{}", custom_tile_report(terrain));
            print!("{}", ascii_map(terrain, scene.player_cell()));
        }
        Commands::Simulate {
            level,
            config,
            moves,
            frames_per_move,
            dt,
        } => {
            let def = match level {
                Some(path) => SceneDef::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SceneDef::default_level()?,
            };
            let config = match config {
                Some(path) => load_config(&path)?,
                None => GameConfig::default(),
            };
            let clock = Rc::new(ManualClock::new());
            let mut scene = SceneBuilder::new(def)
                .config(config)
                .clock(clock.clone())
                .build()
                .context("building scene")?;

            println!("Simulating {} moves, {frames_per_move} frames each", moves.chars().count());
            for c in moves.chars() {
                let key = Key::from_char(c);
                if let Some(key) = key {
                    scene.input_mut().press(key);
                }
                for _ in 0..frames_per_move {
                    scene.update(dt);
                    clock.advance(f64::from(dt) * 1000.0);
                    print_frame(&scene);
                }
                if let Some(key) = key {
                    scene.input_mut().release(key);
                }
            }

            tracing::info!(
                frames = scene.world().tick(),
                cell = ?scene.player_cell(),
                "simulation finished"
            );
            println!("{}", SceneInspector::summary(&scene));
            print!("{}", ascii_map(scene.terrain(), scene.player_cell()));
        }
    }

    Ok(())
}

fn build(def: SceneDef, config: GameConfig) -> anyhow::Result<Scene> {
    let clock = Rc::new(ManualClock::new());
    SceneBuilder::new(def)
        .config(config)
        .clock(clock)
        .build()
        .context("building scene")
}

fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    GameConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

fn print_frame(scene: &Scene) {
    let cell = scene
        .player_cell()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut flags = String::new();
    if scene.player().is_rolling() {
        flags.push_str(" rolling");
    }
    if scene.is_paused() {
        flags.push_str(" paused");
    }
    println!("{:>6} {cell}{flags}", scene.world().tick());
}
