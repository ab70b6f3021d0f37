//! # Dungeon Massacre Main Entry Point
//!
//! Parses the command line, loads the level, and runs the fixed-tick
//! game loop under macroquad.

use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use massacre::config::{
    DEFAULT_SEED, MAP_TILE_HEIGHT, MAP_TILE_WIDTH, SPRITE_TILE_SIZE, TICKS_PER_SECOND,
};
use massacre::{
    render_background, Display, GameState, InputEdge, InputHandler, Level, MassacreResult,
    TileCache,
};

/// Command line arguments for Dungeon Massacre.
#[derive(Parser, Debug)]
#[command(name = "massacre")]
#[command(about = "A real-time, tile-based dungeon crawl")]
#[command(version)]
struct Args {
    /// Level description file to load
    #[arg(short, long, default_value = "level.map")]
    level: String,

    /// Random seed for monster scatter and treasure multipliers
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the parsed level as JSON and exit
    #[arg(long)]
    dump_level: bool,
}

#[macroquad::main("Dungeon Massacre")]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args).await {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}

/// Loads the level and runs the game loop.
async fn run(args: &Args) -> MassacreResult<()> {
    info!("starting Dungeon Massacre v{}", massacre::VERSION);

    let (level, seeds) = Level::load(&args.level)?;

    if args.dump_level {
        let dump = serde_json::json!({
            "tileset": level.tileset,
            "width": level.width,
            "height": level.height,
            "key": level.key(),
            "entities": seeds,
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    request_new_screen_size(
        (level.width as i32 * MAP_TILE_WIDTH) as f32,
        (level.height as i32 * MAP_TILE_HEIGHT) as f32,
    );

    // The background is rasterized once; only sprites move afterwards.
    let mut map_tiles = TileCache::new(MAP_TILE_WIDTH as u16, MAP_TILE_HEIGHT as u16);
    let background = render_background(&level, &map_tiles.get(&level.tileset))?;

    let mut sprites = TileCache::new(SPRITE_TILE_SIZE as u16, SPRITE_TILE_SIZE as u16);
    let seed = args.seed.unwrap_or(DEFAULT_SEED);
    let mut state = GameState::new(level, &seeds, &mut sprites, seed)?;

    let mut display = Display::new(&background, &state);
    let mut input = InputHandler::new();

    let tick_seconds = 1.0 / TICKS_PER_SECOND;
    let mut accumulator = 0.0f32;

    loop {
        input.pump();

        accumulator += get_frame_time();
        while accumulator >= tick_seconds {
            accumulator -= tick_seconds;
            let edge = input.poll();
            if edge == Some(InputEdge::Quit) {
                info!("player quit after {} ticks", state.tick_count);
                return Ok(());
            }
            state.tick(edge);
        }

        display.draw(&mut state);
        next_frame().await;
    }
}
