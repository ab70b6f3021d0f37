//! # Dungeon Massacre
//!
//! A real-time, tile-based dungeon crawl: a grid world with a controllable
//! avatar, chasing monsters, and treasure, drawn with a context-sensitive
//! autotiling pass over the level's walls.
//!
//! ## Architecture Overview
//!
//! The crate is split along the seams of the simulation:
//!
//! - **Level Model**: immutable-after-load character grid plus a per-code
//!   attribute dictionary; answers wall/blocking/attribute queries
//! - **Entity System**: live entities (player, monsters, items) positioned
//!   on the grid, with per-entity animation state
//! - **Scheduler**: one animation/movement step per entity per tick, with
//!   grid positions committed only when a step completes
//! - **Monster AI**: per-tick chase/attack/idle decisions with a blocking
//!   veto
//! - **Rendering System**: a memoized tile-atlas cache, an autotile pass
//!   that rasterizes the level background once, and macroquad display glue
//!
//! The whole simulation is single-threaded and tick-driven: every mutation
//! of level occupancy, entity positions, and score happens inside one
//! tick's update pass, so no synchronization discipline is required.

pub mod game;
pub mod input;
pub mod level;
pub mod rendering;

// Core module re-exports
pub use game::*;
pub use input::*;
pub use level::*;
pub use rendering::*;

/// Core error type for the Massacre game engine.
#[derive(thiserror::Error, Debug)]
pub enum MassacreError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Level description file could not be parsed
    #[error("Level parse error: {0}")]
    LevelParse(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Massacre codebase.
pub type MassacreResult<T> = Result<T, MassacreError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Width of one map cell in pixels
    pub const MAP_TILE_WIDTH: i32 = 24;

    /// Height of one map cell in pixels
    pub const MAP_TILE_HEIGHT: i32 = 32;

    /// Edge length of one sprite-sheet frame in pixels
    pub const SPRITE_TILE_SIZE: i32 = 32;

    /// Horizontal pixel displacement of one walk half-step
    pub const STEP_DX: i32 = 3;

    /// Vertical pixel displacement of one walk half-step
    pub const STEP_DY: i32 = 4;

    /// Number of half-steps in a full one-cell walk.
    ///
    /// The walk cycle runs four animation frames with two half-steps each,
    /// so `HALF_STEPS_PER_CELL * STEP_DX == MAP_TILE_WIDTH` and
    /// `HALF_STEPS_PER_CELL * STEP_DY == MAP_TILE_HEIGHT`.
    pub const HALF_STEPS_PER_CELL: u8 = 8;

    /// Ticks between idle-animation frame advances
    pub const STANDING_FRAME_TICKS: u8 = 2;

    /// Fixed simulation rate of the game loop
    pub const TICKS_PER_SECOND: f32 = 15.0;

    /// Atlas index of the fallback ground tile
    pub const DEFAULT_GROUND_TILE: (u32, u32) = (0, 4);

    /// Player starting health
    pub const STARTING_HEALTH: i64 = 100;

    /// Score multipliers drawn uniformly on treasure pickup
    pub const TREASURE_MULTIPLIERS: [i64; 4] = [250, 500, 750, 1000];

    /// Fallback RNG seed when none is given on the command line
    pub const DEFAULT_SEED: u64 = 12345;
}
