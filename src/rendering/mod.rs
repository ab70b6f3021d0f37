//! # Rendering Module
//!
//! Everything that turns the simulation into pixels: the memoized tile
//! atlas cache, the autotile background pass, and the macroquad display
//! glue that composites sprites and the score line each frame.

pub mod autotile;
pub mod display;
pub mod tiles;

pub use autotile::*;
pub use display::*;
pub use tiles::*;
