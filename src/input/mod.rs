//! # Input Module
//!
//! Turns macroquad keyboard state into the per-tick input edges the
//! simulation consumes.
//!
//! Direction keys are level-triggered: a held key produces the same walk
//! edge on every tick, which is what lets the avatar glide cell to cell
//! while an arrow stays down. The attack key is edge-triggered and
//! latched between ticks, so a tap landing between two tick boundaries
//! is not lost.

use crate::game::Direction;
use macroquad::prelude::{is_key_down, is_key_pressed, KeyCode};

/// One edge of player intent, consumed at most once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdge {
    /// Walk one cell in a direction
    Walk(Direction),
    /// Swing at the faced cell
    Attack,
    /// Leave the game
    Quit,
}

/// Polls macroquad key state and hands out input edges at tick boundaries.
#[derive(Debug, Default)]
pub struct InputHandler {
    attack_latched: bool,
}

impl InputHandler {
    /// Creates a new input handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples per-frame key presses.
    ///
    /// Must run every rendered frame: frames outnumber ticks, and a key
    /// press registered by macroquad on a frame with no tick would
    /// otherwise be dropped.
    pub fn pump(&mut self) {
        if is_key_pressed(KeyCode::Space) {
            self.attack_latched = true;
        }
    }

    /// Produces at most one input edge for the tick being run.
    ///
    /// Quit wins over everything, then a latched attack, then held
    /// direction keys in a fixed priority order (up, down, left, right).
    pub fn poll(&mut self) -> Option<InputEdge> {
        if is_key_pressed(KeyCode::Escape) {
            return Some(InputEdge::Quit);
        }
        if self.attack_latched {
            self.attack_latched = false;
            return Some(InputEdge::Attack);
        }

        if is_key_down(KeyCode::Up) || is_key_down(KeyCode::W) {
            return Some(InputEdge::Walk(Direction::North));
        }
        if is_key_down(KeyCode::Down) || is_key_down(KeyCode::S) {
            return Some(InputEdge::Walk(Direction::South));
        }
        if is_key_down(KeyCode::Left) || is_key_down(KeyCode::A) {
            return Some(InputEdge::Walk(Direction::West));
        }
        if is_key_down(KeyCode::Right) || is_key_down(KeyCode::D) {
            return Some(InputEdge::Walk(Direction::East));
        }

        None
    }
}
