//! # Display Management
//!
//! Macroquad glue that composites one frame: the pre-rendered background,
//! every entity sprite at its interpolated pixel anchor, and the score
//! readout. Textures are uploaded once at setup; per frame this only
//! issues draw calls.

use crate::config::SPRITE_TILE_SIZE;
use crate::game::GameState;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Pixel position of the score readout.
const SCORE_POS: (f32, f32) = (8.0, 18.0);
const SCORE_FONT_SIZE: f32 = 20.0;

/// Display manager owning the uploaded textures.
pub struct Display {
    background: Texture2D,
    sheets: HashMap<String, Texture2D>,
    score_line: String,
}

impl Display {
    /// Uploads the rendered background and every sprite sheet in use.
    pub fn new(background: &Image, state: &GameState) -> Self {
        let mut sheets = HashMap::new();
        for entity in state.registry.iter() {
            sheets
                .entry(entity.sprite.clone())
                .or_insert_with(|| Texture2D::from_image(entity.frames.table().sheet()));
        }
        Self {
            background: Texture2D::from_image(background),
            sheets,
            score_line: String::new(),
        }
    }

    /// Draws one complete frame of the current state.
    pub fn draw(&mut self, state: &mut GameState) {
        clear_background(BLACK);
        draw_texture(&self.background, 0.0, 0.0, WHITE);

        // Sprites sort by anchor height so southern entities overdraw
        // northern ones, matching the top-down perspective.
        let mut draws: Vec<(i32, f32, f32, Rect, &Texture2D)> = state
            .registry
            .iter()
            .filter_map(|entity| {
                let texture = self.sheets.get(&entity.sprite)?;
                let (anchor_x, anchor_y) = entity.anchor();
                let source = entity.frames.source_rect(entity.facing, entity.current_frame());
                Some((
                    anchor_y,
                    (anchor_x - SPRITE_TILE_SIZE / 2) as f32,
                    (anchor_y - SPRITE_TILE_SIZE) as f32,
                    source,
                    texture,
                ))
            })
            .collect();
        draws.sort_by_key(|(depth, ..)| *depth);

        for (_, x, y, source, texture) in draws {
            draw_texture_ex(
                texture,
                x,
                y,
                WHITE,
                DrawTextureParams {
                    source: Some(source),
                    ..Default::default()
                },
            );
        }

        if let Some(line) = state.score.take_readout() {
            self.score_line = line;
        }
        draw_text(
            &self.score_line,
            SCORE_POS.0,
            SCORE_POS.1,
            SCORE_FONT_SIZE,
            WHITE,
        );
    }
}
