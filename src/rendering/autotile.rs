//! # Autotile Renderer
//!
//! Rasterizes a level into its background image. Wall cells pick one of
//! sixteen atlas variants from the presence of walls on their four
//! neighbors, so runs of wall cells join up into continuous geometry;
//! everything else draws its override tile or plain ground. The result is
//! computed once per level and composited under the moving sprites.

use crate::config::DEFAULT_GROUND_TILE;
use crate::level::Level;
use crate::rendering::tiles::{blit, TileTable};
use crate::{MassacreError, MassacreResult};
use macroquad::prelude::{Image, BLACK};

/// Selects the wall-tile atlas index for a 4-neighbor wall pattern.
///
/// The variant is refined in a fixed order: the south neighbor first,
/// then north, then the east/west pair. Every one of the sixteen
/// patterns maps to exactly one `(column, row)` index.
///
/// # Examples
///
/// ```
/// use massacre::wall_tile;
///
/// // A wall with walls on every side is a cross piece.
/// assert_eq!(wall_tile(true, true, true, true), (0, 1));
/// // A free-standing wall cell is the isolated variant.
/// assert_eq!(wall_tile(false, false, false, false), (2, 2));
/// ```
pub fn wall_tile(north: bool, south: bool, east: bool, west: bool) -> (u32, u32) {
    if south {
        if north {
            if east && west {
                (0, 1)
            } else if east {
                (0, 0)
            } else if west {
                (1, 0)
            } else {
                // walls below and above only
                (0, 2)
            }
        } else if east && west {
            (1, 1)
        } else if west {
            (2, 1)
        } else if east {
            (3, 1)
        } else {
            // wall below only
            (1, 2)
        }
    } else if north {
        if east && west {
            (0, 3)
        } else if east {
            (2, 0)
        } else if west {
            (3, 0)
        } else {
            // wall above only
            (3, 2)
        }
    } else if east && west {
        (1, 3)
    } else if west {
        (2, 3)
    } else if east {
        (3, 3)
    } else {
        (2, 2)
    }
}

/// The atlas index drawn for one cell of the level.
///
/// Wall cells go through [`wall_tile`] with their neighborhood; other
/// cells use their `tile` override attribute when present and fall back
/// to the default ground tile otherwise.
pub fn tile_for_cell(level: &Level, x: i32, y: i32) -> (u32, u32) {
    if level.is_wall(x, y) {
        wall_tile(
            level.is_wall(x, y - 1),
            level.is_wall(x, y + 1),
            level.is_wall(x + 1, y),
            level.is_wall(x - 1, y),
        )
    } else {
        level
            .attrs(x, y)
            .and_then(|attrs| attrs.tile)
            .unwrap_or(DEFAULT_GROUND_TILE)
    }
}

/// Draws the whole level into one image.
///
/// The output is `width * tile_width` by `height * tile_height` pixels,
/// one atlas tile per cell.
pub fn render_background(level: &Level, tiles: &TileTable) -> MassacreResult<Image> {
    let (tile_w, tile_h) = tiles.tile_size();
    let pixel_width = level.width * tile_w as usize;
    let pixel_height = level.height * tile_h as usize;
    if pixel_width > u16::MAX as usize || pixel_height > u16::MAX as usize {
        return Err(MassacreError::InvalidState(format!(
            "level too large to rasterize: {pixel_width}x{pixel_height} pixels"
        )));
    }

    let mut image = Image::gen_image_color(pixel_width as u16, pixel_height as u16, BLACK);
    for y in 0..level.height as i32 {
        for x in 0..level.width as i32 {
            let (col, row) = tile_for_cell(level, x, y);
            let tile = tiles.tile(col as usize, row as usize);
            blit(
                &mut image,
                &tile,
                x as u32 * tile_w as u32,
                y as u32 * tile_h as u32,
            );
        }
    }
    Ok(image)
}
