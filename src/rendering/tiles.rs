//! # Tile Atlas Cache
//!
//! Lazily loads atlas images and slices them into tables of fixed-size
//! tiles. Tables are memoized by `(filename, tile width, tile height)` and
//! shared behind `Rc`, so repeated lookups return the same table and the
//! slices stay read-only for the lifetime of the session. A file that
//! cannot be read or decoded is substituted with a generated placeholder
//! table instead of failing the load.

use log::warn;
use macroquad::prelude::{Image, ImageFormat, Rect, BLACK, PINK};
use std::collections::HashMap;
use std::rc::Rc;

/// A sliced tile atlas: the source image plus its grid geometry.
///
/// Tiles are addressed by `(column, row)`; sprite sheets put one facing
/// direction per column and one animation frame per row.
#[derive(Clone)]
pub struct TileTable {
    image: Image,
    columns: usize,
    rows: usize,
    tile_width: u16,
    tile_height: u16,
}

impl TileTable {
    /// Slices an image into tiles of the given size.
    ///
    /// Returns None when the image is smaller than a single tile.
    pub fn from_image(image: Image, tile_width: u16, tile_height: u16) -> Option<Self> {
        let columns = image.width() / tile_width as usize;
        let rows = image.height() / tile_height as usize;
        if columns == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            image,
            columns,
            rows,
            tile_width,
            tile_height,
        })
    }

    /// Number of tile columns in the atlas.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of tile rows in the atlas.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile size in pixels as (width, height).
    pub fn tile_size(&self) -> (u16, u16) {
        (self.tile_width, self.tile_height)
    }

    /// The whole atlas image, for uploading as a texture.
    pub fn sheet(&self) -> &Image {
        &self.image
    }

    /// The source rectangle of one tile within the atlas.
    ///
    /// Indices clamp to the table edge, so a one-column sheet serves every
    /// facing direction with its single column.
    pub fn source_rect(&self, column: usize, row: usize) -> Rect {
        let column = column.min(self.columns - 1);
        let row = row.min(self.rows - 1);
        Rect::new(
            (column * self.tile_width as usize) as f32,
            (row * self.tile_height as usize) as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        )
    }

    /// A copy of one tile as its own image, for CPU-side composition.
    pub fn tile(&self, column: usize, row: usize) -> Image {
        self.image.sub_image(self.source_rect(column, row))
    }
}

impl std::fmt::Debug for TileTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileTable")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("tile_width", &self.tile_width)
            .field("tile_height", &self.tile_height)
            .finish()
    }
}

/// Copies `src` into `dst` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `dst` are dropped.
pub fn blit(dst: &mut Image, src: &Image, x: u32, y: u32) {
    let (dst_w, dst_h) = (dst.width() as u32, dst.height() as u32);
    for sy in 0..src.height() as u32 {
        if y + sy >= dst_h {
            break;
        }
        for sx in 0..src.width() as u32 {
            if x + sx >= dst_w {
                break;
            }
            dst.set_pixel(x + sx, y + sy, src.get_pixel(sx, sy));
        }
    }
}

/// Memoizing loader for tile atlases of one fixed tile size.
///
/// The cache is owned by the session and passed to the paths that need
/// it; once a key is resolved the table behind it never changes.
pub struct TileCache {
    tile_width: u16,
    tile_height: u16,
    cache: HashMap<(String, u16, u16), Rc<TileTable>>,
}

impl TileCache {
    /// Creates a cache that slices atlases into tiles of the given size.
    pub fn new(tile_width: u16, tile_height: u16) -> Self {
        Self {
            tile_width,
            tile_height,
            cache: HashMap::new(),
        }
    }

    /// Returns the tile table for a file, loading it on first access.
    ///
    /// Repeated calls with the same filename return the identical table.
    /// A missing or undecodable file yields a placeholder table; the
    /// substitution is logged but never an error.
    pub fn get(&mut self, filename: &str) -> Rc<TileTable> {
        let key = (filename.to_string(), self.tile_width, self.tile_height);
        if let Some(table) = self.cache.get(&key) {
            return Rc::clone(table);
        }
        let table = Rc::new(self.load_table(filename));
        self.cache.insert(key, Rc::clone(&table));
        table
    }

    fn load_table(&self, filename: &str) -> TileTable {
        let loaded = std::fs::read(filename)
            .ok()
            .and_then(|bytes| Image::from_file_with_format(&bytes, Some(ImageFormat::Png)).ok())
            .and_then(|image| TileTable::from_image(image, self.tile_width, self.tile_height));
        match loaded {
            Some(table) => table,
            None => {
                warn!("could not load tile atlas {filename}, substituting placeholder");
                self.placeholder()
            }
        }
    }

    /// A generated 4x4 checker atlas standing in for a missing file.
    fn placeholder(&self) -> TileTable {
        const GRID: u16 = 4;
        let width = self.tile_width * GRID;
        let height = self.tile_height * GRID;
        let mut image = Image::gen_image_color(width, height, BLACK);
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                let col = x / self.tile_width as u32;
                let row = y / self.tile_height as u32;
                if (col + row) % 2 == 0 {
                    image.set_pixel(x, y, PINK);
                }
            }
        }
        TileTable {
            image,
            columns: GRID as usize,
            rows: GRID as usize,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        }
    }
}
