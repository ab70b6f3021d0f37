//! # Level Module
//!
//! Loading and querying of level descriptions.
//!
//! A level file is an INI-style document. The `[level]` section names the
//! tile atlas and carries the map itself as a block of single-character
//! cell codes; every other single-character section defines the attribute
//! set of that code. Cells whose code carries a `sprite` attribute seed a
//! live entity and the grid keeps plain ground at that cell, so the
//! background renders as floor underneath the sprite.
//!
//! Once loaded the grid and the attribute dictionary never change; all
//! mutation during play happens in the entity registry.

use crate::game::Position;
use crate::{MassacreError, MassacreResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Cell code substituted into the grid where an entity was seeded.
const GROUND_CODE: char = '.';

/// Typed attribute set of one cell code.
///
/// Boolean attributes accept `true`, `1`, `yes`, and `on` (any case) as
/// true; every other value is false. A malformed `tile` override parses to
/// `None` and the renderer falls back to the default ground tile. Keys
/// with no dedicated field (for example `monster`) land in the tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAttrs {
    /// Cell is part of the wall geometry
    pub wall: bool,
    /// Cell statically blocks movement
    pub block: bool,
    /// Cell seeds the player avatar
    pub player: bool,
    /// Sprite sheet file for the entity seeded at this cell
    pub sprite: Option<String>,
    /// Display name; a trailing `-<tier>` marks treasure
    pub name: Option<String>,
    /// Explicit background tile override as (column, row)
    pub tile: Option<(u32, u32)>,
    /// Free-form marker keys such as `monster`
    pub tags: HashSet<String>,
}

impl CellAttrs {
    /// Builds an attribute set from a section's key/value pairs.
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut attrs = CellAttrs::default();
        for (key, value) in pairs {
            match key.as_str() {
                "wall" => attrs.wall = parse_bool(value),
                "block" => attrs.block = parse_bool(value),
                "player" => attrs.player = parse_bool(value),
                "sprite" => attrs.sprite = Some(value.clone()),
                "name" => attrs.name = Some(value.clone()),
                "tile" => {
                    attrs.tile = parse_tile(value);
                    if attrs.tile.is_none() {
                        debug!("ignoring malformed tile override {value:?}");
                    }
                }
                _ => {
                    attrs.tags.insert(key.clone());
                }
            }
        }
        attrs
    }

    /// Whether this cell code carries the given free-form tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Parses the permissive boolean syntax of level files.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Parses a `"col,row"` tile override; malformed values yield None.
fn parse_tile(value: &str) -> Option<(u32, u32)> {
    let (col, row) = value.split_once(',')?;
    Some((col.trim().parse().ok()?, row.trim().parse().ok()?))
}

/// An entity to be spawned from the level description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySeed {
    /// Cell the entity starts on
    pub pos: Position,
    /// Attribute set of the seeding cell code
    pub attrs: CellAttrs,
}

/// The map of one level: a rectangular character grid plus the attribute
/// dictionary keyed by cell code.
///
/// Every query outside the grid resolves to wall and blocking, so callers
/// never need a bounds-checked error path.
#[derive(Debug, Clone)]
pub struct Level {
    /// Atlas file the background is drawn from
    pub tileset: String,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    grid: Vec<Vec<char>>,
    key: HashMap<char, CellAttrs>,
}

impl Level {
    /// Loads a level description from a file.
    ///
    /// Returns the immutable level map together with the entity seeds
    /// found in it. A missing or unparseable file is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> MassacreResult<(Level, Vec<EntitySeed>)> {
        let text = std::fs::read_to_string(&path)?;
        let loaded = Self::parse(&text)?;
        info!(
            "loaded level {} ({}x{} cells, {} entities, tileset {})",
            path.as_ref().display(),
            loaded.0.width,
            loaded.0.height,
            loaded.1.len(),
            loaded.0.tileset
        );
        Ok(loaded)
    }

    /// Parses a level description from text.
    pub fn parse(text: &str) -> MassacreResult<(Level, Vec<EntitySeed>)> {
        let sections = parse_sections(text)?;

        let level_section = sections
            .get("level")
            .ok_or_else(|| MassacreError::LevelParse("missing [level] section".into()))?;
        let tileset = section_value(level_section, "tileset")
            .ok_or_else(|| MassacreError::LevelParse("missing tileset key".into()))?
            .to_string();
        let map_block = section_value(level_section, "map")
            .ok_or_else(|| MassacreError::LevelParse("missing map key".into()))?;

        let mut grid: Vec<Vec<char>> = map_block
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .map(|row| row.chars().collect())
            .collect();
        if grid.is_empty() {
            return Err(MassacreError::LevelParse("empty map grid".into()));
        }
        let width = grid[0].len();
        let height = grid.len();
        if let Some(bad) = grid.iter().position(|row| row.len() != width) {
            return Err(MassacreError::LevelParse(format!(
                "map row {bad} has {} cells, expected {width}",
                grid[bad].len()
            )));
        }

        let mut key = HashMap::new();
        for (name, pairs) in &sections {
            let mut chars = name.chars();
            if let (Some(code), None) = (chars.next(), chars.next()) {
                key.insert(code, CellAttrs::from_pairs(pairs));
            }
        }

        // Seed entities from cells that carry a sprite; the grid keeps
        // ground at those cells so the background renders as floor.
        let mut seeds = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let code = grid[y][x];
                if let Some(attrs) = key.get(&code) {
                    if !attrs.wall && attrs.sprite.is_some() {
                        seeds.push(EntitySeed {
                            pos: Position::new(x as i32, y as i32),
                            attrs: attrs.clone(),
                        });
                        grid[y][x] = GROUND_CODE;
                    }
                }
            }
        }

        Ok((
            Level {
                tileset,
                width,
                height,
                grid,
                key,
            },
            seeds,
        ))
    }

    /// The cell code at a position, if it is in bounds.
    pub fn code(&self, x: i32, y: i32) -> Option<char> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.grid[y as usize][x as usize])
    }

    /// The attribute set of the cell at a position.
    ///
    /// Unknown codes and out-of-bounds positions have no attributes.
    pub fn attrs(&self, x: i32, y: i32) -> Option<&CellAttrs> {
        self.key.get(&self.code(x, y)?)
    }

    /// Whether the cell at a position is part of the wall geometry.
    ///
    /// Out-of-bounds positions are always walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.attrs(x, y).is_some_and(|a| a.wall)
    }

    /// Whether the static map blocks movement into the cell at a position.
    ///
    /// Out-of-bounds positions always block. Blocking by occupying
    /// entities is layered on top of this by the game state.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.attrs(x, y).is_some_and(|a| a.block)
    }

    /// The attribute dictionary, keyed by cell code.
    pub fn key(&self) -> &HashMap<char, CellAttrs> {
        &self.key
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }
}

/// Splits an INI-style document into sections of key/value pairs.
///
/// Values may continue over following indented lines, which is how map
/// grids are written. Lines starting with `;` are comments.
fn parse_sections(text: &str) -> MassacreResult<HashMap<String, Vec<(String, String)>>> {
    let mut sections: HashMap<String, Vec<(String, String)>> = HashMap::new();
    let mut current: Option<String> = None;

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = Some(name.to_string());
            sections.entry(name.to_string()).or_default();
            continue;
        }

        let section = current
            .as_ref()
            .ok_or_else(|| {
                MassacreError::LevelParse(format!("line {}: key outside any section", number + 1))
            })?
            .clone();
        let pairs = sections.entry(section).or_default();

        // Indented lines continue the previous value.
        if raw.starts_with(|c: char| c.is_whitespace()) {
            match pairs.last_mut() {
                Some((_, value)) => {
                    value.push('\n');
                    value.push_str(line.trim_start());
                    continue;
                }
                None => {
                    return Err(MassacreError::LevelParse(format!(
                        "line {}: continuation with no preceding key",
                        number + 1
                    )))
                }
            }
        }

        let (k, v) = line
            .split_once('=')
            .or_else(|| line.split_once(':'))
            .ok_or_else(|| {
                MassacreError::LevelParse(format!("line {}: expected key = value", number + 1))
            })?;
        pairs.push((k.trim().to_string(), v.trim().to_string()));
    }

    Ok(sections)
}

/// First value recorded for a key within one section.
fn section_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim_start_matches('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[level]
tileset = tileset.png
map =
  #####
  #.X.#
  #o..#
  #####

[#]
wall = true
block = true

[X]
sprite = player.png
player = true

[o]
name = treasure-3
sprite = chest.png
";

    #[test]
    fn test_parse_dimensions_and_tileset() {
        let (level, _) = Level::parse(SAMPLE).unwrap();
        assert_eq!(level.width, 5);
        assert_eq!(level.height, 4);
        assert_eq!(level.tileset, "tileset.png");
    }

    #[test]
    fn test_walls_and_bounds() {
        let (level, _) = Level::parse(SAMPLE).unwrap();
        assert!(level.is_wall(0, 0));
        assert!(level.is_blocked(0, 0));
        assert!(!level.is_wall(1, 1));
        assert!(!level.is_blocked(1, 1));

        // The closed-world border: everything outside is wall and blocking.
        assert!(level.is_wall(-1, 0));
        assert!(level.is_wall(5, 0));
        assert!(level.is_wall(0, -1));
        assert!(level.is_wall(0, 4));
        assert!(level.is_blocked(-1, -1));
        assert!(level.is_blocked(100, 100));
    }

    #[test]
    fn test_entity_seeds_replace_grid_with_ground() {
        let (level, seeds) = Level::parse(SAMPLE).unwrap();
        assert_eq!(seeds.len(), 2);

        let player = seeds.iter().find(|s| s.attrs.player).unwrap();
        assert_eq!(player.pos, Position::new(2, 1));
        assert_eq!(player.attrs.sprite.as_deref(), Some("player.png"));

        let chest = seeds.iter().find(|s| !s.attrs.player).unwrap();
        assert_eq!(chest.pos, Position::new(1, 2));
        assert_eq!(chest.attrs.name.as_deref(), Some("treasure-3"));

        // Seeded cells now read as plain ground.
        assert_eq!(level.code(2, 1), Some('.'));
        assert_eq!(level.code(1, 2), Some('.'));
        assert!(!level.is_wall(2, 1));
    }

    #[test]
    fn test_unknown_code_is_attributeless_ground() {
        let text = "[level]\ntileset = t.png\nmap =\n  #?#\n\n[#]\nwall = on\n";
        let (level, seeds) = Level::parse(text).unwrap();
        assert!(seeds.is_empty());
        assert!(!level.is_wall(1, 0));
        assert!(!level.is_blocked(1, 0));
        assert!(level.attrs(1, 0).is_none());
    }

    #[test]
    fn test_bool_spellings() {
        for value in ["true", "True", "1", "yes", "Yes", "on", "On", "TRUE"] {
            assert!(parse_bool(value), "{value} should read as true");
        }
        for value in ["false", "0", "no", "off", "", "2", "y"] {
            assert!(!parse_bool(value), "{value} should read as false");
        }
    }

    #[test]
    fn test_malformed_tile_override_is_none() {
        assert_eq!(parse_tile("2,4"), Some((2, 4)));
        assert_eq!(parse_tile(" 1 , 3 "), Some((1, 3)));
        assert_eq!(parse_tile("2"), None);
        assert_eq!(parse_tile("a,b"), None);
        assert_eq!(parse_tile("2,"), None);
    }

    #[test]
    fn test_ragged_map_is_an_error() {
        let text = "[level]\ntileset = t.png\nmap =\n  ###\n  ##\n";
        assert!(Level::parse(text).is_err());
    }

    #[test]
    fn test_missing_sections_are_errors() {
        assert!(Level::parse("").is_err());
        assert!(Level::parse("[level]\ntileset = t.png\n").is_err());
        assert!(Level::parse("[level]\nmap =\n  ##\n").is_err());
    }

    #[test]
    fn test_treasure_name_survives_parsing() {
        let (_, seeds) = Level::parse(SAMPLE).unwrap();
        let chest = seeds.iter().find(|s| !s.attrs.player).unwrap();
        assert_eq!(chest.attrs.name.as_deref(), Some("treasure-3"));
        assert!(!chest.attrs.has_tag("monster"));
    }
}
