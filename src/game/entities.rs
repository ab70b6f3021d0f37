//! # Entity Model
//!
//! Live objects on the grid: the player avatar, monsters, and items.
//!
//! An entity's authoritative location is its logical cell; the pixel
//! offset only carries the sub-cell displacement of an in-flight step.
//! The cell is updated exclusively when a step commits, so collision
//! queries never observe a half-moved entity.

use crate::game::{new_entity_id, Direction, EntityId, Position};
use crate::level::EntitySeed;
use crate::rendering::tiles::TileTable;
use macroquad::prelude::Rect;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Broad classification of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Monster,
    Item,
}

/// Per-entity animation state.
///
/// The two states mirror the two things an entity can be doing: standing
/// in place cycling idle frames, or walking one cell in a fixed number of
/// half-steps. Exactly one state transition happens per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    /// Idle cycle; `ticks` counts scheduler ticks to pace frame advances.
    Standing { frame: usize, ticks: u8 },
    /// One-cell walk; `half_steps` counts completed half-steps.
    Stepping { half_steps: u8 },
}

impl Animation {
    /// The initial idle state.
    pub fn standing() -> Self {
        Animation::Standing { frame: 0, ticks: 0 }
    }
}

/// Shared handle to an entity's sprite sheet.
///
/// Facing directions index columns and animation frames index rows; the
/// table clamps, so single-column item sheets work unchanged.
#[derive(Clone)]
pub struct SpriteFrames {
    table: Rc<TileTable>,
}

impl SpriteFrames {
    /// Wraps a sliced sprite sheet.
    pub fn new(table: Rc<TileTable>) -> Self {
        Self { table }
    }

    /// Number of animation frames (rows) in the sheet.
    pub fn frame_count(&self) -> usize {
        self.table.rows()
    }

    /// Source rectangle of one frame for a facing direction.
    pub fn source_rect(&self, facing: Direction, frame: usize) -> Rect {
        self.table.source_rect(facing.column(), frame)
    }

    /// The backing atlas, for texture upload.
    pub fn table(&self) -> &Rc<TileTable> {
        &self.table
    }
}

impl std::fmt::Debug for SpriteFrames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteFrames")
            .field("columns", &self.table.columns())
            .field("rows", &self.table.rows())
            .finish()
    }
}

/// One live object on the grid.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Stable identity, used for removal and AI exclusion sets
    pub id: EntityId,
    /// Broad classification
    pub kind: EntityKind,
    /// Authoritative logical cell; changes only at step commit
    pub pos: Position,
    /// Sub-cell pixel displacement of an in-flight step
    pub offset: (i32, i32),
    /// Facing direction; selects the sprite-sheet column
    pub facing: Direction,
    /// Current animation state
    pub animation: Animation,
    /// Sprite sheet handle
    pub frames: SpriteFrames,
    /// Sprite sheet filename, used as the texture key by the display
    pub sprite: String,
    /// Whether this entity blocks movement into its cell
    pub blocks: bool,
    /// Display name from the level description
    pub name: Option<String>,
    /// Treasure tier parsed once from a `<base>-<tier>` name
    pub treasure_tier: Option<u32>,
}

impl Entity {
    /// Builds an entity from a level seed and its sprite sheet.
    pub fn from_seed(seed: &EntitySeed, frames: SpriteFrames) -> Self {
        let kind = if seed.attrs.player {
            EntityKind::Player
        } else if seed.attrs.has_tag("monster") {
            EntityKind::Monster
        } else {
            EntityKind::Item
        };
        Self {
            id: new_entity_id(),
            kind,
            pos: seed.pos,
            offset: (0, 0),
            facing: Direction::South,
            animation: Animation::standing(),
            frames,
            sprite: seed.attrs.sprite.clone().unwrap_or_default(),
            blocks: seed.attrs.block,
            name: seed.attrs.name.clone(),
            treasure_tier: treasure_tier(seed.attrs.name.as_deref()),
        }
    }

    /// Whether the entity is between steps and can act this tick.
    pub fn is_standing(&self) -> bool {
        matches!(self.animation, Animation::Standing { .. })
    }

    /// Begins a one-cell walk in the given direction.
    ///
    /// Ignored while a step is already in flight, so a walk can never be
    /// redirected mid-cell.
    pub fn start_step(&mut self, direction: Direction) {
        if !self.is_standing() {
            return;
        }
        self.facing = direction;
        self.animation = Animation::Stepping { half_steps: 0 };
    }

    /// The sprite anchor in pixels: bottom-center of the occupied cell
    /// plus the in-flight displacement.
    pub fn anchor(&self) -> (i32, i32) {
        use crate::config::{MAP_TILE_HEIGHT, MAP_TILE_WIDTH};
        (
            self.pos.x * MAP_TILE_WIDTH + MAP_TILE_WIDTH / 2 + self.offset.0,
            self.pos.y * MAP_TILE_HEIGHT + MAP_TILE_HEIGHT + self.offset.1,
        )
    }

    /// The sprite-sheet row to draw this tick.
    pub fn current_frame(&self) -> usize {
        match self.animation {
            Animation::Standing { frame, .. } => frame,
            Animation::Stepping { half_steps } => {
                ((half_steps / 2) as usize).min(self.frames.frame_count().saturating_sub(1))
            }
        }
    }
}

/// Parses the treasure tier out of a `<base>-<tier>` name.
///
/// Anything that does not split and parse cleanly is simply not treasure.
fn treasure_tier(name: Option<&str>) -> Option<u32> {
    let (_, tier) = name?.rsplit_once('-')?;
    tier.parse().ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::level::CellAttrs;
    use crate::rendering::tiles::TileCache;

    pub(crate) fn test_frames() -> SpriteFrames {
        // A missing file resolves to the generated placeholder sheet.
        SpriteFrames::new(TileCache::new(32, 32).get("missing-test-sheet.png"))
    }

    fn seed_with(attrs: CellAttrs) -> EntitySeed {
        EntitySeed {
            pos: Position::new(2, 3),
            attrs,
        }
    }

    #[test]
    fn test_kind_classification() {
        let mut attrs = CellAttrs {
            sprite: Some("x.png".into()),
            ..CellAttrs::default()
        };
        attrs.player = true;
        let player = Entity::from_seed(&seed_with(attrs.clone()), test_frames());
        assert_eq!(player.kind, EntityKind::Player);

        attrs.player = false;
        attrs.tags.insert("monster".into());
        let monster = Entity::from_seed(&seed_with(attrs.clone()), test_frames());
        assert_eq!(monster.kind, EntityKind::Monster);

        attrs.tags.clear();
        let item = Entity::from_seed(&seed_with(attrs), test_frames());
        assert_eq!(item.kind, EntityKind::Item);
    }

    #[test]
    fn test_treasure_tier_parsing() {
        assert_eq!(treasure_tier(Some("treasure-3")), Some(3));
        assert_eq!(treasure_tier(Some("gem-hoard-12")), Some(12));
        assert_eq!(treasure_tier(Some("treasure")), None);
        assert_eq!(treasure_tier(Some("treasure-x")), None);
        assert_eq!(treasure_tier(None), None);
    }

    #[test]
    fn test_anchor_is_cell_bottom_center() {
        let entity = Entity::from_seed(
            &seed_with(CellAttrs {
                sprite: Some("x.png".into()),
                ..CellAttrs::default()
            }),
            test_frames(),
        );
        // Cell (2, 3) with 24x32 tiles anchors at (2*24+12, 3*32+32).
        assert_eq!(entity.anchor(), (60, 128));
    }

    #[test]
    fn test_start_step_is_ignored_mid_step() {
        let mut entity = Entity::from_seed(
            &seed_with(CellAttrs {
                sprite: Some("x.png".into()),
                ..CellAttrs::default()
            }),
            test_frames(),
        );
        entity.start_step(Direction::East);
        assert_eq!(entity.facing, Direction::East);
        entity.start_step(Direction::North);
        assert_eq!(entity.facing, Direction::East);
        assert_eq!(entity.animation, Animation::Stepping { half_steps: 0 });
    }
}
