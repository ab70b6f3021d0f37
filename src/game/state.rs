//! # Game State Module
//!
//! Central game state and the per-tick update pass.
//!
//! One tick runs, in order: every entity's animation advances one
//! scheduler step; if the player is standing, at most one input edge is
//! consumed to start a walk (with treasure pickup resolved before the
//! animation begins) or swing at the faced cell; finally every standing
//! monster makes its decision and either attacks, starts a step, or
//! idles. All of it happens synchronously on one thread, so the registry
//! has a single writer per tick by construction.

use crate::config::{STARTING_HEALTH, TREASURE_MULTIPLIERS};
use crate::game::{
    ai, scheduler, Decision, Entity, EntityId, EntityKind, EntityRegistry, Position, SpriteFrames,
};
use crate::input::InputEdge;
use crate::level::{EntitySeed, Level};
use crate::rendering::tiles::TileCache;
use crate::{MassacreError, MassacreResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Score and health tally with dirty tracking against the last rendered
/// values, so the readout text is only rebuilt when it changed.
#[derive(Debug, Clone)]
pub struct Score {
    /// Points from treasure pickups
    pub score: i64,
    /// Player health; monsters chip one point per melee tick. There is no
    /// floor and no terminal transition when it runs out.
    pub health: i64,
    last_score: i64,
    last_health: i64,
}

impl Score {
    /// Creates the tally at its starting values.
    pub fn new() -> Self {
        Self {
            score: 0,
            health: STARTING_HEALTH,
            // Forces the first readout to report dirty.
            last_score: -1,
            last_health: STARTING_HEALTH,
        }
    }

    /// The score readout line.
    pub fn readout(&self) -> String {
        format!("Score: {:6}   Health: {:3}", self.score, self.health)
    }

    /// Returns the readout when either value changed since the last call.
    pub fn take_readout(&mut self) -> Option<String> {
        if self.score == self.last_score && self.health == self.last_health {
            return None;
        }
        self.last_score = self.score;
        self.last_health = self.health;
        Some(self.readout())
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

/// Central game state: the loaded level, the live entities, the score
/// tally, and the RNG that drives scatter directions and treasure
/// multipliers.
pub struct GameState {
    /// The immutable level map
    pub level: Level,
    /// All live entities
    pub registry: EntityRegistry,
    /// Score and health tally
    pub score: Score,
    /// The player's entity id
    pub player_id: EntityId,
    /// Number of completed ticks
    pub tick_count: u64,
    rng: StdRng,
}

impl GameState {
    /// Builds the game state from a parsed level and its entity seeds.
    ///
    /// Sprite sheets come from the injected cache, so a missing image
    /// degrades to a placeholder without failing setup. Exactly one seed
    /// must carry the player attribute.
    pub fn new(
        level: Level,
        seeds: &[EntitySeed],
        sprites: &mut TileCache,
        seed: u64,
    ) -> MassacreResult<Self> {
        let mut registry = EntityRegistry::new();
        let mut player_id = None;

        for entity_seed in seeds {
            let sheet = match &entity_seed.attrs.sprite {
                Some(filename) => sprites.get(filename),
                None => continue,
            };
            let entity = Entity::from_seed(entity_seed, SpriteFrames::new(sheet));
            let is_player = entity.kind == EntityKind::Player;
            let id = registry.add(entity);
            if is_player {
                if player_id.is_some() {
                    return Err(MassacreError::InvalidState(
                        "level seeds more than one player".into(),
                    ));
                }
                player_id = Some(id);
            }
        }

        let player_id = player_id.ok_or_else(|| {
            MassacreError::InvalidState("level seeds no player avatar".into())
        })?;
        info!(
            "game initialized with {} entities, rng seed {}",
            registry.len(),
            seed
        );

        Ok(Self {
            level,
            registry,
            score: Score::new(),
            player_id,
            tick_count: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The player entity.
    pub fn player(&self) -> Option<&Entity> {
        self.registry.get(self.player_id)
    }

    /// Whether movement into a cell is barred, by the static map or by a
    /// blocking entity currently occupying it.
    ///
    /// Out-of-bounds cells always block.
    pub fn is_blocking(&self, pos: Position) -> bool {
        self.level.is_blocked(pos.x, pos.y) || self.registry.blocking_at(pos)
    }

    /// Runs one fixed tick of the simulation.
    ///
    /// The input edge is consumed only when the player is standing; an
    /// edge arriving mid-step is dropped, which keeps walks aligned to
    /// the grid.
    pub fn tick(&mut self, input: Option<InputEdge>) {
        self.tick_count += 1;
        scheduler::advance_all(&mut self.registry);

        if self.player().is_some_and(Entity::is_standing) {
            if let Some(edge) = input {
                self.handle_player_edge(edge);
            }
        }

        self.run_monster_turns();
    }

    /// Applies one player input edge.
    fn handle_player_edge(&mut self, edge: InputEdge) {
        match edge {
            InputEdge::Walk(direction) => {
                let Some(player) = self.registry.get_mut(self.player_id) else {
                    return;
                };
                // Turning happens even when the walk is then refused.
                player.facing = direction;
                let destination = player.pos.step(direction);

                if self.is_blocking(destination) {
                    return;
                }
                self.resolve_pickup(destination);
                if let Some(player) = self.registry.get_mut(self.player_id) {
                    player.start_step(direction);
                }
            }
            InputEdge::Attack => {
                let Some(player) = self.player() else { return };
                let target = player.pos.step(player.facing);
                let victim = self
                    .registry
                    .entity_at_filtered(target, Some(EntityKind::Monster), &[])
                    .map(|m| m.id);
                if let Some(id) = victim {
                    // A single hit fells a monster; there is no health pool.
                    self.registry.remove(id);
                    debug!("monster slain at {target:?}");
                }
            }
            InputEdge::Quit => {}
        }
    }

    /// Removes an item on the destination cell and awards treasure score.
    ///
    /// A name that does not parse as `<base>-<tier>` is picked up without
    /// a score award.
    fn resolve_pickup(&mut self, destination: Position) {
        let picked = self
            .registry
            .entity_at_filtered(destination, Some(EntityKind::Item), &[])
            .map(|item| (item.id, item.treasure_tier));
        let Some((id, tier)) = picked else { return };

        self.registry.remove(id);
        if let Some(tier) = tier {
            let index = self.rng.gen_range(0..TREASURE_MULTIPLIERS.len());
            let award = i64::from(tier) * TREASURE_MULTIPLIERS[index];
            self.score.score += award;
            debug!("treasure tier {tier} picked up for {award} points");
        } else {
            debug!("item picked up at {destination:?}");
        }
    }

    /// Runs the decision procedure for every standing monster.
    ///
    /// Decisions are collected against the registry as it stands at the
    /// start of the pass, then applied; the blocking veto is evaluated at
    /// apply time.
    fn run_monster_turns(&mut self) {
        let Some(player_pos) = self.player().map(|p| p.pos) else {
            return;
        };

        let decisions: Vec<(EntityId, Decision)> = self
            .registry
            .iter()
            .filter(|e| e.kind == EntityKind::Monster && e.is_standing())
            .map(|e| (e.id, ai::decide(e, player_pos, &self.registry, &mut self.rng)))
            .collect();

        for (id, decision) in decisions {
            match decision {
                Decision::Idle => {}
                Decision::Attack => {
                    self.score.health -= 1;
                }
                Decision::Move(direction) => {
                    let Some(destination) =
                        self.registry.get(id).map(|m| m.pos.step(direction))
                    else {
                        continue;
                    };
                    if self.is_blocking(destination) {
                        // Vetoed: the monster simply stays standing.
                        continue;
                    }
                    if let Some(monster) = self.registry.get_mut(id) {
                        monster.start_step(direction);
                    }
                }
            }
        }
    }
}
