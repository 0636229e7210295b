//! Per-frame simulation orchestrator.
//!
//! One `GameSession` owns the authoritative player, enemy and item state for
//! a single level run. Everything advances through `tick`, which is a plain
//! synchronous function over an injected input snapshot: the hosting shell
//! decides the scheduling (vsync callback, fixed timestep, or a test harness
//! single-stepping frames) and forwards the returned events to whatever
//! score/health store sits outside the core.

use super::combat::{
    self, PLAYER_DAMAGE, attack_hitbox, attack_is_active, damage_player, enemy_hits_player,
    hit_test, start_attack, update_attack,
};
use super::enemy::{Enemy, EnemyState, update_enemies};
use super::item::{GameItem, find_touched_item};
use super::level::LevelDesc;
use super::map::TILE_SIZE;
use super::player::{InputSnapshot, PlayerAction, PlayerState, update_player};

/// Logical drawing-surface size in world pixels (scaled up by CSS).
pub const VIEWPORT_WIDTH: f64 = 256.0;
pub const VIEWPORT_HEIGHT: f64 = 224.0;

/// Coarse phase flag supplied by the surrounding app. The simulation only
/// advances while `Playing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    Interlude,
}

/// Side effects of one tick, reported outward to the excluded state store.
/// Each qualifying event is emitted at most once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A beneficial item was picked up.
    Collect,
    /// The player took damage (enemy contact or harmful item).
    Hit,
    /// An enemy died this tick.
    EnemyKill,
    /// Checkpoint condition satisfied for the first time this level run.
    CheckpointReached,
}

/// View transform derived from the player position each frame, clamped to
/// the map extents. Not stored anywhere — recomputed on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
}

/// Authoritative state of one playthrough of one level.
pub struct GameSession {
    level: LevelDesc,
    pub phase: GamePhase,
    /// Monotonically increasing simulation frame counter; all cooldown and
    /// invulnerability deadlines are expressed against it.
    pub frame: u64,
    pub player: PlayerState,
    pub enemies: Vec<Enemy>,
    pub items: Vec<GameItem>,
    checkpoint_fired: bool,
    attack_was_held: bool,
}

impl GameSession {
    /// Start a fresh run of the given level.
    pub fn new(level: LevelDesc) -> Self {
        let player = PlayerState::at_spawn(level.spawn.0, level.spawn.1);
        let enemies = level.enemies.clone();
        let items = level.items.clone();
        Self {
            level,
            phase: GamePhase::Playing,
            frame: 0,
            player,
            enemies,
            items,
            checkpoint_fired: false,
            attack_was_held: false,
        }
    }

    pub fn level(&self) -> &LevelDesc {
        &self.level
    }

    /// Reinstall the initial rosters: player at spawn, items uncollected,
    /// enemies at full health back on patrol, checkpoint latch cleared.
    pub fn reset(&mut self) {
        self.player = PlayerState::at_spawn(self.level.spawn.0, self.level.spawn.1);
        self.items = self.level.items.clone();
        self.enemies = self.level.enemies.clone();
        self.frame = 0;
        self.checkpoint_fired = false;
        self.attack_was_held = false;
    }

    /// Enemies still participating in combat and the checkpoint gate.
    pub fn alive_enemies(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.state != EnemyState::Dead)
            .count()
    }

    /// Camera top-left for this frame: centered on the player, clamped so
    /// the viewport never leaves the map (degenerate maps pin it to zero).
    pub fn camera(&self) -> Camera {
        let max_x = self.level.map.width() as f64 * TILE_SIZE - VIEWPORT_WIDTH;
        let max_y = self.level.map.height() as f64 * TILE_SIZE - VIEWPORT_HEIGHT;
        let x = self.player.x - VIEWPORT_WIDTH / 2.0 + TILE_SIZE / 2.0;
        let y = self.player.y - VIEWPORT_HEIGHT / 2.0 + TILE_SIZE / 2.0;
        Camera {
            x: x.min(max_x).max(0.0),
            y: y.min(max_y).max(0.0),
        }
    }

    /// Advance the simulation one frame.
    ///
    /// Order per tick: frame counter, attack edge-trigger, attack animation
    /// and hit application, player movement (unless attacking), enemy AI,
    /// enemy contact damage (first contact only), item collection (one per
    /// tick), checkpoint gate. Outside the `Playing` phase only the frame
    /// counter and the input edge state advance.
    pub fn tick(&mut self, input: InputSnapshot) -> Vec<GameEvent> {
        self.frame += 1;
        let mut events = Vec::new();

        let attack_edge = input.attack && !self.attack_was_held;
        self.attack_was_held = input.attack;

        if self.phase != GamePhase::Playing {
            return events;
        }

        // Attack initiates only on the not-held -> held transition.
        if attack_edge {
            self.player = start_attack(&self.player, self.frame);
        }

        if self.player.action == PlayerAction::Attacking {
            self.player = update_attack(&self.player, self.frame);
            if attack_is_active(&self.player) {
                let hitbox = attack_hitbox(self.player.x, self.player.y, self.player.direction);
                for enemy in &mut self.enemies {
                    if hit_test(&hitbox, enemy, self.frame) {
                        let damaged = combat::apply_damage(enemy, PLAYER_DAMAGE, self.frame);
                        if damaged.state == EnemyState::Dead {
                            events.push(GameEvent::EnemyKill);
                        }
                        *enemy = damaged;
                    }
                }
            }
        }

        if self.player.action != PlayerAction::Attacking {
            self.player = update_player(&self.player, input, &self.level.map);
        }

        self.enemies = update_enemies(&self.enemies, &self.player, self.frame);

        for enemy in &self.enemies {
            if enemy_hits_player(enemy, &self.player, self.frame) {
                self.player = damage_player(&self.player, self.frame);
                events.push(GameEvent::Hit);
                break;
            }
        }

        if let Some(idx) = find_touched_item(self.player.x, self.player.y, &self.items) {
            self.items[idx].collected = true;
            events.push(if self.items[idx].kind.is_beneficial() {
                GameEvent::Collect
            } else {
                GameEvent::Hit
            });
        }

        // Checkpoint fires once per level instance, and only with the field
        // cleared of enemies.
        if !self.checkpoint_fired && self.alive_enemies() == 0 {
            let (cx, cy) = self.player.center();
            if self.level.map.is_checkpoint_at(cx, cy) {
                self.checkpoint_fired = true;
                events.push(GameEvent::CheckpointReached);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::LevelDef;

    fn open_field_session() -> GameSession {
        let def = LevelDef {
            name: "field",
            rows: vec![
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
                "....................",
            ],
            spawn_tile: (5, 5),
            items: Vec::new(),
            enemies: Vec::new(),
        };
        GameSession::new(def.build())
    }

    #[test]
    fn frame_counter_advances_every_tick() {
        let mut s = open_field_session();
        s.tick(InputSnapshot::default());
        s.tick(InputSnapshot::default());
        assert_eq!(s.frame, 2);
    }

    #[test]
    fn simulation_is_gated_by_phase() {
        let mut s = open_field_session();
        s.phase = GamePhase::Menu;
        let input = InputSnapshot {
            right: true,
            ..Default::default()
        };
        let before = s.player;
        assert!(s.tick(input).is_empty());
        assert_eq!(s.player, before, "player frozen outside Playing");
        assert_eq!(s.frame, 1, "frame counter still advances");
    }

    #[test]
    fn attack_is_edge_triggered_not_hold_repeated() {
        let mut s = open_field_session();
        let held = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        s.tick(held);
        assert_eq!(s.player.action, PlayerAction::Attacking);

        // Ride out the whole attack and the cooldown with the key held: no
        // second attack may start.
        for _ in 0..120 {
            s.tick(held);
        }
        assert_eq!(s.player.action, PlayerAction::Idle);

        // Release, then press again: a new attack starts.
        s.tick(InputSnapshot::default());
        s.tick(held);
        assert_eq!(s.player.action, PlayerAction::Attacking);
    }

    #[test]
    fn camera_clamps_to_map_extents() {
        let mut s = open_field_session();
        // 20x16 tiles = 320x256 px world.
        s.player.x = 0.0;
        s.player.y = 0.0;
        assert_eq!(s.camera(), Camera { x: 0.0, y: 0.0 });

        s.player.x = 320.0;
        s.player.y = 256.0;
        let cam = s.camera();
        assert_eq!(cam.x, 320.0 - VIEWPORT_WIDTH);
        assert_eq!(cam.y, 256.0 - VIEWPORT_HEIGHT);
    }
}
