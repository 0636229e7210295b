//! Enemy roster and per-frame AI.
//!
//! Every enemy runs the same state machine, evaluated each non-dead,
//! non-hurt frame from its Euclidean distance to the player:
//! within attack range → attack, within sight range → chase, else patrol.
//! `Dead` is terminal; dead enemies stay in the roster (stable identity for
//! the level's lifetime) and are skipped by rendering and collision.

use super::combat::INVULNERABLE_DURATION;
use super::map::TILE_SIZE;
use super::player::{Direction, PlayerState};

/// Patrol movement speed in pixels per frame.
pub const PATROL_SPEED: f64 = 1.0;
/// Chase movement speed in pixels per frame.
pub const CHASE_SPEED: f64 = 2.0;
/// Distance at which an enemy notices the player and starts chasing.
pub const SIGHT_RANGE: f64 = 4.0 * TILE_SIZE;
/// Distance at which an enemy stops chasing and attacks.
pub const ATTACK_RANGE: f64 = TILE_SIZE;
/// Frames an enemy stays in the hurt state after taking non-lethal damage.
pub const HURT_DURATION: u64 = 20;
/// An enemy counts a patrol waypoint as reached within this distance.
pub const WAYPOINT_TOLERANCE: f64 = 4.0;

/// The three enemy kinds, with distinct health pools and visuals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyKind {
    /// Indulgence peddler: weak, common.
    Peddler,
    /// City guard: sturdier melee enemy.
    Guard,
    /// Level boss.
    Boss,
}

impl EnemyKind {
    /// Starting (and maximum) health pool for this kind.
    pub fn max_health(self) -> i32 {
        match self {
            EnemyKind::Peddler => 2,
            EnemyKind::Guard => 4,
            EnemyKind::Boss => 10,
        }
    }
}

/// Behavior state. `Dead` is terminal and only reachable through damage
/// application driving health to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    Patrol,
    Chase,
    Attack,
    Hurt,
    Dead,
}

/// One enemy. Mutated every frame except when dead; never removed from the
/// roster within a level instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: u32,
    /// World position of the sprite's top-left corner.
    pub x: f64,
    pub y: f64,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    pub direction: Direction,
    pub is_moving: bool,
    pub anim_frame: u32,
    pub state: EnemyState,
    /// Ordered patrol waypoints (world coordinates), cycled with wraparound.
    /// An empty route means the enemy stands still while patrolling.
    pub patrol: Vec<(f64, f64)>,
    pub patrol_index: usize,
    /// Frame of the most recent attack stamp.
    pub last_attack_frame: u64,
    /// Frame number before which this enemy cannot be hit again.
    pub invulnerable_until: u64,
}

impl Enemy {
    pub fn new(id: u32, x: f64, y: f64, kind: EnemyKind, patrol: Vec<(f64, f64)>) -> Self {
        let health = kind.max_health();
        Self {
            id,
            x,
            y,
            kind,
            health,
            max_health: health,
            direction: Direction::Down,
            is_moving: false,
            anim_frame: 0,
            state: EnemyState::Patrol,
            patrol,
            patrol_index: 0,
            last_attack_frame: 0,
            invulnerable_until: 0,
        }
    }

    /// World-space center of the sprite.
    pub fn center(&self) -> (f64, f64) {
        (self.x + TILE_SIZE / 2.0, self.y + TILE_SIZE / 2.0)
    }
}

/// Advance every enemy one frame.
pub fn update_enemies(enemies: &[Enemy], player: &PlayerState, frame: u64) -> Vec<Enemy> {
    enemies
        .iter()
        .map(|e| update_enemy(e, player, frame))
        .collect()
}

/// Advance a single enemy one frame.
///
/// Movement in chase and patrol is unobstructed by the tile map — enemies do
/// not path around walls. Known simplification of the base design, kept
/// deliberately.
pub fn update_enemy(enemy: &Enemy, player: &PlayerState, frame: u64) -> Enemy {
    if enemy.state == EnemyState::Dead {
        return enemy.clone();
    }

    let mut enemy = enemy.clone();

    // The hurt stun ends a fixed number of frames after the damage that
    // caused it; the invulnerability deadline anchors that instant.
    if enemy.state == EnemyState::Hurt {
        let hurt_started = enemy.invulnerable_until.saturating_sub(INVULNERABLE_DURATION);
        if frame >= hurt_started + HURT_DURATION {
            enemy.state = EnemyState::Patrol;
        } else {
            return enemy;
        }
    }

    let dist = distance(enemy.x, enemy.y, player.x, player.y);
    if dist < ATTACK_RANGE {
        attack_player(enemy, player, frame)
    } else if dist < SIGHT_RANGE {
        chase_player(enemy, player)
    } else {
        patrol(enemy)
    }
}

/// Close enough to strike: face the player, halt, stamp the attack frame.
/// Damage delivery itself is the orchestrator's job via the combat module.
fn attack_player(mut enemy: Enemy, player: &PlayerState, frame: u64) -> Enemy {
    enemy.direction = facing_toward(player.x - enemy.x, player.y - enemy.y, enemy.direction);
    enemy.is_moving = false;
    enemy.state = EnemyState::Attack;
    enemy.last_attack_frame = frame;
    enemy
}

/// Player in sight: head straight for them at chase speed.
fn chase_player(mut enemy: Enemy, player: &PlayerState) -> Enemy {
    let dx = player.x - enemy.x;
    let dy = player.y - enemy.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 1.0 {
        enemy.is_moving = false;
        enemy.state = EnemyState::Chase;
        return enemy;
    }
    enemy.x += dx / dist * CHASE_SPEED;
    enemy.y += dy / dist * CHASE_SPEED;
    enemy.direction = facing_toward(dx, dy, enemy.direction);
    enemy.is_moving = true;
    enemy.anim_frame = enemy.anim_frame.wrapping_add(1);
    enemy.state = EnemyState::Chase;
    enemy
}

/// Cycle through the patrol route; with no route, stand still.
fn patrol(mut enemy: Enemy) -> Enemy {
    enemy.state = EnemyState::Patrol;
    let Some(&(tx, ty)) = enemy.patrol.get(enemy.patrol_index) else {
        enemy.is_moving = false;
        return enemy;
    };

    let dx = tx - enemy.x;
    let dy = ty - enemy.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < WAYPOINT_TOLERANCE {
        enemy.patrol_index = (enemy.patrol_index + 1) % enemy.patrol.len();
        enemy.is_moving = false;
        return enemy;
    }

    enemy.x += dx / dist * PATROL_SPEED;
    enemy.y += dy / dist * PATROL_SPEED;
    enemy.direction = facing_toward(dx, dy, enemy.direction);
    enemy.is_moving = true;
    enemy.anim_frame = enemy.anim_frame.wrapping_add(1);
    enemy
}

/// Facing from a displacement, dominant axis wins; zero keeps the current.
fn facing_toward(dx: f64, dy: f64, current: Direction) -> Direction {
    if dx == 0.0 && dy == 0.0 {
        return current;
    }
    if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}
