//! Player state and input-driven movement.
//!
//! The player is a pure state snapshot advanced once per simulated frame.
//! Movement resolves tile collisions per axis against the leading corners of
//! an inset hitbox, which lets the avatar slide along walls instead of
//! sticking to them.

use super::map::{TILE_SIZE, TileMap};

/// Displacement applied per simulated frame while a direction key is held.
pub const PLAYER_SPEED: f64 = 2.0;
/// The collision hitbox is inset this many pixels from the sprite bounds on
/// every side, so the avatar can squeeze through tile-wide gaps.
pub const HITBOX_INSET: f64 = 2.0;

/// Cardinal facing of an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What the player is currently doing. `Attacking` freezes position until
/// the attack completes; `Hurt` is a one-frame transient that falls back to
/// `Idle` on the next movement update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Idle,
    Walking,
    Attacking,
    Hurt,
}

/// Held-key snapshot injected into every tick by the host. The four
/// directional flags and the attack flag mirror the key listener state; the
/// core never reads the keyboard itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
}

/// Player snapshot, replaced wholesale each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    /// World position of the sprite's top-left corner, in pixels.
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    pub is_moving: bool,
    /// Increments once per moved frame; drives the walk cycle.
    pub anim_frame: u32,
    pub action: PlayerAction,
    /// Progress counter of the running attack animation.
    pub attack_frame: u32,
    /// Frame number before which a new attack cannot start.
    pub attack_cooldown_until: u64,
    /// Frame number before which the player cannot take damage again.
    pub invulnerable_until: u64,
}

impl PlayerState {
    /// Fresh player at a spawn position, facing the camera.
    pub fn at_spawn(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            direction: Direction::Down,
            is_moving: false,
            anim_frame: 0,
            action: PlayerAction::Idle,
            attack_frame: 0,
            attack_cooldown_until: 0,
            invulnerable_until: 0,
        }
    }

    /// World-space center of the sprite.
    pub fn center(&self) -> (f64, f64) {
        (self.x + TILE_SIZE / 2.0, self.y + TILE_SIZE / 2.0)
    }
}

/// Advance the player one frame from held-direction input.
///
/// No movement is processed while attacking (position frozen per the attack
/// contract), and a hurt player spends exactly this one update recovering to
/// idle. Facing follows the last nonzero requested axis; when both axes are
/// held the vertical one wins (consistent but arbitrary tie-break).
pub fn update_player(player: &PlayerState, input: InputSnapshot, map: &TileMap) -> PlayerState {
    if player.action == PlayerAction::Attacking {
        return *player;
    }
    if player.action == PlayerAction::Hurt {
        return PlayerState {
            action: PlayerAction::Idle,
            ..*player
        };
    }

    let mut next = *player;
    let mut dx = 0.0;
    let mut dy = 0.0;

    // Horizontal axis first so a simultaneous vertical key decides facing.
    if input.left {
        dx = -PLAYER_SPEED;
        next.direction = Direction::Left;
    } else if input.right {
        dx = PLAYER_SPEED;
        next.direction = Direction::Right;
    }
    if input.up {
        dy = -PLAYER_SPEED;
        next.direction = Direction::Up;
    } else if input.down {
        dy = PLAYER_SPEED;
        next.direction = Direction::Down;
    }

    next.is_moving = dx != 0.0 || dy != 0.0;
    next.action = if next.is_moving {
        PlayerAction::Walking
    } else {
        PlayerAction::Idle
    };

    if next.is_moving {
        let hitbox_side = TILE_SIZE - HITBOX_INSET * 2.0;

        // Horizontal displacement: test the two leading corners (top/bottom)
        // at the target x before committing.
        if dx != 0.0 {
            let new_x = next.x + dx;
            let check_x = if dx > 0.0 {
                new_x + HITBOX_INSET + hitbox_side
            } else {
                new_x + HITBOX_INSET
            };
            let check_tx = (check_x / TILE_SIZE).floor() as i32;
            let top_ty = ((next.y + HITBOX_INSET) / TILE_SIZE).floor() as i32;
            let bottom_ty = ((next.y + HITBOX_INSET + hitbox_side - 1.0) / TILE_SIZE).floor() as i32;
            if !map.is_blocked(check_tx, top_ty) && !map.is_blocked(check_tx, bottom_ty) {
                next.x = new_x;
            }
        }

        // Vertical displacement against the left/right leading corners, using
        // the already-resolved x so wall sliding works.
        if dy != 0.0 {
            let new_y = next.y + dy;
            let check_y = if dy > 0.0 {
                new_y + HITBOX_INSET + hitbox_side
            } else {
                new_y + HITBOX_INSET
            };
            let check_ty = (check_y / TILE_SIZE).floor() as i32;
            let left_tx = ((next.x + HITBOX_INSET) / TILE_SIZE).floor() as i32;
            let right_tx = ((next.x + HITBOX_INSET + hitbox_side - 1.0) / TILE_SIZE).floor() as i32;
            if !map.is_blocked(left_tx, check_ty) && !map.is_blocked(right_tx, check_ty) {
                next.y = new_y;
            }
        }

        // Clamp to map bounds; min-after-max keeps this total on degenerate maps.
        let max_x = (map.width().saturating_sub(1)) as f64 * TILE_SIZE;
        let max_y = (map.height().saturating_sub(1)) as f64 * TILE_SIZE;
        next.x = next.x.min(max_x).max(0.0);
        next.y = next.y.min(max_y).max(0.0);

        next.anim_frame = next.anim_frame.wrapping_add(1);
    }

    next
}
