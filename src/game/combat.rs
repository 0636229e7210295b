//! Melee combat: attack lifecycle, hitbox geometry, damage and
//! invulnerability rules. Everything here is a pure function over snapshots;
//! the orchestrator owns the state and decides when to call what, so the
//! same rules serve the player's swing and enemy contact damage.
//!
//! All deadlines are frame numbers against the session's monotonically
//! increasing frame counter — no wall-clock time enters combat math.

use super::enemy::{Enemy, EnemyState};
use super::map::TILE_SIZE;
use super::player::{Direction, PlayerAction, PlayerState};

/// Frames one attack animation runs before returning to idle.
pub const ATTACK_DURATION: u32 = 16;
/// Frames after a completed attack before the next may start.
pub const ATTACK_COOLDOWN: u64 = 20;
/// Reach of the attack hitbox in front of the attacker, in pixels.
pub const ATTACK_RANGE: f64 = 20.0;
/// Width of the attack hitbox perpendicular to the facing axis.
pub const ATTACK_WIDTH: f64 = 24.0;
/// Damage one player swing deals to an enemy.
pub const PLAYER_DAMAGE: i32 = 2;
/// Damage one enemy contact deals to the player.
pub const ENEMY_DAMAGE: i32 = 1;
/// Frames of invulnerability after taking a hit.
pub const INVULNERABLE_DURATION: u64 = 60;
/// Attack-progress range (inclusive) during which the swing can connect.
/// Frames before it are wind-up, frames after it are recovery.
pub const ACTIVE_FRAME_START: u32 = 4;
pub const ACTIVE_FRAME_END: u32 = 10;

/// Axis-aligned rectangle used for hit testing, independent of sprite bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Hitbox {
    /// Overlap test against a square of the given radius centered at a point.
    pub fn intersects_centered_square(&self, cx: f64, cy: f64, radius: f64) -> bool {
        self.x < cx + radius
            && self.x + self.width > cx - radius
            && self.y < cy + radius
            && self.y + self.height > cy - radius
    }
}

/// Begin an attack. No-op while already attacking or before the cooldown
/// deadline; otherwise the actor enters the attacking action with progress
/// reset and movement halted.
pub fn start_attack(player: &PlayerState, frame: u64) -> PlayerState {
    if player.action == PlayerAction::Attacking {
        return *player;
    }
    if frame < player.attack_cooldown_until {
        return *player;
    }
    PlayerState {
        action: PlayerAction::Attacking,
        attack_frame: 0,
        is_moving: false,
        ..*player
    }
}

/// Advance the attack animation one tick. On completion the actor returns to
/// idle and the next cooldown deadline is set from the current frame.
pub fn update_attack(player: &PlayerState, frame: u64) -> PlayerState {
    if player.action != PlayerAction::Attacking {
        return *player;
    }
    let progress = player.attack_frame + 1;
    if progress >= ATTACK_DURATION {
        return PlayerState {
            action: PlayerAction::Idle,
            attack_frame: 0,
            attack_cooldown_until: frame + ATTACK_COOLDOWN,
            ..*player
        };
    }
    PlayerState {
        attack_frame: progress,
        ..*player
    }
}

/// Whether the running attack is inside its active window, i.e. can connect.
pub fn attack_is_active(player: &PlayerState) -> bool {
    player.action == PlayerAction::Attacking
        && (ACTIVE_FRAME_START..=ACTIVE_FRAME_END).contains(&player.attack_frame)
}

/// Attack hitbox one tile-length in front of the actor along its facing,
/// never overlapping the actor's own bounding box.
pub fn attack_hitbox(x: f64, y: f64, direction: Direction) -> Hitbox {
    let cx = x + TILE_SIZE / 2.0;
    let cy = y + TILE_SIZE / 2.0;
    match direction {
        Direction::Up => Hitbox {
            x: cx - ATTACK_WIDTH / 2.0,
            y: cy - ATTACK_RANGE - TILE_SIZE / 2.0,
            width: ATTACK_WIDTH,
            height: ATTACK_RANGE,
        },
        Direction::Down => Hitbox {
            x: cx - ATTACK_WIDTH / 2.0,
            y: cy + TILE_SIZE / 2.0,
            width: ATTACK_WIDTH,
            height: ATTACK_RANGE,
        },
        Direction::Left => Hitbox {
            x: cx - ATTACK_RANGE - TILE_SIZE / 2.0,
            y: cy - ATTACK_WIDTH / 2.0,
            width: ATTACK_RANGE,
            height: ATTACK_WIDTH,
        },
        Direction::Right => Hitbox {
            x: cx + TILE_SIZE / 2.0,
            y: cy - ATTACK_WIDTH / 2.0,
            width: ATTACK_RANGE,
            height: ATTACK_WIDTH,
        },
    }
}

/// Does the hitbox connect with this enemy right now? Dead or hurt enemies
/// and enemies inside their invulnerability window can't be hit.
pub fn hit_test(hitbox: &Hitbox, enemy: &Enemy, frame: u64) -> bool {
    if enemy.state == EnemyState::Dead || enemy.state == EnemyState::Hurt {
        return false;
    }
    if frame < enemy.invulnerable_until {
        return false;
    }
    let (cx, cy) = enemy.center();
    hitbox.intersects_centered_square(cx, cy, TILE_SIZE / 2.0)
}

/// Subtract damage from an enemy. Lethal damage clamps health to zero and
/// makes the state dead (terminal, no invulnerability); otherwise the enemy
/// is hurt and invulnerable for a fixed window.
pub fn apply_damage(enemy: &Enemy, amount: i32, frame: u64) -> Enemy {
    let health = enemy.health - amount;
    if health <= 0 {
        return Enemy {
            health: 0,
            state: EnemyState::Dead,
            ..enemy.clone()
        };
    }
    Enemy {
        health,
        state: EnemyState::Hurt,
        invulnerable_until: frame + INVULNERABLE_DURATION,
        ..enemy.clone()
    }
}

/// Contact check: is this enemy touching the player? Uses per-axis
/// thresholds on the two centers rather than Euclidean distance — coarser
/// than the chase targeting on purpose.
pub fn enemy_hits_player(enemy: &Enemy, player: &PlayerState, frame: u64) -> bool {
    if enemy.state == EnemyState::Dead {
        return false;
    }
    if frame < player.invulnerable_until {
        return false;
    }
    let (px, py) = player.center();
    let (ex, ey) = enemy.center();
    (px - ex).abs() < TILE_SIZE * 0.8 && (py - ey).abs() < TILE_SIZE * 0.8
}

/// Mark the player hurt and open a fresh invulnerability window. Health and
/// score bookkeeping live with the external store; the orchestrator reports
/// the hit outward as an event.
pub fn damage_player(player: &PlayerState, frame: u64) -> PlayerState {
    PlayerState {
        action: PlayerAction::Hurt,
        invulnerable_until: frame + INVULNERABLE_DURATION,
        ..*player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::EnemyKind;

    fn peddler_at(x: f64, y: f64) -> Enemy {
        Enemy::new(7, x, y, EnemyKind::Peddler, Vec::new())
    }

    #[test]
    fn start_attack_is_idempotent_while_attacking() {
        let p = PlayerState::at_spawn(0.0, 0.0);
        let attacking = start_attack(&p, 5);
        assert_eq!(attacking.action, PlayerAction::Attacking);
        assert_eq!(start_attack(&attacking, 6), attacking);
    }

    #[test]
    fn start_attack_respects_cooldown_deadline() {
        let mut p = PlayerState::at_spawn(0.0, 0.0);
        p.attack_cooldown_until = 100;
        assert_eq!(start_attack(&p, 99).action, PlayerAction::Idle);
        assert_eq!(start_attack(&p, 100).action, PlayerAction::Attacking);
    }

    #[test]
    fn attack_runs_to_completion_and_sets_cooldown() {
        let mut p = start_attack(&PlayerState::at_spawn(0.0, 0.0), 0);
        let mut frame = 0;
        while p.action == PlayerAction::Attacking {
            frame += 1;
            p = update_attack(&p, frame);
            assert!(frame <= u64::from(ATTACK_DURATION), "attack must terminate");
        }
        assert_eq!(p.action, PlayerAction::Idle);
        assert_eq!(p.attack_frame, 0);
        assert_eq!(p.attack_cooldown_until, frame + ATTACK_COOLDOWN);
    }

    #[test]
    fn active_window_excludes_windup_and_recovery() {
        let mut p = start_attack(&PlayerState::at_spawn(0.0, 0.0), 0);
        assert!(!attack_is_active(&p), "progress 0 is wind-up");
        p.attack_frame = ACTIVE_FRAME_START;
        assert!(attack_is_active(&p));
        p.attack_frame = ACTIVE_FRAME_END;
        assert!(attack_is_active(&p));
        p.attack_frame = ACTIVE_FRAME_END + 1;
        assert!(!attack_is_active(&p), "recovery frames never connect");
    }

    #[test]
    fn hitbox_right_sits_flush_with_player_bounds() {
        let (x, y) = (64.0, 48.0);
        let hb = attack_hitbox(x, y, Direction::Right);
        assert_eq!(hb.x, x + TILE_SIZE);
        assert_eq!(hb.width, ATTACK_RANGE);
        assert_eq!(hb.height, ATTACK_WIDTH);
        assert_eq!(hb.y, y + TILE_SIZE / 2.0 - ATTACK_WIDTH / 2.0);
        // Never overlaps the player's own bounding box.
        assert!(hb.x >= x + TILE_SIZE);
    }

    #[test]
    fn hitbox_up_extends_above_player() {
        let hb = attack_hitbox(0.0, 64.0, Direction::Up);
        assert_eq!(hb.y, 64.0 - ATTACK_RANGE);
        assert_eq!(hb.y + hb.height, 64.0);
    }

    #[test]
    fn hit_test_skips_dead_hurt_and_invulnerable() {
        let hb = attack_hitbox(0.0, 0.0, Direction::Right);
        let adjacent = peddler_at(TILE_SIZE + 2.0, 0.0);
        assert!(hit_test(&hb, &adjacent, 10));

        let mut hurt = adjacent.clone();
        hurt.state = EnemyState::Hurt;
        assert!(!hit_test(&hb, &hurt, 10));

        let mut dead = adjacent.clone();
        dead.state = EnemyState::Dead;
        assert!(!hit_test(&hb, &dead, 10));

        let mut shielded = adjacent.clone();
        shielded.invulnerable_until = 11;
        assert!(!hit_test(&hb, &shielded, 10));
        assert!(hit_test(&hb, &shielded, 11), "window expires at the deadline");
    }

    #[test]
    fn lethal_damage_is_terminal_without_invulnerability() {
        let e = peddler_at(0.0, 0.0);
        let dead = apply_damage(&e, PLAYER_DAMAGE, 30);
        assert_eq!(dead.health, 0);
        assert_eq!(dead.state, EnemyState::Dead);
        assert_eq!(dead.invulnerable_until, 0);
    }

    #[test]
    fn nonlethal_damage_hurts_and_shields() {
        let e = Enemy::new(1, 0.0, 0.0, EnemyKind::Boss, Vec::new());
        let hurt = apply_damage(&e, PLAYER_DAMAGE, 30);
        assert_eq!(hurt.health, 8);
        assert_eq!(hurt.state, EnemyState::Hurt);
        assert_eq!(hurt.invulnerable_until, 30 + INVULNERABLE_DURATION);
    }

    #[test]
    fn overkill_clamps_health_to_zero() {
        let e = peddler_at(0.0, 0.0);
        let dead = apply_damage(&e, 99, 1);
        assert_eq!(dead.health, 0);
    }

    #[test]
    fn contact_uses_per_axis_thresholds() {
        let player = PlayerState::at_spawn(0.0, 0.0);
        let near = peddler_at(TILE_SIZE * 0.7, 0.0);
        assert!(enemy_hits_player(&near, &player, 10));

        // Just past the per-axis threshold on one axis only.
        let far = peddler_at(TILE_SIZE * 0.8, 0.0);
        assert!(!enemy_hits_player(&far, &player, 10));

        // A diagonal point whose Euclidean distance exceeds one axis threshold
        // still touches, because each axis is tested independently.
        let diagonal = peddler_at(TILE_SIZE * 0.7, TILE_SIZE * 0.7);
        assert!(enemy_hits_player(&diagonal, &player, 10));
    }

    #[test]
    fn contact_respects_player_invulnerability() {
        let mut player = PlayerState::at_spawn(0.0, 0.0);
        player.invulnerable_until = 50;
        let near = peddler_at(4.0, 0.0);
        assert!(!enemy_hits_player(&near, &player, 49));
        assert!(enemy_hits_player(&near, &player, 50));
    }

    #[test]
    fn damage_player_sets_hurt_and_window() {
        let p = PlayerState::at_spawn(0.0, 0.0);
        let hurt = damage_player(&p, 200);
        assert_eq!(hurt.action, PlayerAction::Hurt);
        assert_eq!(hurt.invulnerable_until, 200 + INVULNERABLE_DURATION);
    }
}
