//! Canvas projection of the simulation state. Purely mechanical: programmatic
//! pixel-art rects drawn back-to-front (tiles, items, enemies, player, HUD
//! hint), translated by the camera. Nothing in here feeds back into the
//! simulation.

use web_sys::CanvasRenderingContext2d;

use super::combat::{ATTACK_DURATION, ATTACK_RANGE, attack_is_active};
use super::enemy::{Enemy, EnemyKind, EnemyState};
use super::item::{GameItem, ItemKind};
use super::map::{TILE_SIZE, TileKind, TileMap};
use super::player::{Direction, PlayerAction, PlayerState};
use super::session::{Camera, GameSession, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Simulation frames per walk-cycle sprite frame.
const ANIM_SPEED: u64 = 8;

/// Draw one complete frame.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, session: &GameSession) {
    let camera = session.camera();

    ctx.set_fill_style_str("#000000");
    ctx.fill_rect(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

    draw_tile_map(ctx, &session.level().map, &camera);
    draw_items(ctx, &session.items, session.frame, &camera);
    draw_enemies(ctx, &session.enemies, session.frame, &camera);
    draw_player(ctx, &session.player, session.frame, &camera);
    draw_hint(ctx, session.alive_enemies());
}

fn draw_tile_map(ctx: &CanvasRenderingContext2d, map: &TileMap, camera: &Camera) {
    let start_tx = (camera.x / TILE_SIZE).floor() as i32;
    let start_ty = (camera.y / TILE_SIZE).floor() as i32;
    let cols = (VIEWPORT_WIDTH / TILE_SIZE).ceil() as i32 + 1;
    let rows = (VIEWPORT_HEIGHT / TILE_SIZE).ceil() as i32 + 1;

    for row in 0..rows {
        for col in 0..cols {
            let (tx, ty) = (start_tx + col, start_ty + row);
            let Some(kind) = map.tile(tx, ty) else {
                continue;
            };
            let px = f64::from(tx) * TILE_SIZE - camera.x;
            let py = f64::from(ty) * TILE_SIZE - camera.y;
            draw_tile(ctx, kind, px, py, tx, ty);
        }
    }
}

fn draw_tile(ctx: &CanvasRenderingContext2d, kind: TileKind, px: f64, py: f64, tx: i32, ty: i32) {
    match kind {
        TileKind::Grass => {
            ctx.set_fill_style_str("#4caf50");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            // Deterministic speckle keyed off the tile position so it does
            // not swim under camera motion.
            if (tx * 7 + ty * 13).rem_euclid(16) < 4 {
                ctx.set_fill_style_str("#3d8b40");
                ctx.fill_rect(px + 3.0, py + 5.0, 2.0, 2.0);
                ctx.fill_rect(px + 10.0, py + 11.0, 2.0, 2.0);
            }
        }
        TileKind::Path => {
            ctx.set_fill_style_str("#bda27e");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            ctx.set_fill_style_str("#a8906f");
            ctx.fill_rect(px + 4.0, py + 8.0, 3.0, 2.0);
        }
        TileKind::Wall => {
            ctx.set_fill_style_str("#9e9e9e");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            ctx.set_fill_style_str("#757575");
            ctx.fill_rect(px, py + 7.0, TILE_SIZE, 1.0);
            ctx.fill_rect(px + 8.0, py, 1.0, 7.0);
            ctx.fill_rect(px, py + 8.0, 1.0, 8.0);
        }
        TileKind::Water => {
            ctx.set_fill_style_str("#2196f3");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            ctx.set_fill_style_str("#64b5f6");
            ctx.fill_rect(px + 2.0, py + 4.0, 4.0, 2.0);
            ctx.fill_rect(px + 10.0, py + 10.0, 4.0, 2.0);
        }
        TileKind::Tree => {
            ctx.set_fill_style_str("#4caf50");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            ctx.set_fill_style_str("#5d4037");
            ctx.fill_rect(px + 6.0, py + 6.0, 4.0, 4.0);
            ctx.set_fill_style_str("#2e7d32");
            ctx.fill_rect(px + 4.0, py + 1.0, 8.0, 4.0);
            ctx.fill_rect(px + 2.0, py + 4.0, 12.0, 5.0);
            ctx.fill_rect(px + 4.0, py + 9.0, 8.0, 4.0);
        }
        TileKind::Building => {
            ctx.set_fill_style_str("#8d6e63");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            ctx.set_fill_style_str("#6d4c41");
            ctx.fill_rect(px, py, TILE_SIZE, 4.0);
            ctx.set_fill_style_str("#4a90d9");
            ctx.fill_rect(px + 5.0, py + 7.0, 6.0, 6.0);
        }
        TileKind::Door => {
            ctx.set_fill_style_str("#8d6e63");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            ctx.set_fill_style_str("#5d4037");
            ctx.fill_rect(px + 3.0, py + 4.0, 10.0, 12.0);
            ctx.set_fill_style_str("#f1c40f");
            ctx.fill_rect(px + 10.0, py + 10.0, 2.0, 2.0);
        }
        TileKind::Checkpoint => {
            ctx.set_fill_style_str("#bda27e");
            ctx.fill_rect(px, py, TILE_SIZE, TILE_SIZE);
            // Golden cross marker.
            ctx.set_fill_style_str("#f1c40f");
            ctx.fill_rect(px + 7.0, py + 2.0, 2.0, 12.0);
            ctx.fill_rect(px + 4.0, py + 5.0, 8.0, 2.0);
        }
    }
}

fn draw_items(ctx: &CanvasRenderingContext2d, items: &[GameItem], frame: u64, camera: &Camera) {
    for item in items {
        if item.collected {
            continue;
        }
        let sx = item.x - camera.x;
        let sy = item.y - camera.y;
        if sx < -TILE_SIZE || sx > VIEWPORT_WIDTH || sy < -TILE_SIZE || sy > VIEWPORT_HEIGHT {
            continue;
        }
        // Float bob keyed by frame and id so items are out of phase.
        let bob = ((frame as f64) * 0.1 + f64::from(item.id)).sin() * 2.0;
        ctx.save();
        ctx.translate(sx, sy + bob).ok();
        match item.kind {
            ItemKind::Grace => {
                ctx.set_fill_style_str("#f1c40f");
                ctx.fill_rect(7.0, 2.0, 2.0, 2.0);
                ctx.fill_rect(5.0, 4.0, 6.0, 4.0);
                ctx.fill_rect(4.0, 8.0, 8.0, 2.0);
                ctx.fill_rect(5.0, 10.0, 6.0, 2.0);
                ctx.fill_rect(7.0, 12.0, 2.0, 2.0);
                ctx.set_fill_style_str("#ffffff");
                ctx.fill_rect(6.0, 5.0, 1.0, 2.0);
            }
            ItemKind::Indulgence => {
                ctx.set_fill_style_str("#c0392b");
                ctx.fill_rect(4.0, 3.0, 8.0, 6.0);
                ctx.fill_rect(5.0, 9.0, 6.0, 4.0);
                ctx.set_fill_style_str("#000000");
                ctx.fill_rect(5.0, 5.0, 2.0, 2.0);
                ctx.fill_rect(9.0, 5.0, 2.0, 2.0);
            }
            ItemKind::Relic => {
                ctx.set_fill_style_str("#ece2c6");
                ctx.fill_rect(4.0, 4.0, 8.0, 10.0);
                ctx.set_fill_style_str("#2c3e50");
                ctx.fill_rect(5.0, 6.0, 6.0, 1.0);
                ctx.fill_rect(5.0, 8.0, 5.0, 1.0);
                ctx.fill_rect(5.0, 10.0, 6.0, 1.0);
            }
        }
        ctx.restore();
    }
}

fn draw_enemies(ctx: &CanvasRenderingContext2d, enemies: &[Enemy], frame: u64, camera: &Camera) {
    for enemy in enemies {
        if enemy.state == EnemyState::Dead {
            continue;
        }
        let sx = enemy.x - camera.x;
        let sy = enemy.y - camera.y;
        if sx < -TILE_SIZE || sx > VIEWPORT_WIDTH || sy < -TILE_SIZE || sy > VIEWPORT_HEIGHT {
            continue;
        }

        ctx.save();
        ctx.translate(sx, sy).ok();
        // Hurt flicker on a 4-frame cadence.
        if enemy.state == EnemyState::Hurt && (frame / 4) % 2 == 0 {
            ctx.set_global_alpha(0.5);
        }
        let step = if enemy.is_moving {
            (u64::from(enemy.anim_frame) / ANIM_SPEED % 2) as f64
        } else {
            0.0
        };
        match enemy.kind {
            EnemyKind::Peddler => {
                ctx.set_fill_style_str("#795548");
                ctx.fill_rect(4.0, 6.0, 8.0, 8.0);
                ctx.set_fill_style_str("#ffcc80");
                ctx.fill_rect(5.0, 2.0, 6.0, 4.0);
                // Coin pouch.
                ctx.set_fill_style_str("#f1c40f");
                ctx.fill_rect(10.0, 10.0, 3.0, 3.0);
            }
            EnemyKind::Guard => {
                ctx.set_fill_style_str("#607d8b");
                ctx.fill_rect(4.0, 5.0, 8.0, 9.0);
                ctx.set_fill_style_str("#b0bec5");
                ctx.fill_rect(5.0, 1.0, 6.0, 4.0);
                // Spear.
                ctx.set_fill_style_str("#8d6e63");
                ctx.fill_rect(13.0, 2.0, 1.0, 12.0);
            }
            EnemyKind::Boss => {
                ctx.set_fill_style_str("#b71c1c");
                ctx.fill_rect(2.0, 4.0, 12.0, 11.0);
                ctx.set_fill_style_str("#ffcc80");
                ctx.fill_rect(5.0, 1.0, 6.0, 4.0);
                ctx.set_fill_style_str("#7f0000");
                ctx.fill_rect(3.0, 0.0, 10.0, 2.0);
            }
        }
        // Feet shuffle while moving.
        ctx.set_fill_style_str("#3e2723");
        ctx.fill_rect(5.0 - step, 14.0, 2.0, 2.0);
        ctx.fill_rect(9.0 + step, 14.0, 2.0, 2.0);
        ctx.set_global_alpha(1.0);

        // Health bar once damaged.
        if enemy.health < enemy.max_health {
            let ratio = f64::from(enemy.health) / f64::from(enemy.max_health);
            ctx.set_fill_style_str("#212121");
            ctx.fill_rect(1.0, -4.0, 14.0, 2.0);
            ctx.set_fill_style_str(if ratio > 0.5 { "#4caf50" } else { "#e53935" });
            ctx.fill_rect(1.0, -4.0, 14.0 * ratio, 2.0);
        }
        ctx.restore();
    }
}

fn draw_player(ctx: &CanvasRenderingContext2d, player: &PlayerState, frame: u64, camera: &Camera) {
    let sx = player.x - camera.x;
    let sy = player.y - camera.y;

    ctx.save();
    ctx.translate(sx, sy).ok();

    if player.action == PlayerAction::Hurt && (frame / 4) % 2 == 0 {
        ctx.set_global_alpha(0.5);
    }

    let walk_frame = if player.is_moving {
        u64::from(player.anim_frame) / ANIM_SPEED % 4
    } else {
        0
    };
    // Slight bob when walking.
    let bob = (walk_frame as f64 * std::f64::consts::FRAC_PI_2).sin();
    ctx.translate(0.0, bob).ok();

    // Robe, head, eyes, feet.
    ctx.set_fill_style_str("#37251b");
    ctx.fill_rect(5.0, 0.0, 6.0, 3.0);
    ctx.set_fill_style_str("#ffcc80");
    ctx.fill_rect(5.0, 3.0, 6.0, 4.0);
    ctx.set_fill_style_str("#1a0f0a");
    match player.direction {
        Direction::Down => {
            ctx.fill_rect(6.0, 4.0, 1.0, 1.0);
            ctx.fill_rect(9.0, 4.0, 1.0, 1.0);
        }
        Direction::Left => ctx.fill_rect(5.0, 4.0, 1.0, 1.0),
        Direction::Right => ctx.fill_rect(10.0, 4.0, 1.0, 1.0),
        Direction::Up => {}
    }
    ctx.set_fill_style_str("#6d4c41");
    ctx.fill_rect(4.0, 7.0, 8.0, 7.0);
    ctx.fill_rect(3.0, 8.0, 10.0, 5.0);
    ctx.set_fill_style_str("#3e2723");
    let leg = if player.is_moving && walk_frame % 2 == 1 {
        1.0
    } else {
        0.0
    };
    ctx.fill_rect(5.0 - leg, 14.0, 2.0, 2.0);
    ctx.fill_rect(9.0 + leg, 14.0, 2.0, 2.0);

    if attack_is_active(player) {
        draw_attack_swing(ctx, player);
    }

    ctx.set_global_alpha(1.0);
    ctx.restore();
}

/// Swing effect in front of the player: a small pamphlet flying out along
/// the facing, distance scaled by attack progress.
fn draw_attack_swing(ctx: &CanvasRenderingContext2d, player: &PlayerState) {
    let progress = f64::from(player.attack_frame) / f64::from(ATTACK_DURATION);
    let reach = progress * ATTACK_RANGE;
    let (ox, oy) = match player.direction {
        Direction::Up => (4.0, -reach - 8.0),
        Direction::Down => (4.0, reach + 8.0),
        Direction::Left => (-reach - 8.0, 4.0),
        Direction::Right => (reach + 16.0, 4.0),
    };
    ctx.save();
    ctx.translate(ox + 4.0, oy + 4.0).ok();
    ctx.rotate(progress * std::f64::consts::TAU).ok();
    ctx.set_fill_style_str("#f5f5dc");
    ctx.fill_rect(-4.0, -3.0, 8.0, 6.0);
    ctx.set_fill_style_str("#8b4513");
    ctx.fill_rect(-4.0, -3.0, 2.0, 6.0);
    ctx.restore();
}

fn draw_hint(ctx: &CanvasRenderingContext2d, alive: usize) {
    if alive == 0 {
        return;
    }
    ctx.set_fill_style_str("rgba(0,0,0,0.5)");
    ctx.fill_rect(VIEWPORT_WIDTH / 2.0 - 60.0, VIEWPORT_HEIGHT - 16.0, 120.0, 14.0);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("8px sans-serif");
    ctx.set_text_align("center");
    ctx.fill_text(
        &format!("Space = attack ({alive} foes)"),
        VIEWPORT_WIDTH / 2.0,
        VIEWPORT_HEIGHT - 6.0,
    )
    .ok();
}
