//! Collectible items scattered over the map. Collection is monotonic: the
//! flag flips to true on first proximity and never reverts within a run.

use super::map::TILE_SIZE;

/// Per-axis pickup distance between player center and item center.
pub const PICKUP_RADIUS: f64 = TILE_SIZE * 0.7;

/// Item kinds. Grace is beneficial, indulgence is harmful on pickup, the
/// relic is a cosmetic beneficial variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Grace,
    Indulgence,
    Relic,
}

impl ItemKind {
    /// Whether picking this up counts as a collect (vs. a hit).
    pub fn is_beneficial(self) -> bool {
        !matches!(self, ItemKind::Indulgence)
    }
}

/// One item instance from the level roster.
#[derive(Clone, Debug, PartialEq)]
pub struct GameItem {
    pub id: u32,
    /// World position of the sprite's top-left corner.
    pub x: f64,
    pub y: f64,
    pub kind: ItemKind,
    pub collected: bool,
}

impl GameItem {
    pub fn new(id: u32, x: f64, y: f64, kind: ItemKind) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            collected: false,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + TILE_SIZE / 2.0, self.y + TILE_SIZE / 2.0)
    }
}

/// Index of the first uncollected item within pickup range of the player
/// center, if any. At most one item is collected per tick.
pub fn find_touched_item(px: f64, py: f64, items: &[GameItem]) -> Option<usize> {
    let pcx = px + TILE_SIZE / 2.0;
    let pcy = py + TILE_SIZE / 2.0;
    items.iter().position(|item| {
        if item.collected {
            return false;
        }
        let (icx, icy) = item.center();
        (pcx - icx).abs() < PICKUP_RADIUS && (pcy - icy).abs() < PICKUP_RADIUS
    })
}
