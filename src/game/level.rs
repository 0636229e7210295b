//! Level definitions. A level is externally supplied, immutable input data:
//! the tile grid, the item and enemy rosters, the spawn point. The core
//! never authors levels, it only consumes them; `LevelDef` is the plain
//! shippable description (JSON-ready behind the `serde` feature) and
//! `LevelDesc` the built runtime form the session clones fresh state from.

use super::enemy::{Enemy, EnemyKind};
use super::item::{GameItem, ItemKind};
use super::map::{TILE_SIZE, TileKind, TileMap};

/// One item placement in a level definition, in tile coordinates.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSpec {
    pub tile: (u32, u32),
    pub kind: ItemKind,
}

/// One enemy placement in a level definition: spawn tile, kind and an
/// ordered patrol route in tile coordinates (empty = stationary).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpec {
    pub tile: (u32, u32),
    pub kind: EnemyKind,
    pub patrol: Vec<(u32, u32)>,
}

/// Shippable level description. The tile grid is encoded as legend rows:
/// `.` grass, `:` path, `#` wall, `~` water, `T` tree, `B` building,
/// `D` door, `X` checkpoint. Unknown characters degrade to grass.
/// Serialize-only under the `serde` feature: definitions are authored as
/// static data and exported, the borrowed rows are never deserialized back.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LevelDef {
    pub name: &'static str,
    pub rows: Vec<&'static str>,
    pub spawn_tile: (u32, u32),
    pub items: Vec<ItemSpec>,
    pub enemies: Vec<EnemySpec>,
}

/// Built runtime level: tile map plus the initial rosters the session copies
/// at every run start.
#[derive(Clone, Debug)]
pub struct LevelDesc {
    pub name: &'static str,
    pub map: TileMap,
    /// Player spawn in world pixels.
    pub spawn: (f64, f64),
    pub items: Vec<GameItem>,
    pub enemies: Vec<Enemy>,
}

impl LevelDef {
    /// Build the runtime form. Total for any input: ragged rows and unknown
    /// legend characters degrade to grass, a zero-size grid blocks everything.
    pub fn build(&self) -> LevelDesc {
        let rows: Vec<Vec<TileKind>> = self
            .rows
            .iter()
            .map(|row| row.chars().map(tile_from_legend).collect())
            .collect();
        let map = TileMap::new(&rows);

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let (x, y) = tile_origin(spec.tile);
                GameItem::new(i as u32 + 1, x, y, spec.kind)
            })
            .collect();

        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let (x, y) = tile_origin(spec.tile);
                let patrol = spec.patrol.iter().map(|&t| tile_origin(t)).collect();
                Enemy::new(i as u32 + 1, x, y, spec.kind, patrol)
            })
            .collect();

        LevelDesc {
            name: self.name,
            map,
            spawn: tile_origin(self.spawn_tile),
            items,
            enemies,
        }
    }
}

#[cfg(feature = "serde_json")]
impl LevelDef {
    /// Export the definition as JSON for host-side level tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn tile_origin((tx, ty): (u32, u32)) -> (f64, f64) {
    (f64::from(tx) * TILE_SIZE, f64::from(ty) * TILE_SIZE)
}

fn tile_from_legend(c: char) -> TileKind {
    match c {
        ':' => TileKind::Path,
        '#' => TileKind::Wall,
        '~' => TileKind::Water,
        'T' => TileKind::Tree,
        'B' => TileKind::Building,
        'D' => TileKind::Door,
        'X' => TileKind::Checkpoint,
        _ => TileKind::Grass,
    }
}
