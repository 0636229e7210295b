//! Tile map model: a static grid of tile kinds plus the collision grid
//! derived from it. All lookups are fail-closed — out-of-range coordinates
//! report as blocked — because player and camera positions can transiently
//! leave nominal bounds within a frame before clamping runs.

/// Side length of one map tile in world pixels. All world coordinates,
/// speeds and reach constants are expressed in this unit.
pub const TILE_SIZE: f64 = 16.0;

/// Kinds of tiles the map is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    Grass,
    Path,
    Wall,
    Water,
    Tree,
    Building,
    Door,
    /// Semantic trigger tile: walking onto it (under the session's gating
    /// condition) ends the playing phase.
    Checkpoint,
}

impl TileKind {
    /// Whether actors may stand on this tile. The blocked set is exactly
    /// {wall, water, tree, building}; doors and checkpoints are walkable.
    pub fn is_passable(self) -> bool {
        !matches!(
            self,
            TileKind::Wall | TileKind::Water | TileKind::Tree | TileKind::Building
        )
    }
}

/// Immutable tile grid with a derived boolean collision grid. Constructed
/// once per level, never mutated; the collision grid is recomputed from the
/// tiles at construction so the two can never disagree.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
    blocked: Vec<bool>,
}

impl TileMap {
    /// Build a map from row-major rows. Ragged rows are truncated or padded
    /// with grass to the width of the first row; an empty grid yields a
    /// zero-size map on which every coordinate reads as blocked.
    pub fn new(rows: &[Vec<TileKind>]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut tiles = Vec::with_capacity(width * height);
        for row in rows {
            for x in 0..width {
                tiles.push(row.get(x).copied().unwrap_or(TileKind::Grass));
            }
        }
        let blocked = tiles.iter().map(|t| !t.is_passable()).collect();
        Self {
            width,
            height,
            tiles,
            blocked,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile kind at a tile coordinate; `None` outside the grid.
    pub fn tile(&self, tx: i32, ty: i32) -> Option<TileKind> {
        self.index(tx, ty).map(|i| self.tiles[i])
    }

    /// Collision lookup at a tile coordinate. Out-of-bounds is blocked.
    pub fn is_blocked(&self, tx: i32, ty: i32) -> bool {
        self.index(tx, ty).is_none_or(|i| self.blocked[i])
    }

    /// Whether the tile under a world-space point is the checkpoint trigger.
    pub fn is_checkpoint_at(&self, wx: f64, wy: f64) -> bool {
        let (tx, ty) = world_to_tile(wx, wy);
        self.tile(tx, ty) == Some(TileKind::Checkpoint)
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 {
            return None;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        if tx >= self.width || ty >= self.height {
            return None;
        }
        Some(ty * self.width + tx)
    }
}

/// Convert a world-space point to the tile coordinate containing it.
pub fn world_to_tile(wx: f64, wy: f64) -> (i32, i32) {
    (
        (wx / TILE_SIZE).floor() as i32,
        (wy / TILE_SIZE).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> TileMap {
        TileMap::new(&[
            vec![TileKind::Grass, TileKind::Wall],
            vec![TileKind::Path, TileKind::Checkpoint],
        ])
    }

    #[test]
    fn blocked_matches_kind() {
        let map = two_by_two();
        assert!(!map.is_blocked(0, 0));
        assert!(map.is_blocked(1, 0));
        assert!(!map.is_blocked(0, 1));
        assert!(!map.is_blocked(1, 1));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let map = two_by_two();
        for (tx, ty) in [(-1, 0), (0, -1), (2, 0), (0, 2), (100, 100), (-5, -5)] {
            assert!(map.is_blocked(tx, ty), "({tx},{ty}) should read blocked");
            assert_eq!(map.tile(tx, ty), None);
        }
    }

    #[test]
    fn zero_size_grid_is_all_blocked() {
        let map = TileMap::new(&[]);
        assert_eq!(map.width(), 0);
        assert_eq!(map.height(), 0);
        assert!(map.is_blocked(0, 0));
    }

    #[test]
    fn checkpoint_query_uses_containing_tile() {
        let map = two_by_two();
        // Any point inside tile (1,1) is the checkpoint.
        assert!(map.is_checkpoint_at(TILE_SIZE + 1.0, TILE_SIZE + 15.0));
        assert!(!map.is_checkpoint_at(1.0, 1.0));
        // Outside the grid: not a checkpoint.
        assert!(!map.is_checkpoint_at(-3.0, 40.0));
    }

    #[test]
    fn door_and_checkpoint_are_passable() {
        assert!(TileKind::Door.is_passable());
        assert!(TileKind::Checkpoint.is_passable());
        assert!(!TileKind::Water.is_passable());
        assert!(!TileKind::Building.is_passable());
    }
}
