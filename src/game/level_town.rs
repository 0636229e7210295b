//! The shipped town level: a walled market town with a churchyard ruin, a
//! pond, two indulgence peddlers working the market row, a guard on the
//! south road and the checkpoint on the church square.

use std::sync::OnceLock;

use super::enemy::EnemyKind;
use super::item::ItemKind;
use super::level::{EnemySpec, ItemSpec, LevelDef, LevelDesc};

/// Built town level. Runtime-built once and leaked into a static, the same
/// way the board levels are assembled at startup.
pub fn town() -> &'static LevelDesc {
    static LEVEL: OnceLock<LevelDesc> = OnceLock::new();
    LEVEL.get_or_init(|| town_def().build())
}

/// Plain definition of the town (20x18 tiles).
pub fn town_def() -> LevelDef {
    LevelDef {
        name: "Wittenberg Market",
        rows: vec![
            "TTTTTTTTTTTTTTTTTTTT",
            "T..................T",
            "T.BBB..........BBB.T",
            "T.BDB...####...BDB.T",
            "T..:....#..#....:..T",
            "T..:....#..#.......T",
            "T..:...............T",
            "T~~:......::.......T",
            "T~~:......::.....:.T",
            "T..:....X..........T",
            "T..::..............T",
            "T...:..............T",
            "T...::::::::.......T",
            "T..........:.......T",
            "T..........:.......T",
            "T.......:::::......T",
            "T..................T",
            "TTTTTTTTTTTTTTTTTTTT",
        ],
        spawn_tile: (8, 15),
        items: vec![
            ItemSpec {
                tile: (4, 12),
                kind: ItemKind::Grace,
            },
            ItemSpec {
                tile: (17, 8),
                kind: ItemKind::Grace,
            },
            ItemSpec {
                tile: (13, 4),
                kind: ItemKind::Grace,
            },
            ItemSpec {
                tile: (3, 9),
                kind: ItemKind::Grace,
            },
            // Hidden in the ruin enclosure, reachable from the south opening.
            ItemSpec {
                tile: (9, 4),
                kind: ItemKind::Relic,
            },
            ItemSpec {
                tile: (10, 12),
                kind: ItemKind::Indulgence,
            },
            ItemSpec {
                tile: (11, 7),
                kind: ItemKind::Indulgence,
            },
        ],
        enemies: vec![
            EnemySpec {
                tile: (5, 6),
                kind: EnemyKind::Peddler,
                patrol: vec![(3, 6), (7, 6)],
            },
            EnemySpec {
                tile: (14, 6),
                kind: EnemyKind::Guard,
                patrol: vec![(12, 6), (16, 6)],
            },
            // The boss holds the church approach and does not patrol.
            EnemySpec {
                tile: (9, 10),
                kind: EnemyKind::Boss,
                patrol: Vec::new(),
            },
        ],
    }
}
