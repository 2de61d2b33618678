use serde::{Deserialize, Serialize};

use super::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Normal,
    Golden,
    Speed,
    Slow,
}

impl ItemKind {
    /// Spawn order used when walking cumulative chances.
    pub const CATALOG: [ItemKind; 4] = [ItemKind::Normal, ItemKind::Golden, ItemKind::Speed, ItemKind::Slow];

    pub fn points(&self) -> u32 {
        match self {
            ItemKind::Normal => 10,
            ItemKind::Golden => 30,
            ItemKind::Speed => 10,
            ItemKind::Slow => 10,
        }
    }

    pub fn chance(&self) -> f64 {
        match self {
            ItemKind::Normal => 0.7,
            ItemKind::Golden => 0.15,
            ItemKind::Speed => 0.075,
            ItemKind::Slow => 0.075,
        }
    }

    /// Colour hint for hosts, `#rrggbb`.
    pub fn color(&self) -> &'static str {
        match self {
            ItemKind::Normal => "#ff6b6b",
            ItemKind::Golden => "#ffd700",
            ItemKind::Speed => "#4ecdc4",
            ItemKind::Slow => "#95e1d3",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub position: Point,
    pub kind: ItemKind,
}
