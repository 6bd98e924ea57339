//! Terrain kinds painted on region grids

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ground cover of a single cell.
///
/// `None` is the "not yet written" sentinel of an overlay delta and never
/// appears in a committed grid. `Accessible` and `Inaccessible` only appear
/// on accessibility grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    None,
    Plain,
    CityNode,
    Road,
    Sea,
    Mountain,
    Forest,
    River,
    Desert,
    Accessible,
    Inaccessible,
}

impl TerrainKind {
    /// Kinds that can be painted on a region grid.
    pub fn all_ground() -> &'static [TerrainKind] {
        &[
            TerrainKind::Plain,
            TerrainKind::CityNode,
            TerrainKind::Road,
            TerrainKind::Sea,
            TerrainKind::Mountain,
            TerrainKind::Forest,
            TerrainKind::River,
            TerrainKind::Desert,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainKind::None => "None",
            TerrainKind::Plain => "Plain",
            TerrainKind::CityNode => "City",
            TerrainKind::Road => "Road",
            TerrainKind::Sea => "Sea",
            TerrainKind::Mountain => "Mountain",
            TerrainKind::Forest => "Forest",
            TerrainKind::River => "River",
            TerrainKind::Desert => "Desert",
            TerrainKind::Accessible => "Accessible",
            TerrainKind::Inaccessible => "Inaccessible",
        }
    }

    /// Single character used by text renderings.
    pub fn glyph(&self) -> char {
        match self {
            TerrainKind::None => ' ',
            TerrainKind::Plain => '.',
            TerrainKind::CityNode => 'C',
            TerrainKind::Road => '#',
            TerrainKind::Sea => '~',
            TerrainKind::Mountain => 'M',
            TerrainKind::Forest => 'F',
            TerrainKind::River => 'R',
            TerrainKind::Desert => 'D',
            TerrainKind::Accessible => '.',
            TerrainKind::Inaccessible => 'X',
        }
    }

    /// RGB color used by image export.
    pub fn color(&self) -> [u8; 3] {
        match self {
            TerrainKind::None => [0, 0, 0],
            TerrainKind::Plain => [150, 200, 100],
            TerrainKind::CityNode => [200, 40, 40],
            TerrainKind::Road => [120, 90, 60],
            TerrainKind::Sea => [30, 70, 160],
            TerrainKind::Mountain => [120, 110, 100],
            TerrainKind::Forest => [30, 110, 40],
            TerrainKind::River => [70, 140, 220],
            TerrainKind::Desert => [230, 200, 120],
            TerrainKind::Accessible => [255, 255, 255],
            TerrainKind::Inaccessible => [40, 40, 40],
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
