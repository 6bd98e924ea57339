//! Tile-grid region generation library
//!
//! Layered generators paint terrain through an overlay onto a square grid,
//! guarded by an accessibility analysis that keeps the walkable area in one
//! connected piece.

pub mod accessibility;
pub mod config;
pub mod error;
pub mod export;
pub mod generators;
pub mod grid;
pub mod overlay;
pub mod pattern;
pub mod pipeline;
pub mod point;
pub mod range;
pub mod region;
pub mod road_cost;
pub mod terrain;

pub use accessibility::{AccessibilityGrid, AccessibilityParams};
pub use config::GenerationConfig;
pub use error::{MapGenError, Result};
pub use grid::{Grid, Node};
pub use overlay::Overlay;
pub use pattern::{Pattern, PatternLibrary};
pub use pipeline::{GenContext, GeneratorLevel, MapGenerator, Pipeline};
pub use point::Point;
pub use range::IntRange;
pub use region::{Region, RegionTemplate};
pub use road_cost::{RoadCostField, RoadCostParams};
pub use terrain::TerrainKind;
