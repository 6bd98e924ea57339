//! Routing difficulty field for a later road router
//!
//! Costs accumulate in the accessibility grid's scratch channel. Each
//! terrain kind maps to one [`CostRule`]: spread an increment over a diamond
//! of cells, add a local increment, or refuse the cell outright.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::accessibility::AccessibilityGrid;
use crate::grid::Grid;
use crate::pattern::PatternLibrary;
use crate::point::Point;
use crate::terrain::TerrainKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadCost {
    pub reach: usize,
    pub increment: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadCostParams {
    pub default_reach: usize,
    pub default_increment: i32,
    /// Per-kind overrides for spread costs
    pub spread: BTreeMap<TerrainKind, SpreadCost>,
    pub river_increment: i32,
    /// Existing roads are cheaper to reuse
    pub road_increment: i32,
    pub refuse_cost: i32,
    pub border_penalty: i32,
    /// Uniform jitter amplitude added to routable cells, 0 disables
    pub noise: i32,
}

impl Default for RoadCostParams {
    fn default() -> Self {
        let spread = [
            (TerrainKind::Plain, SpreadCost { reach: 0, increment: 1 }),
            (TerrainKind::Desert, SpreadCost { reach: 1, increment: 2 }),
            (TerrainKind::Forest, SpreadCost { reach: 1, increment: 2 }),
            (TerrainKind::Mountain, SpreadCost { reach: 2, increment: 2 }),
        ]
        .into_iter()
        .collect();

        Self {
            default_reach: 3,
            default_increment: 2,
            spread,
            river_increment: 15,
            road_increment: -15,
            refuse_cost: 999,
            border_penalty: 50,
            noise: 10,
        }
    }
}

/// How one terrain kind contributes to the cost field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostRule {
    Spread { reach: usize, increment: i32 },
    Local(i32),
    Refuse,
}

impl RoadCostParams {
    pub fn rule(&self, kind: TerrainKind) -> CostRule {
        match kind {
            TerrainKind::Sea | TerrainKind::CityNode => CostRule::Refuse,
            TerrainKind::River => CostRule::Local(self.river_increment),
            // Reuse wins over refusal for existing roads
            TerrainKind::Road => CostRule::Local(self.road_increment),
            other => {
                let SpreadCost { reach, increment } = self.spread.get(&other).copied().unwrap_or(SpreadCost {
                    reach: self.default_reach,
                    increment: self.default_increment,
                });
                CostRule::Spread { reach, increment }
            }
        }
    }
}

/// Per-cell routing cost. Refused cells hold `refuse_cost`.
pub struct RoadCostField {
    access: AccessibilityGrid,
    refuse_cost: i32,
}

impl RoadCostField {
    pub fn build<R: Rng + ?Sized>(
        grid: &Grid,
        mut access: AccessibilityGrid,
        params: &RoadCostParams,
        patterns: &PatternLibrary,
        rng: &mut R,
    ) -> Self {
        let size = grid.size();
        access.reset_data(0);

        // Terrain rules
        for node in grid.iter() {
            if !access.is_accessible(node.location) {
                continue;
            }
            match params.rule(node.kind) {
                CostRule::Spread { reach, increment } => {
                    let diamond = patterns.adjacent_diamond(reach);
                    access.apply(node.location, &diamond, |_, cost| cost + increment);
                }
                CostRule::Local(increment) => access.add_data(node.location, increment),
                CostRule::Refuse => {}
            }
        }

        // Jitter and border penalty
        for node in grid.iter() {
            let p = node.location;
            if !access.is_accessible(p) || params.rule(node.kind) == CostRule::Refuse {
                continue;
            }
            if params.noise > 0 {
                access.add_data(p, rng.gen_range(-params.noise..=params.noise));
            }
            if p.is_border(size) {
                access.add_data(p, params.border_penalty);
            }
        }

        // Refusals override everything accumulated
        for node in grid.iter() {
            let p = node.location;
            if !access.is_accessible(p) || params.rule(node.kind) == CostRule::Refuse {
                access.set_data(p, params.refuse_cost);
            }
        }

        Self {
            access,
            refuse_cost: params.refuse_cost,
        }
    }

    pub fn size(&self) -> usize {
        self.access.size()
    }

    pub fn cost(&self, p: Point) -> i32 {
        self.access.data(p)
    }

    pub fn is_refused(&self, p: Point) -> bool {
        self.cost(p) >= self.refuse_cost
    }

    pub fn accessibility(&self) -> &AccessibilityGrid {
        &self.access
    }
}

impl fmt::Display for RoadCostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size() as i32 {
            for x in 0..self.size() as i32 {
                let p = Point::new(x, y);
                if self.is_refused(p) {
                    write!(f, "  X ")?;
                } else {
                    write!(f, "{:3} ", self.cost(p))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
