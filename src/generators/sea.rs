//! Inland seas (Ground level)

use rand::Rng;

use super::feature::{FeatureGenerator, FeatureParams};
use crate::pipeline::GeneratorLevel;
use crate::terrain::TerrainKind;

pub const NAME: &str = "SeaGenerator";

pub fn sea_generator<R: Rng + ?Sized>(params: &FeatureParams, rng: &mut R) -> FeatureGenerator {
    FeatureGenerator::new(NAME, TerrainKind::Sea, GeneratorLevel::Ground, params, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessibility::AccessibilityParams;
    use crate::grid::Grid;
    use crate::pattern::PatternLibrary;
    use crate::overlay::Overlay;
    use crate::pipeline::{GenContext, MapGenerator};
    use crate::point::Point;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sea_does_not_flood_mountains() {
        let mut base = Grid::new(40, TerrainKind::Plain);
        base.fill_square(TerrainKind::Mountain, 4, Point::new(20, 20));
        let mountains = base.count(TerrainKind::Mountain);

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let generator = sea_generator(&FeatureParams::default(), &mut rng);
        let mut overlay = Overlay::new(base);
        let patterns = PatternLibrary::new();
        let params = AccessibilityParams::default();
        for _ in 0..4 {
            let mut ctx = GenContext::new(&patterns, &mut rng, &params);
            generator.generate(&mut overlay, &mut ctx).unwrap();
        }

        let grid = overlay.compact();
        assert_eq!(grid.count(TerrainKind::Mountain), mountains);
        assert!(grid.count(TerrainKind::Sea) > 0);
    }
}
