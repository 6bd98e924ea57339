use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use region_generator::generators::{GeneratorKind, RiverGenerator};
use region_generator::{
    export, AccessibilityGrid, GenerationConfig, GeneratorLevel, Grid, IntRange, MapGenError,
    PatternLibrary, Pipeline, Point, RegionTemplate, RoadCostField, TerrainKind,
};

#[test]
fn every_template_generates_a_complete_grid() {
    let config = GenerationConfig::default();
    for (seed, template) in RegionTemplate::all().into_iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64 + 100);
        let region = template.build(&config, Some(30), &mut rng).unwrap();
        let grid = region.generate(&mut rng).unwrap();

        assert_eq!(grid.size(), 30);
        assert_eq!(grid.nodes().len(), 900);
        for (idx, node) in grid.iter().enumerate() {
            assert_eq!(node.id, idx);
            assert_eq!(node.location, Point::from_index(idx, 30));
            assert_ne!(node.kind, TerrainKind::None, "{} left an unwritten cell", template.name);
        }
    }
}

#[test]
fn generation_is_reproducible_for_a_seed() {
    let config = GenerationConfig::default();
    let template = RegionTemplate::named("Lakeland").unwrap();

    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let region = template.build(&config, None, &mut rng).unwrap();
        region.generate(&mut rng).unwrap()
    };

    assert_eq!(run(9), run(9));
}

#[test]
fn committed_river_is_one_connected_channel() {
    let mut base = Grid::new(20, TerrainKind::Plain);
    base.set_kind(Point::new(5, 5), TerrainKind::Mountain);
    base.set_kind(Point::new(5, 15), TerrainKind::Sea);

    let mut pipeline = Pipeline::new();
    pipeline.add(Box::new(RiverGenerator::with_ranges(IntRange::fixed(10), IntRange::fixed(0), 3)));
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let grid = pipeline.generate(base, &mut rng).unwrap();

    let river: Vec<Point> = grid
        .iter()
        .filter(|n| n.kind == TerrainKind::River)
        .map(|n| n.location)
        .collect();
    assert_eq!(river.len(), 11);
    assert_eq!(grid.kind(Point::new(5, 5)), TerrainKind::Mountain);
    assert_eq!(grid.kind(Point::new(5, 15)), TerrainKind::Sea);
    assert!(river.iter().any(|p| p.is_adjacent(Point::new(5, 5))));
    assert!(river.iter().any(|p| p.is_adjacent(Point::new(5, 15))));

    // Flood the river cells from one end; every cell must be reached
    let mut seen = vec![river[0]];
    let mut frontier = vec![river[0]];
    while let Some(current) = frontier.pop() {
        for next in current.neighbors() {
            if river.contains(&next) && !seen.contains(&next) {
                seen.push(next);
                frontier.push(next);
            }
        }
    }
    assert_eq!(seen.len(), river.len());
}

#[test]
fn cancelled_pipeline_reports_the_level() {
    let config = GenerationConfig::default();
    let flag = Arc::new(AtomicBool::new(true));
    let mut pipeline = Pipeline::new().with_cancel_flag(flag);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    pipeline.add(GeneratorKind::Mountain.build(&config, &mut rng));

    let err = pipeline.generate(Grid::new(20, TerrainKind::Plain), &mut rng).unwrap_err();
    assert!(matches!(err, MapGenError::Cancelled(GeneratorLevel::Ground)));
}

#[test]
fn persisted_grid_round_trips() {
    let config = GenerationConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let region = RegionTemplate::named("Highlands")
        .unwrap()
        .build(&config, Some(32), &mut rng)
        .unwrap();
    let grid = region.generate(&mut rng).unwrap();

    let text = export::to_json(&grid).unwrap();
    assert_eq!(export::from_json(&text).unwrap(), grid);
}

#[test]
fn road_costs_follow_the_terrain() {
    let mut config = GenerationConfig::default();
    config.road_cost.noise = 3;
    let mut grid = Grid::new(30, TerrainKind::Plain);
    grid.fill_square(TerrainKind::Sea, 2, Point::new(25, 25));
    grid.set_kind(Point::new(10, 10), TerrainKind::CityNode);
    grid.set_kind(Point::new(15, 15), TerrainKind::Road);

    let access = AccessibilityGrid::analyze(&grid, &config.accessibility);
    assert!(access.is_usable());
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let field = RoadCostField::build(&grid, access, &config.road_cost, &PatternLibrary::new(), &mut rng);

    assert!(field.is_refused(Point::new(25, 25)));
    assert!(field.is_refused(Point::new(10, 10)));
    assert!(!field.is_refused(Point::new(15, 15)));
    // Road reuse bonus outweighs the jitter
    assert!(field.cost(Point::new(15, 15)) < field.cost(Point::new(5, 5)));
    // Border penalty outweighs the jitter
    assert!(field.cost(Point::new(0, 14)) > field.cost(Point::new(14, 14)));
}
