use std::process;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use region_generator::{
    export, AccessibilityGrid, GenerationConfig, PatternLibrary, RegionTemplate, RoadCostField, TerrainKind,
};

#[derive(Parser, Debug)]
#[command(name = "region_generator")]
#[command(about = "Generate tile-grid regions from layered terrain generators")]
struct Args {
    /// Region template (Elvenwood, Highlands, Lakeland, Scorchinglands)
    #[arg(short, long, default_value = "Elvenwood")]
    region: String,

    /// Map side length (rolled from the template if not specified)
    #[arg(short = 'S', long)]
    size: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with generation parameters
    #[arg(short, long)]
    config: Option<String>,

    /// Write the grid as JSON
    #[arg(long)]
    json: Option<String>,

    /// Write the grid as PNG
    #[arg(long)]
    png: Option<String>,

    /// Pixels per cell for PNG export
    #[arg(long, default_value = "8")]
    png_scale: u32,

    /// Write a text dump of the grid
    #[arg(long)]
    ascii: Option<String>,

    /// Print the road cost field
    #[arg(long)]
    costs: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> region_generator::Result<()> {
    let config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    println!("Generating region '{}' with seed: {}", args.region, seed);

    let template = RegionTemplate::named(&args.region)?;
    let region = template.build(&config, args.size, &mut rng)?;
    let roster: Vec<String> = region.roster.iter().map(|k| k.to_string()).collect();
    println!("Map size: {}x{} on {}", region.size, region.size, region.ground);
    println!("Generators: {}", roster.join(", "));

    let grid = region.generate(&mut rng)?;
    println!();
    print!("{}", grid);
    println!();

    for kind in TerrainKind::all_ground() {
        let count = grid.count(*kind);
        if count > 0 {
            println!("  {:10} {:>6}", kind.display_name(), count);
        }
    }

    if args.costs {
        let access = AccessibilityGrid::analyze_with_ground(&grid, &config.accessibility, region.ground);
        println!(
            "Accessibility: {} cells, fill rate {:.2}, usable: {}",
            access.available(),
            access.fill_rate(),
            access.is_usable()
        );
        let field = RoadCostField::build(&grid, access, &config.road_cost, &PatternLibrary::new(), &mut rng);
        println!("Road costs:");
        print!("{}", field);
    }

    if let Some(path) = &args.json {
        export::export_json(&grid, path)?;
        println!("Exported grid JSON to {}", path);
    }
    if let Some(path) = &args.png {
        export::export_png(&grid, path, args.png_scale)?;
        println!("Exported grid image to {}", path);
    }
    if let Some(path) = &args.ascii {
        export::export_ascii(&grid, region.name, seed, path)?;
        println!("Exported grid text to {}", path);
    }

    Ok(())
}
