//! Grid persistence and renderings
//!
//! The JSON shape is the hand-off to the persistence layer:
//! `{"nodes": [{"id", "location": {"x", "y"}, "kind"}], "size": N}`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};
use crate::grid::{Grid, Node};
use crate::terrain::TerrainKind;

#[derive(Serialize)]
struct GridDocument<'a> {
    nodes: &'a [Node],
    size: usize,
}

#[derive(Deserialize)]
struct OwnedGridDocument {
    nodes: Vec<Node>,
    size: usize,
}

pub fn to_json(grid: &Grid) -> Result<String> {
    let doc = GridDocument {
        nodes: grid.nodes(),
        size: grid.size(),
    };
    Ok(serde_json::to_string(&doc)?)
}

pub fn from_json(text: &str) -> Result<Grid> {
    let doc: OwnedGridDocument = serde_json::from_str(text)?;
    let count = doc.nodes.len();
    Grid::from_nodes(doc.size, doc.nodes).ok_or_else(|| {
        MapGenError::InvalidConfig(format!(
            "grid document with {} nodes does not lay out a {}x{} map",
            count, doc.size, doc.size
        ))
    })
}

pub fn export_json<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(to_json(grid)?.as_bytes())?;
    Ok(())
}

/// Write one `scale`×`scale` block of terrain color per cell.
pub fn export_png<P: AsRef<Path>>(grid: &Grid, path: P, scale: u32) -> Result<()> {
    let scale = scale.max(1);
    let side = grid.size() as u32 * scale;
    let mut img: RgbImage = ImageBuffer::new(side, side);

    for node in grid.iter() {
        let color = node.kind.color();
        let px = node.location.x as u32 * scale;
        let py = node.location.y as u32 * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(px + dx, py + dy, Rgb(color));
            }
        }
    }

    img.save(path)?;
    Ok(())
}

/// Text dump: header, glyph map, then per-terrain counts.
pub fn export_ascii<P: AsRef<Path>>(grid: &Grid, region: &str, seed: u64, path: P) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "=== REGION MAP ===")?;
    writeln!(file, "Region: {}", region)?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Size: {}x{}", grid.size(), grid.size())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", grid)?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    let total = grid.nodes().len().max(1);
    let mut counts: BTreeMap<TerrainKind, usize> = BTreeMap::new();
    for node in grid.iter() {
        *counts.entry(node.kind).or_insert(0) += 1;
    }
    for (kind, count) in counts {
        let pct = 100.0 * count as f64 / total as f64;
        writeln!(file, "  {:10} {} {:>6} ({:>5.1}%)", kind.display_name(), kind.glyph(), count, pct)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn sample() -> Grid {
        let mut grid = Grid::new(4, TerrainKind::Plain);
        grid.set_kind(Point::new(1, 2), TerrainKind::River);
        grid.set_kind(Point::new(3, 0), TerrainKind::Sea);
        grid
    }

    #[test]
    fn test_json_shape() {
        let value: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(value["size"], 4);
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 16);
        assert_eq!(nodes[9]["id"], 9);
        assert_eq!(nodes[9]["location"]["x"], 1);
        assert_eq!(nodes[9]["location"]["y"], 2);
        assert_eq!(nodes[9]["kind"], "River");
    }

    #[test]
    fn test_json_restores_grid() {
        let grid = sample();
        let restored = from_json(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_json_rejects_wrong_node_count() {
        let text = to_json(&sample()).unwrap().replace("\"size\":4", "\"size\":5");
        assert!(matches!(from_json(&text), Err(MapGenError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_rejects_overflowing_size() {
        let result = from_json(r#"{"nodes":[],"size":4294967296}"#);
        assert!(matches!(result, Err(MapGenError::InvalidConfig(_))));
    }

    #[test]
    fn test_files_are_written() {
        let dir = std::env::temp_dir().join(format!("region_export_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let grid = sample();

        let png = dir.join("map.png");
        export_png(&grid, &png, 3).unwrap();
        let img = image::open(&png).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (12, 12));
        assert_eq!(img.get_pixel(4, 7).0, TerrainKind::River.color());

        let txt = dir.join("map.txt");
        export_ascii(&grid, "Elvenwood", 7, &txt).unwrap();
        let text = std::fs::read_to_string(&txt).unwrap();
        assert!(text.starts_with("=== REGION MAP ==="));
        assert!(text.contains("Seed: 7"));
        assert!(text.contains("River"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
