// src/export.rs
//! Экспорт готовой карты в JSON
//!
//! Плоский снимок карты для внешних инструментов: шапка с сидом и размерами
//! плюс массив клеток. Формат не является сохранением игры — только выгрузка
//! результата генерации.

use serde::{Deserialize, Serialize};
use std::fs;

use crate::biome::Biome;
use crate::features::FeatureKind;
use crate::grid::HexGrid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellExport {
    pub q: i32,
    pub r: i32,
    pub elevation: i32,
    pub moisture: f32,
    pub biome: Biome,
    /// Имена направлений исходящих речных рёбер.
    pub river_edges: Vec<String>,
    pub trees: usize,
    pub rocks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapExport {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellExport>,
}

impl MapExport {
    #[must_use]
    pub fn from_grid(grid: &HexGrid, seed: u64) -> Self {
        let cells = grid
            .cells()
            .map(|cell| CellExport {
                q: cell.coord.q,
                r: cell.coord.r,
                elevation: cell.elevation,
                moisture: cell.moisture,
                biome: cell.biome,
                river_edges: cell
                    .river_directions()
                    .iter()
                    .map(|d| format!("{d:?}"))
                    .collect(),
                trees: cell
                    .features
                    .iter()
                    .filter(|f| f.kind == FeatureKind::Tree)
                    .count(),
                rocks: cell
                    .features
                    .iter()
                    .filter(|f| f.kind == FeatureKind::Rock)
                    .count(),
            })
            .collect();

        Self {
            seed,
            width: grid.width,
            height: grid.height,
            cells,
        }
    }

    /// Сохраняет выгрузку в JSON-файл.
    pub fn save_json(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{HexCoord, HexDirection};

    #[test]
    fn export_mirrors_grid_contents() {
        let mut grid = HexGrid::new(4, 3);
        let coord = HexCoord::from_offset(1, 1);
        {
            let cell = grid.get_mut(coord).unwrap();
            cell.elevation = 3;
            cell.moisture = 0.5;
            cell.biome = Biome::Taiga;
            cell.set_river_edge(HexDirection::SouthWest);
        }

        let export = MapExport::from_grid(&grid, 77);
        assert_eq!(export.seed, 77);
        assert_eq!(export.cells.len(), 12);

        let exported = export
            .cells
            .iter()
            .find(|c| c.q == coord.q && c.r == coord.r)
            .unwrap();
        assert_eq!(exported.elevation, 3);
        assert_eq!(exported.biome, Biome::Taiga);
        assert_eq!(exported.river_edges, vec!["SouthWest".to_string()]);
    }

    #[test]
    fn json_round_trip_preserves_the_map() {
        let grid = HexGrid::new(3, 3);
        let export = MapExport::from_grid(&grid, 5);
        let text = serde_json::to_string(&export).unwrap();
        let parsed: MapExport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.seed, export.seed);
        assert_eq!(parsed.cells.len(), export.cells.len());
    }
}
