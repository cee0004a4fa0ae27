// src/features.rs
//! Рассадка декораций по готовому рельефу
//!
//! Для каждой клетки суши без реки берётся пара шансов (деревья, камни) по
//! биому, затем независимые броски Бернулли. Сид отделён от сидов рельефа и
//! рек, поэтому смена плотности декораций не перекраивает карту. Перед
//! заполнением прежние декорации всегда очищаются: повторный запуск с тем же
//! сидом даёт тот же результат.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::config::FeatureSettings;
use crate::grid::HexGrid;

/// Смещение сида рассадки декораций относительно базового сида.
pub const FEATURE_SEED_OFFSET: u64 = 2_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Tree,
    Rock,
}

/// Одна размещённая декорация.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureKind,
    /// Плоское смещение от центра клетки в долях радиуса гекса.
    pub offset: (f32, f32),
    /// Поворот вокруг вертикали в радианах.
    pub rotation: f32,
    /// Масштаб (1.0 — номинальный размер).
    pub scale: f32,
}

/// Шансы появления (деревья, камни) для биома.
fn spawn_chances(biome: Biome) -> (f32, f32) {
    match biome {
        Biome::Ocean | Biome::Coast => (0.0, 0.0),
        Biome::Plains => (0.15, 0.05),
        Biome::Forest => (0.6, 0.1),
        Biome::Hills => (0.2, 0.3),
        Biome::Mountains => (0.05, 0.5),
        Biome::Snow => (0.0, 0.3),
        Biome::Desert => (0.02, 0.25),
        Biome::Tundra => (0.05, 0.2),
        Biome::Jungle => (0.8, 0.05),
        Biome::Savanna => (0.1, 0.1),
        Biome::Taiga => (0.5, 0.15),
    }
}

fn roll(rng: &mut ChaCha8Rng, chance: f32) -> bool {
    if chance <= 0.0 {
        return false;
    }
    rng.gen_bool(f64::from(chance.min(1.0)))
}

fn random_feature(kind: FeatureKind, rng: &mut ChaCha8Rng) -> Feature {
    Feature {
        kind,
        offset: (rng.gen_range(-0.35..0.35), rng.gen_range(-0.35..0.35)),
        rotation: rng.gen_range(0.0..TAU),
        scale: rng.gen_range(0.8..1.25),
    }
}

/// Проход рассадки: очищает старые декорации и заполняет новые.
///
/// Возвращает количество размещённых декораций.
pub fn scatter_features(grid: &mut HexGrid, seed: u64, settings: &FeatureSettings) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(FEATURE_SEED_OFFSET));
    let density = settings.density;
    let mut placed = 0;

    for cell in grid.cells_mut() {
        cell.features.clear();
        if cell.is_underwater() || cell.has_river() {
            continue;
        }

        let (tree_chance, rock_chance) = spawn_chances(cell.biome);
        if roll(&mut rng, tree_chance * density) {
            for _ in 0..rng.gen_range(1..=3) {
                cell.features.push(random_feature(FeatureKind::Tree, &mut rng));
                placed += 1;
            }
        }
        if roll(&mut rng, rock_chance * density) {
            for _ in 0..rng.gen_range(1..=2) {
                cell.features.push(random_feature(FeatureKind::Rock, &mut rng));
                placed += 1;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{HexCoord, HexDirection};

    fn forest_grid(width: u32, height: u32) -> HexGrid {
        let mut grid = HexGrid::new(width, height);
        for cell in grid.cells_mut() {
            cell.elevation = 1;
            cell.moisture = 0.6;
            cell.biome = Biome::Forest;
        }
        grid
    }

    #[test]
    fn water_and_river_cells_stay_empty() {
        let mut grid = forest_grid(10, 10);
        grid.get_mut(HexCoord::from_offset(2, 2)).unwrap().elevation = -1;
        grid.get_mut(HexCoord::from_offset(2, 2)).unwrap().biome = Biome::Coast;
        grid.get_mut(HexCoord::from_offset(5, 5))
            .unwrap()
            .set_river_edge(HexDirection::East);

        scatter_features(&mut grid, 3, &FeatureSettings::default());
        assert!(grid
            .get(HexCoord::from_offset(2, 2))
            .unwrap()
            .features
            .is_empty());
        assert!(grid
            .get(HexCoord::from_offset(5, 5))
            .unwrap()
            .features
            .is_empty());
    }

    #[test]
    fn repeat_scatter_with_same_seed_is_idempotent() {
        let mut grid = forest_grid(12, 12);
        scatter_features(&mut grid, 42, &FeatureSettings::default());
        let first: Vec<Vec<Feature>> = grid.cells().map(|c| c.features.clone()).collect();

        scatter_features(&mut grid, 42, &FeatureSettings::default());
        let second: Vec<Vec<Feature>> = grid.cells().map(|c| c.features.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn group_sizes_and_jitter_stay_in_bounds() {
        let mut grid = forest_grid(20, 20);
        let placed = scatter_features(&mut grid, 7, &FeatureSettings::default());
        assert!(placed > 0, "a 400-cell forest produced nothing");

        for cell in grid.cells() {
            let trees = cell
                .features
                .iter()
                .filter(|f| f.kind == FeatureKind::Tree)
                .count();
            let rocks = cell
                .features
                .iter()
                .filter(|f| f.kind == FeatureKind::Rock)
                .count();
            assert!(trees <= 3);
            assert!(rocks <= 2);
            for feature in &cell.features {
                assert!((-0.35..0.35).contains(&feature.offset.0));
                assert!((-0.35..0.35).contains(&feature.offset.1));
                assert!((0.0..TAU).contains(&feature.rotation));
                assert!((0.8..1.25).contains(&feature.scale));
            }
        }
    }

    #[test]
    fn zero_density_clears_previous_features() {
        let mut grid = forest_grid(10, 10);
        scatter_features(&mut grid, 1, &FeatureSettings::default());
        let placed = scatter_features(&mut grid, 1, &FeatureSettings { density: 0.0 });
        assert_eq!(placed, 0);
        assert!(grid.cells().all(|c| c.features.is_empty()));
    }
}
