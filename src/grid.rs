// src/grid.rs
//! Сетка гексов и данные клетки
//!
//! Сетка владеет клетками: генерация никогда не создаёт и не удаляет клетки,
//! а лишь заполняет поля, за которые отвечает (высота, влажность, биом,
//! речные рёбра, декорации). Хранение — плоский `Vec` в порядке row-major,
//! индекс вычисляется напрямую из offset-координат.

use crate::biome::Biome;
use crate::features::Feature;
use crate::hex::{HexCoord, HexDirection};

/// Нижняя граница высоты (дно океана).
pub const MIN_ELEVATION: i32 = -2;
/// Уровень моря: всё строго ниже — вода.
pub const SEA_LEVEL: i32 = 0;
/// Верхняя граница высоты (снежные пики).
pub const MAX_ELEVATION: i32 = 5;

/// Одна клетка карты.
#[derive(Debug, Clone)]
pub struct Cell {
    pub coord: HexCoord,
    /// Дискретная высота в диапазоне [`MIN_ELEVATION`, `MAX_ELEVATION`].
    pub elevation: i32,
    /// Влажность в диапазоне [0, 1].
    pub moisture: f32,
    pub biome: Biome,
    /// Битовая маска исходящих речных рёбер (бит на сторону гекса).
    pub river_edges: u8,
    /// Размещённые декорации (деревья, камни).
    pub features: Vec<Feature>,
}

impl Cell {
    fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            elevation: 0,
            moisture: 0.0,
            biome: Biome::Ocean,
            river_edges: 0,
            features: Vec::new(),
        }
    }

    /// Есть ли на клетке река.
    #[must_use]
    pub fn has_river(&self) -> bool {
        self.river_edges != 0
    }

    /// Клетка под водой (ниже уровня моря).
    #[must_use]
    pub fn is_underwater(&self) -> bool {
        self.elevation < SEA_LEVEL
    }

    pub fn set_river_edge(&mut self, dir: HexDirection) {
        self.river_edges |= dir.bit();
    }

    #[must_use]
    pub fn has_river_edge(&self, dir: HexDirection) -> bool {
        self.river_edges & dir.bit() != 0
    }

    /// Направления всех речных рёбер клетки.
    #[must_use]
    pub fn river_directions(&self) -> Vec<HexDirection> {
        HexDirection::ALL
            .iter()
            .copied()
            .filter(|d| self.has_river_edge(*d))
            .collect()
    }
}

/// Прямоугольная карта гексов в раскладке odd-r.
#[derive(Debug, Clone)]
pub struct HexGrid {
    pub width: u32,
    pub height: u32,
    cells: Vec<Cell>,
}

impl HexGrid {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                cells.push(Cell::new(HexCoord::from_offset(col as i32, row as i32)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Индекс клетки в плоском массиве, `None` за границей карты.
    #[must_use]
    pub fn index_of(&self, coord: HexCoord) -> Option<usize> {
        let (col, row) = coord.to_offset();
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some((row as u32 * self.width + col as u32) as usize)
    }

    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<&Cell> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut Cell> {
        self.index_of(coord).map(move |i| &mut self.cells[i])
    }

    /// Сосед клетки в указанном направлении, `None` за границей карты.
    #[must_use]
    pub fn neighbor(&self, coord: HexCoord, dir: HexDirection) -> Option<&Cell> {
        self.get(coord.neighbor(dir))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Количество клеток суши (на уровне моря и выше).
    #[must_use]
    pub fn land_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_underwater()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_creates_width_times_height_cells() {
        let grid = HexGrid::new(10, 8);
        assert_eq!(grid.cell_count(), 80);
        for cell in grid.cells() {
            assert_eq!(cell.coord.q + cell.coord.r + cell.coord.s, 0);
            assert!(!cell.has_river());
            assert!(cell.features.is_empty());
        }
    }

    #[test]
    fn lookup_outside_bounds_returns_none() {
        let grid = HexGrid::new(4, 4);
        assert!(grid.get(HexCoord::from_offset(-1, 0)).is_none());
        assert!(grid.get(HexCoord::from_offset(0, -1)).is_none());
        assert!(grid.get(HexCoord::from_offset(4, 0)).is_none());
        assert!(grid.get(HexCoord::from_offset(0, 4)).is_none());
        assert!(grid.get(HexCoord::from_offset(3, 3)).is_some());
    }

    #[test]
    fn neighbor_walk_stays_consistent_with_coords() {
        let grid = HexGrid::new(6, 6);
        let start = HexCoord::from_offset(2, 2);
        for dir in HexDirection::ALL {
            let by_grid = grid.neighbor(start, dir).map(|c| c.coord);
            let by_coord = grid.get(start.neighbor(dir)).map(|c| c.coord);
            assert_eq!(by_grid, by_coord);
        }
    }

    #[test]
    fn land_cell_count_follows_elevation() {
        let mut grid = HexGrid::new(3, 3);
        assert_eq!(grid.land_cell_count(), 9);
        for cell in grid.cells_mut().take(4) {
            cell.elevation = MIN_ELEVATION;
        }
        assert_eq!(grid.land_cell_count(), 5);
    }

    #[test]
    fn river_edge_mask_round_trips() {
        let mut grid = HexGrid::new(2, 2);
        let coord = HexCoord::from_offset(0, 0);
        let cell = grid.get_mut(coord).unwrap();
        cell.set_river_edge(HexDirection::SouthEast);
        assert!(cell.has_river());
        assert!(cell.has_river_edge(HexDirection::SouthEast));
        assert!(!cell.has_river_edge(HexDirection::East));
        assert_eq!(cell.river_directions(), vec![HexDirection::SouthEast]);
    }
}
