// src/preview.rs
//! Превью карты в PNG
//!
//! Отладочная визуализация готовой карты: биомы — цветные диски по центрам
//! гексов, реки — линии между центрами соседей, декорации — точки. Плюс
//! отдельная серая карта высот. Это диагностика, а не игровой рендер.

use image::{ImageBuffer, Rgba};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::features::FeatureKind;
use crate::grid::{HexGrid, MAX_ELEVATION, MIN_ELEVATION};

type Canvas = ImageBuffer<Rgba<u8>, Vec<u8>>;

const SQRT3: f32 = 1.732_050_8;
const BACKGROUND: Rgba<u8> = Rgba([18, 18, 28, 255]);
const RIVER_COLOR: Rgba<u8> = Rgba([50, 110, 220, 255]);
const TREE_COLOR: Rgba<u8> = Rgba([20, 70, 25, 255]);
const ROCK_COLOR: Rgba<u8> = Rgba([90, 90, 95, 255]);

/// Центр клетки в пикселях (остроконечные гексы, раскладка odd-r).
fn cell_center(col: i32, row: i32, cell_size: f32) -> (f32, f32) {
    let x = cell_size * SQRT3 * (col as f32 + 0.5 * (row & 1) as f32) + cell_size;
    let y = cell_size * 1.5 * row as f32 + cell_size;
    (x, y)
}

/// Размер холста под сетку данного размера.
fn canvas_size(grid: &HexGrid, cell_size: f32) -> (u32, u32) {
    let width_px = cell_size * SQRT3 * (grid.width as f32 + 0.5) + cell_size * 2.0;
    let height_px = cell_size * 1.5 * grid.height as f32 + cell_size * 2.0;
    (width_px.ceil() as u32, height_px.ceil() as u32)
}

/// Рисует карту биомов с реками и декорациями.
#[must_use]
pub fn render_biome_map(grid: &HexGrid, cell_size: u32) -> Canvas {
    let size = cell_size as f32;
    let (width_px, height_px) = canvas_size(grid, size);
    let mut canvas = Canvas::from_pixel(width_px, height_px, BACKGROUND);

    // Диски биомов
    let radius = ((size * 0.85) as i32).max(1);
    for cell in grid.cells() {
        let (col, row) = cell.coord.to_offset();
        let (x, y) = cell_center(col, row, size);
        let [r, g, b] = cell.biome.to_rgb();
        draw_filled_circle_mut(&mut canvas, (x as i32, y as i32), radius, Rgba([r, g, b, 255]));
    }

    // Реки поверх биомов: линия от центра клетки к центру соседа
    for cell in grid.cells() {
        let (col, row) = cell.coord.to_offset();
        let from = cell_center(col, row, size);
        for dir in cell.river_directions() {
            let (ncol, nrow) = cell.coord.neighbor(dir).to_offset();
            let to = cell_center(ncol, nrow, size);
            draw_line_segment_mut(&mut canvas, from, to, RIVER_COLOR);
            draw_filled_circle_mut(
                &mut canvas,
                (from.0 as i32, from.1 as i32),
                (radius / 4).max(1),
                RIVER_COLOR,
            );
        }
    }

    // Декорации: мелкие точки со смещением от центра
    let dot = (radius / 5).max(1);
    for cell in grid.cells() {
        let (col, row) = cell.coord.to_offset();
        let (cx, cy) = cell_center(col, row, size);
        for feature in &cell.features {
            let x = cx + feature.offset.0 * size;
            let y = cy + feature.offset.1 * size;
            let color = match feature.kind {
                FeatureKind::Tree => TREE_COLOR,
                FeatureKind::Rock => ROCK_COLOR,
            };
            draw_filled_circle_mut(&mut canvas, (x as i32, y as i32), dot, color);
        }
    }

    canvas
}

/// Рисует серую карту высот.
#[must_use]
pub fn render_elevation_map(grid: &HexGrid, cell_size: u32) -> Canvas {
    let size = cell_size as f32;
    let (width_px, height_px) = canvas_size(grid, size);
    let mut canvas = Canvas::from_pixel(width_px, height_px, BACKGROUND);

    let radius = ((size * 0.85) as i32).max(1);
    let span = (MAX_ELEVATION - MIN_ELEVATION) as f32;
    for cell in grid.cells() {
        let (col, row) = cell.coord.to_offset();
        let (x, y) = cell_center(col, row, size);
        let shade = (((cell.elevation - MIN_ELEVATION) as f32 / span) * 255.0) as u8;
        draw_filled_circle_mut(
            &mut canvas,
            (x as i32, y as i32),
            radius,
            Rgba([shade, shade, shade, 255]),
        );
    }
    canvas
}

/// Сохраняет карту биомов в PNG.
pub fn save_biome_png(
    grid: &HexGrid,
    path: &str,
    cell_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    render_biome_map(grid, cell_size).save(path)?;
    Ok(())
}

/// Сохраняет карту высот в PNG.
pub fn save_elevation_png(
    grid: &HexGrid,
    path: &str,
    cell_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    render_elevation_map(grid, cell_size).save(path)?;
    Ok(())
}
