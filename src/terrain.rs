// src/terrain.rs
//! Поля высоты и влажности, поклеточная выборка рельефа
//!
//! Высота получается из фрактального шума и квантуется в дискретные уровни:
//! соседние клетки часто делят один уровень, что существенно для биомов и
//! для отбраковки "плоских" рёбер при трассировке рек. Влажность — второе,
//! независимо посеянное поле со своей частотой, чтобы разнообразие биомов
//! не было жёстко привязано к высоте.

use crate::biome::Biome;
use crate::config::NoiseSettings;
use crate::grid::{MAX_ELEVATION, MIN_ELEVATION, SEA_LEVEL};
use crate::noise::NoiseField;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Смещение сида поля влажности относительно базового сида.
pub const MOISTURE_SEED_OFFSET: u64 = 500;

/// Результат выборки одной клетки: всё, что воркер возвращает на основной поток.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    pub elevation: i32,
    pub moisture: f32,
    pub biome: Biome,
}

/// Квантует сырой шум [0, 1] в дискретный уровень высоты.
///
/// Ниже порога моря диапазон [0, sea_level) линейно ложится на подводные
/// уровни [`MIN_ELEVATION`, -1], выше — [sea_level, 1] на сушу
/// [0, `MAX_ELEVATION`]. Ступенчатая функция, не непрерывная.
#[must_use]
pub fn classify_elevation(raw: f32, sea_level: f32) -> i32 {
    if raw < sea_level {
        let band = raw / sea_level;
        let depth_levels = (SEA_LEVEL - MIN_ELEVATION) as f32;
        (MIN_ELEVATION + (band * depth_levels) as i32).min(SEA_LEVEL - 1)
    } else {
        let span = 1.0 - sea_level;
        let band = if span > 0.0 {
            (raw - sea_level) / span
        } else {
            1.0
        };
        ((band * (MAX_ELEVATION + 1) as f32) as i32).min(MAX_ELEVATION)
    }
}

/// Поклеточная выборка рельефа: два шумовых поля плюс пороги из настроек.
///
/// Чистая функция от (сид, col, row): один и тот же сэмплер используется и
/// синхронным путём, и фоновым воркером, у которого нет ссылки на сетку.
pub struct TerrainSampler {
    elevation_noise: NoiseField,
    moisture_noise: NoiseField,
    settings: NoiseSettings,
}

impl TerrainSampler {
    #[must_use]
    pub fn new(seed: u64, settings: &NoiseSettings) -> Self {
        Self {
            elevation_noise: NoiseField::new(seed),
            moisture_noise: NoiseField::new(seed.wrapping_add(MOISTURE_SEED_OFFSET)),
            settings: settings.clone(),
        }
    }

    /// Сырой шум высоты в [0, 1].
    #[must_use]
    pub fn raw_elevation(&self, col: i32, row: i32) -> f32 {
        self.elevation_noise.sample_fractal01(
            col as f32,
            row as f32,
            self.settings.octaves,
            self.settings.persistence,
            self.settings.lacunarity,
            self.settings.frequency,
        )
    }

    /// Дискретный уровень высоты клетки.
    #[must_use]
    pub fn elevation(&self, col: i32, row: i32) -> i32 {
        classify_elevation(self.raw_elevation(col, row), self.settings.sea_level)
    }

    /// Влажность клетки в [0, 1].
    #[must_use]
    pub fn moisture(&self, col: i32, row: i32) -> f32 {
        self.moisture_noise.sample_fractal01(
            col as f32,
            row as f32,
            self.settings.octaves,
            self.settings.persistence,
            self.settings.lacunarity,
            self.settings.moisture_frequency,
        )
    }

    /// Полная выборка клетки: высота, влажность, биом.
    #[must_use]
    pub fn sample(&self, col: i32, row: i32) -> CellSample {
        let elevation = self.elevation(col, row);
        let moisture = self.moisture(col, row);
        CellSample {
            elevation,
            moisture,
            biome: Biome::classify(elevation, moisture, self.settings.mountain_level),
        }
    }
}

/// Считает выборки для всей карты в порядке row-major.
///
/// Именно эту функцию выполняет фоновый воркер: на входе только копии
/// примитивов, на выходе плоский массив — никаких ссылок на живую сетку.
#[must_use]
pub fn compute_terrain_samples(
    seed: u64,
    width: u32,
    height: u32,
    settings: &NoiseSettings,
) -> Vec<CellSample> {
    let sampler = TerrainSampler::new(seed, settings);

    #[cfg(feature = "parallel")]
    {
        (0..width * height)
            .into_par_iter()
            .map(|i| sampler.sample((i % width) as i32, (i / width) as i32))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..width * height)
            .map(|i| sampler.sample((i % width) as i32, (i / width) as i32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_bands_split_at_sea_level() {
        let sea = 0.4;
        assert_eq!(classify_elevation(0.0, sea), MIN_ELEVATION);
        assert_eq!(classify_elevation(0.39, sea), SEA_LEVEL - 1);
        assert_eq!(classify_elevation(0.4, sea), 0);
        assert_eq!(classify_elevation(1.0, sea), MAX_ELEVATION);
    }

    #[test]
    fn elevation_is_monotonic_in_raw_noise() {
        let sea = 0.4;
        let mut prev = MIN_ELEVATION;
        for step in 0..=100 {
            let raw = step as f32 / 100.0;
            let level = classify_elevation(raw, sea);
            assert!(level >= prev, "raw {raw} dropped from {prev} to {level}");
            assert!((MIN_ELEVATION..=MAX_ELEVATION).contains(&level));
            prev = level;
        }
    }

    #[test]
    fn sampler_is_deterministic_per_seed() {
        let settings = NoiseSettings::default();
        let a = TerrainSampler::new(42, &settings);
        let b = TerrainSampler::new(42, &settings);
        for row in 0..10 {
            for col in 0..10 {
                assert_eq!(a.sample(col, row), b.sample(col, row));
            }
        }
    }

    #[test]
    fn moisture_field_is_independent_of_elevation_field() {
        let settings = NoiseSettings::default();
        let sampler = TerrainSampler::new(11, &settings);
        // Поля посеяны разными сидами: где-то значения обязаны разойтись
        let diverged = (0..100).any(|i| {
            let col = i % 10;
            let row = i / 10;
            (sampler.raw_elevation(col, row) - sampler.moisture(col, row)).abs() > 1e-6
        });
        assert!(diverged);
    }

    #[test]
    fn bulk_samples_match_per_cell_sampling() {
        let settings = NoiseSettings::default();
        let samples = compute_terrain_samples(5, 6, 4, &settings);
        let sampler = TerrainSampler::new(5, &settings);
        assert_eq!(samples.len(), 24);
        for (i, sample) in samples.iter().enumerate() {
            let col = (i % 6) as i32;
            let row = (i / 6) as i32;
            assert_eq!(*sample, sampler.sample(col, row));
        }
    }
}
