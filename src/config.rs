// src/config.rs
//! Конфигурация генерации карты
//!
//! Все параметры, управляющие процедурной генерацией гексагональной карты:
//! - стили карт (континенты, архипелаг и т.д.)
//! - параметры шума высот и влажности
//! - настройки рек и декораций
//!
//! Структуры поддерживают сериализацию в TOML для настройки через
//! конфигурационные файлы. Значения считаются проверенными на стороне
//! вызывающего кода: выход за допустимые диапазоны — ошибка программиста,
//! а не ситуация времени выполнения.

use serde::{Deserialize, Serialize};
use std::fs;

/// Стиль генерируемой карты
///
/// Определяет глобальную структуру: долю воды, изрезанность рельефа и
/// насыщенность реками.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum MapStyle {
    /// Несколько крупных массивов суши с морями между ними
    #[default]
    Continents,
    /// Много мелких островов, высокая доля воды
    Archipelago,
    /// Приподнятый материк: мало воды, широкий горный пояс
    Highland,
    /// Влажный низинный мир с густой речной сетью
    Wetland,
}

impl MapStyle {
    /// Настройки шума по умолчанию для данного стиля.
    #[must_use]
    pub fn default_noise(self) -> NoiseSettings {
        match self {
            MapStyle::Archipelago => NoiseSettings {
                frequency: 0.12,
                sea_level: 0.55,
                ..NoiseSettings::default()
            },
            MapStyle::Highland => NoiseSettings {
                sea_level: 0.3,
                mountain_level: 3,
                ..NoiseSettings::default()
            },
            MapStyle::Wetland => NoiseSettings {
                sea_level: 0.45,
                moisture_frequency: 0.18,
                ..NoiseSettings::default()
            },
            MapStyle::Continents => NoiseSettings::default(),
        }
    }

    /// Настройки рек по умолчанию для данного стиля.
    #[must_use]
    pub fn default_rivers(self) -> RiverSettings {
        match self {
            MapStyle::Wetland => RiverSettings {
                percentage: 0.16,
                ..RiverSettings::default()
            },
            _ => RiverSettings::default(),
        }
    }
}

/// Параметры шумовых полей высоты и влажности
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoiseSettings {
    /// Базовая частота шума высот (меньше — крупнее формы рельефа)
    #[serde(default = "default_frequency")]
    pub frequency: f32,

    /// Количество октав фрактального шума
    #[serde(default = "default_octaves")]
    pub octaves: u32,

    /// Затухание амплитуды между октавами
    #[serde(default = "default_persistence")]
    pub persistence: f32,

    /// Рост частоты между октавами
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,

    /// Частота шума влажности (независимое поле, обычно выше частоты высот)
    #[serde(default = "default_moisture_frequency")]
    pub moisture_frequency: f32,

    /// Порог уровня моря в сыром шуме [0, 1]: всё ниже — вода
    #[serde(default = "default_sea_level")]
    pub sea_level: f32,

    /// Высота, с которой начинаются горы (выше — снежные пики)
    #[serde(default = "default_mountain_level")]
    pub mountain_level: i32,
}

fn default_frequency() -> f32 {
    0.08
}
fn default_octaves() -> u32 {
    4
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_moisture_frequency() -> f32 {
    0.25
}
fn default_sea_level() -> f32 {
    0.4
}
fn default_mountain_level() -> i32 {
    4
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            frequency: 0.08,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            moisture_frequency: 0.25,
            sea_level: 0.4,
            mountain_level: 4,
        }
    }
}

/// Настройки речной сети
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiverSettings {
    /// Бюджет рек: доля клеток суши, занятых реками (мягкая граница,
    /// реки принимаются только целиком)
    #[serde(default = "default_river_percentage")]
    pub percentage: f32,

    /// Минимальный балл пригодности истока. Исторически подобранная
    /// константа: её изменение молча меняет вид готовых карт.
    #[serde(default = "default_fitness_floor")]
    pub fitness_floor: f32,
}

fn default_river_percentage() -> f32 {
    0.1
}
fn default_fitness_floor() -> f32 {
    0.25
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            percentage: 0.1,
            fitness_floor: 0.25,
        }
    }
}

/// Настройки рассадки декораций
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSettings {
    /// Глобальный множитель плотности (0.0 = без декораций)
    #[serde(default = "default_feature_density")]
    pub density: f32,
}

fn default_feature_density() -> f32 {
    1.0
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self { density: 1.0 }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация одного запроса генерации. Поддерживает загрузку из
/// TOML-файлов; между генерациями поля можно менять напрямую.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGenerationParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина карты в клетках (по умолчанию 48)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 36)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Стиль карты (по умолчанию `Continents`)
    #[serde(default)]
    pub style: MapStyle,

    /// Параметры шумовых полей
    #[serde(default)]
    pub noise: NoiseSettings,

    /// Параметры речной сети
    #[serde(default)]
    pub rivers: RiverSettings,

    /// Параметры декораций
    #[serde(default)]
    pub features: FeatureSettings,
}

fn default_width() -> u32 {
    48
}
fn default_height() -> u32 {
    36
}

impl MapGenerationParams {
    /// Параметры с пресетами выбранного стиля.
    #[must_use]
    pub fn for_style(style: MapStyle, seed: u64) -> Self {
        Self {
            seed,
            style,
            noise: style.default_noise(),
            rivers: style.default_rivers(),
            ..Self::default()
        }
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// width = 64
    /// height = 48
    /// style = "Archipelago"
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }
}

impl Default for MapGenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 48,
            height: 36,
            style: MapStyle::Continents,
            noise: NoiseSettings::default(),
            rivers: RiverSettings::default(),
            features: FeatureSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_with_only_seed_fills_defaults() {
        let params: MapGenerationParams = toml::from_str("seed = 7").unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.width, 48);
        assert_eq!(params.height, 36);
        assert_eq!(params.style, MapStyle::Continents);
        assert_eq!(params.noise, NoiseSettings::default());
        assert_eq!(params.rivers, RiverSettings::default());
    }

    #[test]
    fn style_presets_change_observable_defaults() {
        assert!(
            MapStyle::Archipelago.default_noise().sea_level
                > MapStyle::Continents.default_noise().sea_level
        );
        assert!(
            MapStyle::Wetland.default_rivers().percentage
                > MapStyle::Continents.default_rivers().percentage
        );
    }

    #[test]
    fn nested_sections_parse_from_toml() {
        let text = r#"
            seed = 1
            [noise]
            sea_level = 0.6
            octaves = 6
            [rivers]
            percentage = 0.2
        "#;
        let params: MapGenerationParams = toml::from_str(text).unwrap();
        assert_eq!(params.noise.sea_level, 0.6);
        assert_eq!(params.noise.octaves, 6);
        assert_eq!(params.rivers.percentage, 0.2);
        // Остальные поля секции получают значения по умолчанию
        assert_eq!(params.noise.persistence, 0.5);
    }
}
