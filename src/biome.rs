// src/biome.rs
//! Классификация биомов
//!
//! Чистая функция (высота, влажность) → биом, без случайности и состояния:
//! её можно прогнать по всей решётке входов в тестах. Порядок решений:
//! вода → снег → горы → холодные нагорья → равнинные пояса по влажности.

use serde::{Deserialize, Serialize};

use crate::grid::{MIN_ELEVATION, SEA_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Coast,
    Plains,
    Forest,
    Hills,
    Mountains,
    Snow,
    Desert,
    Tundra,
    Jungle,
    Savanna,
    Taiga,
}

impl Biome {
    /// Определяет биом клетки.
    ///
    /// `mountain_level` — высота, на которой начинаются горы; всё, что выше,
    /// считается снежными пиками. Под водой биом зависит только от глубины:
    /// дно океана против прибрежной полосы.
    #[must_use]
    pub fn classify(elevation: i32, moisture: f32, mountain_level: i32) -> Self {
        if elevation < SEA_LEVEL {
            return if elevation <= MIN_ELEVATION {
                Biome::Ocean
            } else {
                Biome::Coast
            };
        }

        if elevation > mountain_level {
            return Biome::Snow;
        }
        if elevation == mountain_level {
            return Biome::Mountains;
        }

        // Холодные нагорья сразу под горным поясом
        if elevation == mountain_level - 1 {
            return if moisture < 0.25 {
                Biome::Tundra
            } else if moisture < 0.55 {
                Biome::Taiga
            } else {
                Biome::Hills
            };
        }

        // Равнины: пояса по возрастанию влажности.
        // На границе сухого пояса высота решает между холмами и саванной.
        if moisture < 0.15 {
            Biome::Desert
        } else if moisture < 0.35 {
            if elevation >= 2 {
                Biome::Hills
            } else {
                Biome::Savanna
            }
        } else if moisture < 0.55 {
            Biome::Plains
        } else if moisture < 0.75 {
            Biome::Forest
        } else {
            Biome::Jungle
        }
    }

    /// Вода (океан или побережье).
    #[must_use]
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::Coast)
    }

    /// Цвет для превью карты.
    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Biome::Ocean => [0, 64, 128],
            Biome::Coast => [70, 120, 170],
            Biome::Plains => [150, 200, 100],
            Biome::Forest => [60, 120, 60],
            Biome::Hills => [130, 150, 90],
            Biome::Mountains => [150, 150, 150],
            Biome::Snow => [235, 240, 250],
            Biome::Desert => [210, 190, 120],
            Biome::Tundra => [200, 220, 180],
            Biome::Jungle => [30, 100, 30],
            Biome::Savanna => [200, 180, 100],
            Biome::Taiga => [100, 150, 100],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MAX_ELEVATION;

    const MOUNTAIN_LEVEL: i32 = 4;

    #[test]
    fn classifier_is_total_over_the_input_grid() {
        for elevation in MIN_ELEVATION..=MAX_ELEVATION {
            for step in 0..=20 {
                let moisture = step as f32 / 20.0;
                // Не должно паниковать ни на одной достижимой паре
                let _ = Biome::classify(elevation, moisture, MOUNTAIN_LEVEL);
            }
        }
    }

    #[test]
    fn water_biomes_exactly_below_sea_level() {
        for elevation in MIN_ELEVATION..=MAX_ELEVATION {
            for step in 0..=10 {
                let moisture = step as f32 / 10.0;
                let biome = Biome::classify(elevation, moisture, MOUNTAIN_LEVEL);
                assert_eq!(
                    biome.is_water(),
                    elevation < SEA_LEVEL,
                    "elevation {elevation}, moisture {moisture} -> {biome:?}"
                );
            }
        }
    }

    #[test]
    fn depth_splits_ocean_from_coast() {
        assert_eq!(Biome::classify(-2, 0.5, MOUNTAIN_LEVEL), Biome::Ocean);
        assert_eq!(Biome::classify(-1, 0.5, MOUNTAIN_LEVEL), Biome::Coast);
    }

    #[test]
    fn peaks_are_snow_above_mountain_level() {
        assert_eq!(Biome::classify(5, 0.9, MOUNTAIN_LEVEL), Biome::Snow);
        assert_eq!(Biome::classify(4, 0.9, MOUNTAIN_LEVEL), Biome::Mountains);
    }

    #[test]
    fn elevation_breaks_the_dry_band_tie() {
        // Одинаковая влажность: низина — саванна, возвышенность — холмы
        assert_eq!(Biome::classify(0, 0.25, MOUNTAIN_LEVEL), Biome::Savanna);
        assert_eq!(Biome::classify(2, 0.25, MOUNTAIN_LEVEL), Biome::Hills);
    }

    #[test]
    fn every_variant_is_reachable() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for elevation in MIN_ELEVATION..=MAX_ELEVATION {
            for step in 0..=40 {
                let moisture = step as f32 / 40.0;
                seen.insert(Biome::classify(elevation, moisture, MOUNTAIN_LEVEL));
            }
        }
        assert_eq!(seen.len(), 12, "unreachable biomes: {seen:?}");
    }
}
