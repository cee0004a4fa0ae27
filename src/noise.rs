// src/noise.rs
//! Детерминированное многооктавное шумовое поле
//!
//! Обёртка над `FastNoiseLite` без встроенного фрактала: октавы складываются
//! вручную, чтобы частота, персистентность и лакунарность задавались явно на
//! каждую выборку. Результат — чистая функция от (сид, x, y, параметры),
//! поэтому поле безопасно использовать из фонового воркера.

use fastnoise_lite::{FastNoiseLite, NoiseType};

pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(seed as i32));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Частота 1.0: масштабирование координат делаем сами в sample_fractal
        noise.set_frequency(Some(1.0));
        Self { noise }
    }

    /// Одиночная выборка шума, значение в [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.noise.get_noise_2d(x, y).clamp(-1.0, 1.0)
    }

    /// Фрактальная (многооктавная) выборка, значение в [-1, 1].
    ///
    /// Каждая октава добавляет `amplitude * sample(x * f, y * f)`; амплитуда
    /// умножается на `persistence`, частота — на `lacunarity`. Сумма
    /// нормируется на накопленную амплитуду.
    #[must_use]
    pub fn sample_fractal(
        &self,
        x: f32,
        y: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
        base_frequency: f32,
    ) -> f32 {
        let mut amplitude = 1.0;
        let mut frequency = base_frequency;
        let mut sum = 0.0;
        let mut total_amplitude = 0.0;

        for _ in 0..octaves {
            sum += amplitude * self.sample(x * frequency, y * frequency);
            total_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if total_amplitude > 0.0 {
            sum / total_amplitude
        } else {
            0.0
        }
    }

    /// Фрактальная выборка, перенесённая в [0, 1].
    #[must_use]
    pub fn sample_fractal01(
        &self,
        x: f32,
        y: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
        base_frequency: f32,
    ) -> f32 {
        let v = self.sample_fractal(x, y, octaves, persistence, lacunarity, base_frequency);
        ((v + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
