// src/generator.rs
//! Оркестратор генерации: синхронный и фоновый пути
//!
//! Обе точки входа проходят один и тот же конвейер стадий:
//! высоты → влажность → биомы → (применение) → реки → декорации.
//! Поклеточная выборка рельефа — чистая функция от сида и координат, поэтому
//! её можно увозить в фоновый воркер. Реки и декорации ходят по графу соседей
//! уже заполненной сетки и мутируют перекрёстное состояние, поэтому
//! выполняются только на потоке-владельце сетки.
//!
//! Через границу воркера не проходит ни одной ссылки на живую сетку: внутрь
//! уходят копии примитивов (сид, размеры, настройки шума), наружу — плоский
//! массив выборок по каналу. Это и избавляет от блокировок.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use log::{info, warn};

use crate::biome::Biome;
use crate::config::MapGenerationParams;
use crate::features::scatter_features;
use crate::grid::HexGrid;
use crate::rivers::generate_rivers;
use crate::terrain::{CellSample, TerrainSampler, compute_terrain_samples};

/// Наблюдательный колбэк прогресса: имя фазы и доля готовности.
///
/// Фазы: `"terrain"`, `"moisture"`, `"biomes"`, `"rivers"`, `"features"`,
/// `"complete"`. Никакой управляющей семантики не несёт.
pub type ProgressCallback = Box<dyn FnMut(&str, f32)>;

/// Тайминги завершённой фоновой генерации.
#[derive(Debug, Clone, Copy)]
pub struct GenerationResult {
    /// Время вычисления рельефа в воркере, миллисекунды.
    pub worker_time_ms: f32,
    /// Время рассадки декораций на потоке-владельце, миллисекунды.
    pub feature_time_ms: f32,
}

/// Что воркер возвращает на основной поток: только данные, без ссылок.
struct WorkerOutput {
    samples: Vec<CellSample>,
    elapsed_ms: f32,
}

/// Сессия одной фоновой генерации. Живёт от запуска до применения или отмены.
struct AsyncSession {
    seed: u64,
    width: u32,
    height: u32,
    rx: Receiver<WorkerOutput>,
    handle: JoinHandle<()>,
    output: Option<WorkerOutput>,
}

/// Генератор карты. Параметры между генерациями можно менять напрямую.
pub struct MapGenerator {
    pub params: MapGenerationParams,
    session: Option<AsyncSession>,
    on_progress: Option<ProgressCallback>,
}

impl MapGenerator {
    #[must_use]
    pub fn new(params: MapGenerationParams) -> Self {
        Self {
            params,
            session: None,
            on_progress: None,
        }
    }

    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.on_progress = Some(callback);
    }

    fn report(&mut self, phase: &str, fraction: f32) {
        if let Some(callback) = self.on_progress.as_mut() {
            callback(phase, fraction);
        }
    }

    /// Идёт ли сейчас фоновая генерация.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.session.is_some()
    }

    /// Синхронная генерация: блокирует до полной готовности карты.
    pub fn generate(&mut self, grid: &mut HexGrid, seed: u64) {
        let sampler = TerrainSampler::new(seed, &self.params.noise);

        for cell in grid.cells_mut() {
            let (col, row) = cell.coord.to_offset();
            cell.elevation = sampler.elevation(col, row);
        }
        self.report("terrain", 0.2);

        for cell in grid.cells_mut() {
            let (col, row) = cell.coord.to_offset();
            cell.moisture = sampler.moisture(col, row);
        }
        self.report("moisture", 0.4);

        let mountain_level = self.params.noise.mountain_level;
        for cell in grid.cells_mut() {
            cell.biome = Biome::classify(cell.elevation, cell.moisture, mountain_level);
        }
        self.report("biomes", 0.55);

        self.run_graph_stages(grid, seed);
        self.report("complete", 1.0);
    }

    /// Стадии, требующие обхода соседей: реки и декорации.
    ///
    /// Возвращает время рассадки декораций в миллисекундах.
    fn run_graph_stages(&mut self, grid: &mut HexGrid, seed: u64) -> f32 {
        for cell in grid.cells_mut() {
            cell.river_edges = 0;
        }
        generate_rivers(grid, seed, &self.params.rivers);
        self.report("rivers", 0.8);

        let start = Instant::now();
        scatter_features(grid, seed, &self.params.features);
        let feature_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.report("features", 0.95);
        feature_time_ms
    }

    /// Запускает фоновую генерацию для сетки данного размера.
    ///
    /// Пока сессия в полёте, повторный запрос отвергается с предупреждением:
    /// текущая сессия продолжается как ни в чём не бывало.
    pub fn generate_async(&mut self, grid: &HexGrid, seed: u64) {
        if self.session.is_some() {
            warn!("генерация уже выполняется, новый запрос проигнорирован");
            return;
        }

        let width = grid.width;
        let height = grid.height;
        let noise = self.params.noise.clone();
        let (tx, rx) = bounded(1);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let samples = compute_terrain_samples(seed, width, height, &noise);
            let elapsed_ms = start.elapsed().as_secs_f32() * 1000.0;
            // Получателя может уже не быть — тогда результат просто пропадает
            let _ = tx.send(WorkerOutput {
                samples,
                elapsed_ms,
            });
        });

        self.session = Some(AsyncSession {
            seed,
            width,
            height,
            rx,
            handle,
            output: None,
        });
        info!("фоновая генерация запущена: {width}x{height}, сид {seed}");
    }

    /// Неблокирующий опрос готовности воркера (раз в кадр/тик).
    pub fn is_generation_complete(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.output.is_none() {
            match session.rx.try_recv() {
                Ok(output) => session.output = Some(output),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }
        }
        session.output.is_some()
    }

    /// Дожидается воркера, применяет результат к сетке и догоняет стадии
    /// рек и декораций. Вызывается только с потока-владельца сетки.
    pub fn finish_async_generation(&mut self, grid: &mut HexGrid) -> Option<GenerationResult> {
        let Some(mut session) = self.session.take() else {
            warn!("нет активной сессии генерации");
            return None;
        };

        let output = match session.output.take() {
            Some(output) => output,
            None => match session.rx.recv() {
                Ok(output) => output,
                Err(_) => {
                    warn!("воркер завершился без результата");
                    let _ = session.handle.join();
                    return None;
                }
            },
        };
        let _ = session.handle.join();

        if grid.width != session.width || grid.height != session.height {
            warn!("размер сетки не совпадает с запросом, результат отброшен");
            return None;
        }

        for (cell, sample) in grid.cells_mut().zip(output.samples.iter()) {
            cell.elevation = sample.elevation;
            cell.moisture = sample.moisture;
            cell.biome = sample.biome;
        }
        self.report("terrain", 0.2);
        self.report("moisture", 0.4);
        self.report("biomes", 0.55);

        let feature_time_ms = self.run_graph_stages(grid, session.seed);
        self.report("complete", 1.0);

        Some(GenerationResult {
            worker_time_ms: output.elapsed_ms,
            feature_time_ms,
        })
    }

    /// Отменяет сессию: дожидается воркера и выбрасывает результат.
    ///
    /// Воркер нельзя прервать посреди вычисления, поэтому отмена
    /// кооперативная — ждём и не применяем. Сетка остаётся нетронутой.
    pub fn cancel_generation(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if session.output.is_none() {
            let _ = session.rx.recv();
        }
        let _ = session.handle.join();
        info!("генерация отменена, результат отброшен");
    }
}
