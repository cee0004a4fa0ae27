// src/rivers.rs
//! Трассировка рек
//!
//! Конвейер одного прохода: отбор истоков → взвешенный выбор → спуск строго
//! вниз по склону → атомарная фиксация. Трасса копится во временном списке и
//! пишется в сетку только целиком, если набрала минимальную длину: частично
//! проложенных рек на карте не бывает. Каждая попытка тратит свой исток
//! безвозвратно, бюджет считается в целых трассах.
//!
//! Ровные рёбра (одинаковая высота) для рек непроходимы, хотя для движения
//! юнитов в игре они проходимы.

use std::collections::{HashMap, HashSet};

use log::info;
use petgraph::algo::{connected_components, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::RiverSettings;
use crate::grid::{HexGrid, MAX_ELEVATION, SEA_LEVEL};
use crate::hex::{HexCoord, HexDirection};

/// Минимальная длина реки в сегментах; короче — трасса выбрасывается целиком.
pub const MIN_RIVER_LENGTH: usize = 3;
/// Жёсткий предел шагов одной трассы.
const MAX_TRACE_STEPS: usize = 100;
/// Смещение сида выбора истоков относительно базового сида.
pub const RIVER_SOURCE_SEED_OFFSET: u64 = 7_100;
/// Смещение сида выбора направления течения.
pub const RIVER_FLOW_SEED_OFFSET: u64 = 7_200;

// Пороги весовых корзин отбора истоков. Исторические константы: вместе с
// порогом пригодности они определяют наблюдаемый вид карт.
const SCORE_MEDIUM: f32 = 0.5;
const SCORE_HIGH: f32 = 0.75;

#[derive(Debug, Clone, Copy)]
struct SourceCandidate {
    coord: HexCoord,
    score: f32,
}

/// Итог прохода трассировщика.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiverStats {
    /// Размер исходного пула истоков.
    pub source_pool: usize,
    /// Сколько попыток было потрачено.
    pub attempts: usize,
    /// Сколько трасс зафиксировано.
    pub committed: usize,
    /// Сколько клеток получили речное ребро.
    pub river_cells: usize,
}

/// Отбор кандидатов в истоки.
///
/// Подходит клетка суши без реки, не прилегающая ни к воде, ни к существующей
/// реке. Балл пригодности растёт с влажностью и высотой; всё ниже порога
/// отсеивается сразу.
fn collect_source_candidates(grid: &HexGrid, fitness_floor: f32) -> Vec<SourceCandidate> {
    let land_span = (MAX_ELEVATION - SEA_LEVEL) as f32;
    let mut candidates = Vec::new();

    for cell in grid.cells() {
        if cell.is_underwater() || cell.has_river() {
            continue;
        }
        let touches_water_or_river = HexDirection::ALL.iter().any(|&dir| {
            grid.neighbor(cell.coord, dir)
                .is_some_and(|n| n.is_underwater() || n.has_river())
        });
        if touches_water_or_river {
            continue;
        }

        let score = cell.moisture * (cell.elevation - SEA_LEVEL) as f32 / land_span;
        if score >= fitness_floor {
            candidates.push(SourceCandidate {
                coord: cell.coord,
                score,
            });
        }
    }
    candidates
}

fn selection_weight(score: f32) -> u32 {
    if score >= SCORE_HIGH {
        4
    } else if score >= SCORE_MEDIUM {
        2
    } else {
        1
    }
}

/// Рулеточный выбор истока по накопленным весам. Пул не должен быть пуст.
fn pick_weighted(pool: &[SourceCandidate], rng: &mut ChaCha8Rng) -> usize {
    let total: u32 = pool.iter().map(|c| selection_weight(c.score)).sum();
    let mut roll = rng.gen_range(0..total);
    for (i, candidate) in pool.iter().enumerate() {
        let weight = selection_weight(candidate.score);
        if roll < weight {
            return i;
        }
        roll -= weight;
    }
    pool.len() - 1
}

/// Одна трасса от истока до воды, слияния или тупика.
///
/// Возвращает накопленные сегменты (клетка, исходящее направление) или `None`
/// при повторном заходе в уже посещённую клетку той же трассы. Спуск строго
/// вниз гарантирует ацикличность, так что защита от цикла в норме не
/// срабатывает.
fn trace_river(
    grid: &HexGrid,
    source: HexCoord,
    rng: &mut ChaCha8Rng,
) -> Option<Vec<(HexCoord, HexDirection)>> {
    let mut visited: HashSet<HexCoord> = HashSet::new();
    let mut segments = Vec::new();
    let mut current = source;

    for _ in 0..MAX_TRACE_STEPS {
        visited.insert(current);
        let current_elevation = grid.get(current)?.elevation;

        // Кандидаты строго вниз; вес растёт с крутизной падения
        let mut candidates: Vec<(HexDirection, HexCoord, u32)> = Vec::new();
        for dir in HexDirection::ALL {
            if let Some(neighbor) = grid.neighbor(current, dir) {
                let drop = current_elevation - neighbor.elevation;
                if drop > 0 {
                    candidates.push((dir, neighbor.coord, (drop * drop) as u32));
                }
            }
        }
        if candidates.is_empty() {
            break; // тупик: хвост остаётся непомеченным (запруда)
        }

        let total: u32 = candidates.iter().map(|c| c.2).sum();
        let mut roll = rng.gen_range(0..total);
        let mut chosen = candidates[candidates.len() - 1];
        for candidate in &candidates {
            if roll < candidate.2 {
                chosen = *candidate;
                break;
            }
            roll -= candidate.2;
        }

        let (dir, next, _) = chosen;
        if visited.contains(&next) {
            return None; // цикл внутри трассы
        }
        segments.push((current, dir));

        let next_cell = grid.get(next)?;
        if next_cell.has_river() {
            break; // слияние: существующую реку повторно не помечаем
        }
        if next_cell.is_underwater() {
            break; // успешный выход к воде
        }
        current = next;
    }

    Some(segments)
}

/// Полный проход генерации рек по уже заполненной сетке.
///
/// Крутится, пока не исчерпан бюджет (`доля клеток суши`), пул истоков или
/// предел попыток — смотря что наступит раньше. Ноль подходящих истоков —
/// штатный случай: рек просто не будет.
pub fn generate_rivers(grid: &mut HexGrid, seed: u64, settings: &RiverSettings) -> RiverStats {
    let mut pool = collect_source_candidates(grid, settings.fitness_floor);
    let budget = (grid.land_cell_count() as f32 * settings.percentage).ceil() as usize;
    let attempt_cap = pool.len() * 2;

    let mut select_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(RIVER_SOURCE_SEED_OFFSET));
    let mut flow_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(RIVER_FLOW_SEED_OFFSET));

    let mut stats = RiverStats {
        source_pool: pool.len(),
        ..RiverStats::default()
    };

    while stats.river_cells < budget && !pool.is_empty() && stats.attempts < attempt_cap {
        stats.attempts += 1;
        let idx = pick_weighted(&pool, &mut select_rng);
        let source = pool.remove(idx);

        // Исток мог получить реку от уже зафиксированной трассы
        if grid.get(source.coord).map_or(true, |c| c.has_river()) {
            continue;
        }

        let Some(segments) = trace_river(grid, source.coord, &mut flow_rng) else {
            continue;
        };
        if segments.len() < MIN_RIVER_LENGTH {
            continue; // короткая трасса не оставляет следов и не тратит бюджет
        }

        for (coord, dir) in &segments {
            if let Some(cell) = grid.get_mut(*coord) {
                cell.set_river_edge(*dir);
            }
        }
        stats.river_cells += segments.len();
        stats.committed += 1;
    }

    info!(
        "реки: {} трасс, {} клеток (пул {}, попыток {})",
        stats.committed, stats.river_cells, stats.source_pool, stats.attempts
    );
    stats
}

/// Сводка речной сети карты.
#[derive(Debug, Clone, Copy)]
pub struct RiverNetworkSummary {
    pub river_cells: usize,
    /// Количество несвязанных речных систем.
    pub networks: usize,
    /// Длина самого долгого пробега в рёбрах.
    pub longest_run: usize,
}

/// Ориентированный граф течения по зафиксированным речным рёбрам.
#[must_use]
pub fn build_river_network(grid: &HexGrid) -> DiGraph<HexCoord, ()> {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<HexCoord, NodeIndex> = HashMap::new();

    for cell in grid.cells() {
        for dir in cell.river_directions() {
            let from = cell.coord;
            let to = from.neighbor(dir);
            let a = *nodes.entry(from).or_insert_with(|| graph.add_node(from));
            let b = *nodes.entry(to).or_insert_with(|| graph.add_node(to));
            graph.add_edge(a, b, ());
        }
    }
    graph
}

/// Считает сводку по графу течения.
#[must_use]
pub fn summarize_network(grid: &HexGrid) -> RiverNetworkSummary {
    let graph = build_river_network(grid);
    let river_cells = grid.cells().filter(|c| c.has_river()).count();
    let networks = connected_components(&graph);

    // Течение строго вниз — граф ацикличен, длину ищем динамикой по
    // топологическому порядку
    let longest_run = match toposort(&graph, None) {
        Ok(order) => {
            let mut dist = vec![0usize; graph.node_count()];
            let mut best = 0;
            for node in order.into_iter().rev() {
                let mut max_out = 0;
                for next in graph.neighbors(node) {
                    max_out = max_out.max(dist[next.index()] + 1);
                }
                dist[node.index()] = max_out;
                best = best.max(max_out);
            }
            best
        }
        Err(_) => 0,
    };

    RiverNetworkSummary {
        river_cells,
        networks,
        longest_run,
    }
}
