// src/hex.rs
//! Кубические координаты гексагональной сетки
//!
//! Каждая клетка адресуется тройкой (q, r, s) с инвариантом q + r + s = 0.
//! Для хранения в плоском массиве используется offset-раскладка "odd-r"
//! (остроконечные гексы, нечётные ряды сдвинуты вправо) — прямой индекс
//! row * width + col вместо словарей со строковыми ключами.

/// Кубическая координата клетки. Инвариант: q + r + s = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl HexCoord {
    /// Создаёт координату из осевой пары (q, r); s выводится из инварианта.
    #[must_use]
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Преобразует offset-координаты (col, row) в кубические (odd-r).
    #[must_use]
    pub fn from_offset(col: i32, row: i32) -> Self {
        let q = col - (row - (row & 1)) / 2;
        Self::new(q, row)
    }

    /// Обратное преобразование в offset-координаты (col, row).
    #[must_use]
    pub fn to_offset(self) -> (i32, i32) {
        let col = self.q + (self.r - (self.r & 1)) / 2;
        (col, self.r)
    }

    /// Сосед в указанном направлении.
    #[must_use]
    pub fn neighbor(self, dir: HexDirection) -> Self {
        let (dq, dr) = dir.delta();
        Self::new(self.q + dq, self.r + dr)
    }
}

/// Шесть сторон гекса (остроконечная ориентация).
///
/// Порядок фиксирован: индекс направления используется как номер бита
/// в маске речных рёбер клетки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HexDirection {
    East = 0,
    NorthEast = 1,
    NorthWest = 2,
    West = 3,
    SouthWest = 4,
    SouthEast = 5,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Смещение (dq, dr) в кубических координатах.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    /// Противоположная сторона (сдвиг на 3 по кругу).
    #[must_use]
    pub fn opposite(self) -> Self {
        Self::ALL[(self as usize + 3) % 6]
    }

    /// Номер бита в маске речных рёбер.
    #[must_use]
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_invariant_holds_for_all_direction_deltas() {
        let origin = HexCoord::new(3, -5);
        assert_eq!(origin.q + origin.r + origin.s, 0);
        for dir in HexDirection::ALL {
            let n = origin.neighbor(dir);
            assert_eq!(n.q + n.r + n.s, 0, "direction {dir:?} breaks the invariant");
        }
    }

    #[test]
    fn neighbors_are_distinct_and_adjacent() {
        let origin = HexCoord::new(0, 0);
        let neighbors: Vec<HexCoord> =
            HexDirection::ALL.iter().map(|&d| origin.neighbor(d)).collect();
        for (i, a) in neighbors.iter().enumerate() {
            for b in neighbors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in HexDirection::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dq, dr) = dir.delta();
            let (oq, or) = dir.opposite().delta();
            assert_eq!((dq + oq, dr + or), (0, 0));
        }
    }

    #[test]
    fn offset_round_trip_over_a_rectangle() {
        for row in 0..8 {
            for col in 0..8 {
                let coord = HexCoord::from_offset(col, row);
                assert_eq!(coord.to_offset(), (col, row));
                assert_eq!(coord.q + coord.r + coord.s, 0);
            }
        }
    }

    #[test]
    fn direction_bits_do_not_collide() {
        let mut mask = 0u8;
        for dir in HexDirection::ALL {
            assert_eq!(mask & dir.bit(), 0);
            mask |= dir.bit();
        }
        assert_eq!(mask, 0b0011_1111);
    }
}
