use std::{
    fmt::{Display, Write},
    ops::Index,
};

use rand::Rng;

use crate::cell::{Cell, Neighbor};

pub const ROWS: usize = 30;
pub const COLS: usize = 50;

/// A `(row, col)` position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// The position `offset` away from this one, or `None` if it falls off the grid.
    pub fn offset(&self, (d_row, d_col): (isize, isize)) -> Option<Coord> {
        if !self.in_bounds() {
            return None;
        }

        let row = self.row as isize + d_row;
        let col = self.col as isize + d_col;

        if row < 0 || col < 0 {
            return None;
        }

        let coord = Coord::new(row as usize, col as usize);
        coord.in_bounds().then_some(coord)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Chance that a cell starts alive when randomizing. Always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    pub const NEVER: Probability = Probability(0.0);
    pub const ALWAYS: Probability = Probability(1.0);

    /// Clamps `p` into `[0, 1]`. NaN is treated as zero.
    pub fn new(p: f64) -> Self {
        if p.is_nan() {
            Probability(0.0)
        } else {
            Probability(p.clamp(0.0, 1.0))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Probability(0.3)
    }
}

/// A fixed `ROWS` x `COLS` generation. Edits always produce a new `Grid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Box<[Cell]>,
}

impl Grid {
    /// A grid with every cell dead.
    pub fn empty() -> Self {
        Grid {
            cells: vec![Cell::Dead; ROWS * COLS].into_boxed_slice(),
        }
    }

    /// A grid where each cell is independently alive with probability `p`.
    pub fn random(p: Probability) -> Self {
        Self::random_with(&mut rand::thread_rng(), p)
    }

    pub fn random_with<R: Rng>(rng: &mut R, p: Probability) -> Self {
        let cells = (0..ROWS * COLS)
            .map(|_| Cell::from(rng.gen_bool(p.get())))
            .collect();

        Grid { cells }
    }

    /// A grid with exactly the given cells alive. Positions off the grid are ignored.
    pub fn from_alive<I>(alive: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Grid::empty();
        for position in alive {
            if let Some(index) = position.to_index() {
                grid.cells[index] = Cell::Alive;
            }
        }
        grid
    }

    pub(crate) fn from_cells(cells: Box<[Cell]>) -> Self {
        assert_eq!(cells.len(), ROWS * COLS, "grid must hold {ROWS}x{COLS} cells");
        Grid { cells }
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        COLS
    }

    pub fn get(&self, position: impl GridIndex) -> Option<Cell> {
        let index = position.to_index()?;
        self.cells.get(index).copied()
    }

    /// A copy of this grid with the cell at `position` flipped, or `None` if `position` is off the grid.
    pub fn toggled(&self, position: impl GridIndex) -> Option<Grid> {
        let index = position.to_index()?;
        let mut next = self.clone();
        next.cells[index].flip();
        Some(next)
    }

    fn has_live_neighbor(&self, coord: Coord, neighbor: Neighbor) -> bool {
        coord
            .offset(neighbor.offset())
            .and_then(|pos| self.get(pos))
            .map_or(false, |cell| cell.alive())
    }

    /// Live cells among the eight around `coord`. Positions off the grid count as dead.
    pub fn live_neighbors(&self, coord: Coord) -> usize {
        Neighbor::all()
            .into_iter()
            .filter(|&neighbor| self.has_live_neighbor(coord, neighbor))
            .count()
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.alive()).count()
    }

    pub fn iter(&self) -> <&Grid as IntoIterator>::IntoIter {
        self.into_iter()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::empty()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row_index, row) in self.cells.chunks(COLS).enumerate() {
            for cell in row {
                f.write_char(cell.block())?;
            }

            if row_index + 1 < ROWS {
                f.write_char('\n')?;
            }
        }

        Ok(())
    }
}

/// Something that can be turned into a row-major offset into a `Grid`.
pub trait GridIndex {
    fn to_index(&self) -> Option<usize>;
}

impl GridIndex for Coord {
    fn to_index(&self) -> Option<usize> {
        self.in_bounds().then(|| self.row * COLS + self.col)
    }
}

impl GridIndex for (usize, usize) {
    fn to_index(&self) -> Option<usize> {
        Coord::from(*self).to_index()
    }
}

impl GridIndex for usize {
    fn to_index(&self) -> Option<usize> {
        (*self < ROWS * COLS).then_some(*self)
    }
}

impl<T: GridIndex> Index<T> for Grid {
    type Output = Cell;

    fn index(&self, index: T) -> &Self::Output {
        let index = index.to_index().expect("index out of bounds");
        &self.cells[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedCell {
    pub coord: Coord,
    pub state: Cell,
}

pub struct GridIterator<'a> {
    grid: &'a Grid,
    index: usize,
}

impl<'a> Iterator for GridIterator<'a> {
    type Item = LocatedCell;

    fn next(&mut self) -> Option<Self::Item> {
        let coord = Coord::new(self.index / COLS, self.index % COLS);
        let state = self.grid.get(self.index)?;

        self.index += 1;

        Some(LocatedCell { coord, state })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = ROWS * COLS - self.index;
        (left, Some(left))
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = LocatedCell;
    type IntoIter = GridIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        GridIterator {
            grid: self,
            index: 0,
        }
    }
}
