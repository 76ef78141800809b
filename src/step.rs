use crate::{
    cell::Cell,
    grid::{Grid, LocatedCell},
};

/// The B3/S23 rule: the next state of a cell with `neighbors` live neighbors.
pub fn next_state(cell: Cell, neighbors: usize) -> Cell {
    match cell {
        Cell::Alive if (2..=3).contains(&neighbors) => Cell::Alive,
        Cell::Alive => Cell::Dead,
        Cell::Dead if neighbors == 3 => Cell::Alive,
        Cell::Dead => Cell::Dead,
    }
}

/// Advances `grid` by one generation. The input is left as is.
pub fn step(grid: &Grid) -> Grid {
    let cells = grid
        .iter()
        .map(|LocatedCell { coord, state }| next_state(state, grid.live_neighbors(coord)))
        .collect();

    Grid::from_cells(cells)
}
