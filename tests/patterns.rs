use life_widget::{step, Cell, Coord, Grid, Probability, COLS, ROWS};
use rand::SeedableRng;

const SEED: u64 = 42;

fn every_cell() -> impl Iterator<Item = (usize, usize)> {
    (0..ROWS).flat_map(|r| (0..COLS).map(move |c| (r, c)))
}

fn run(grid: &Grid, generations: usize) -> Grid {
    (0..generations).fold(grid.clone(), |g, _| step(&g))
}

#[test]
fn dimensions_are_preserved() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(SEED);
    for _ in 0..10 {
        let grid = Grid::random_with(&mut rng, Probability::default());
        let next = step(&grid);
        assert_eq!((next.rows(), next.cols()), (ROWS, COLS));
        assert_eq!(next.iter().count(), ROWS * COLS);
    }
}

#[test]
fn empty_grid_is_a_fixed_point() {
    let empty = Grid::empty();
    assert_eq!(step(&empty), empty);
}

#[test]
fn generators_at_the_extremes() {
    assert_eq!(Grid::empty().population(), 0);
    assert_eq!(Grid::random(Probability::new(0.0)).population(), 0);
    assert_eq!(Grid::random(Probability::new(1.0)).population(), ROWS * COLS);
}

#[test]
fn dead_cell_without_neighbors_stays_dead() {
    let grid = Grid::from_alive([(0, 0)]);
    let next = step(&grid);
    assert_eq!(next[(20, 20)], Cell::Dead);
}

#[test]
fn isolated_cell_dies() {
    assert_eq!(step(&Grid::from_alive([(15, 25)])).population(), 0);
}

#[test]
fn block_is_a_still_life() {
    for (r, c) in [(10, 10), (0, 0), (ROWS - 2, COLS - 2)] {
        let block = Grid::from_alive([(r, c), (r, c + 1), (r + 1, c), (r + 1, c + 1)]);
        assert_eq!(step(&block), block, "block at ({r}, {c})");
    }
}

#[test]
fn blinker_has_period_two() {
    let (r, c) = (12, 20);
    let horizontal = Grid::from_alive([(r, c - 1), (r, c), (r, c + 1)]);
    let vertical = Grid::from_alive([(r - 1, c), (r, c), (r + 1, c)]);

    assert_eq!(step(&horizontal), vertical);
    assert_eq!(step(&vertical), horizontal);
    assert_ne!(horizontal, vertical);
}

#[test]
fn glider_moves_diagonally() {
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    let start = Grid::from_alive(glider);
    let moved = Grid::from_alive(glider.map(|(r, c)| (r + 1, c + 1)));

    assert_eq!(run(&start, 4), moved);
}

#[test]
fn glider_dies_into_a_block_at_the_corner() {
    // Walls do not wrap, so a glider reaching the bottom-right corner settles as a block.
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
        .map(|(r, c)| (r + ROWS - 6, c + COLS - 6));
    let settled = run(&Grid::from_alive(glider), 40);

    assert_eq!(settled.population(), 4);
    assert_eq!(step(&settled), settled);
}

#[test]
fn corner_neighbor_count_is_bounded() {
    let full = Grid::from_alive(every_cell());
    let corners = [(0, 0), (0, COLS - 1), (ROWS - 1, 0), (ROWS - 1, COLS - 1)];

    for (r, c) in corners {
        assert_eq!(full.live_neighbors(Coord::new(r, c)), 3);
    }
    for coord in every_cell().map(Coord::from) {
        assert!(full.live_neighbors(coord) <= 8);
    }
    assert_eq!(full.live_neighbors(Coord::new(0, 10)), 5);
}

#[test]
fn step_is_pure() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(SEED);
    let grid = Grid::random_with(&mut rng, Probability::default());
    let copy = grid.clone();

    let a = step(&grid);
    let b = step(&grid);
    assert_eq!(a, b);
    assert_eq!(grid, copy);
}
