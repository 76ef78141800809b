//! Conway's Game of Life on a fixed 30x50 grid, with a timed driver and a terminal widget.

pub mod app;
pub mod cell;
pub mod config;
pub mod grid;
pub mod sim;
pub mod step;

pub use cell::Cell;
pub use grid::{Coord, Grid, Probability, COLS, ROWS};
pub use sim::{Delay, Simulation};
pub use step::step;
