pub mod config;
pub mod generator;
pub mod grid;
pub mod input;
pub mod render;
pub mod session;
pub mod terminal;
pub mod tracker;

pub use config::{Args, DisplayMode, SessionConfig};
pub use generator::{GenState, Generator};
pub use grid::{Cell, Dir, Grid, GridError, Pos};
pub use session::{Maze, Session};
pub use tracker::{MoveResult, Tracker};
