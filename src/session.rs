//! One playable maze: the grid being carved, the carving state and the
//! player's trace. Every setup builds a fresh `Maze` and swaps it in whole, so
//! an in-flight generation is simply dropped.

use log::info;
use rand::Rng;

use crate::config::{clamp_size, DisplayMode, SessionConfig};
use crate::generator::{GenState, Generator};
use crate::grid::{Dir, Grid, GridError};
use crate::tracker::{MoveResult, Tracker};

#[derive(Clone, Debug)]
pub struct Maze {
    pub grid: Grid,
    pub generator: Generator,
    pub tracker: Tracker,
}

impl Maze {
    pub fn new(size: usize) -> Result<Self, GridError> {
        let mut grid = Grid::new(size, size)?;
        let generator = Generator::new(&mut grid);
        let tracker = Tracker::new(grid.cols(), grid.rows());
        Ok(Self {
            grid,
            generator,
            tracker,
        })
    }
}

pub struct Session<R: Rng> {
    maze: Maze,
    size: usize,
    mode: DisplayMode,
    instant: bool,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self, GridError> {
        let size = clamp_size(config.size);
        let maze = Self::build(size, config.mode, config.instant, &mut rng)?;
        Ok(Self {
            maze,
            size,
            mode: config.mode,
            instant: config.instant,
            rng,
        })
    }

    fn build(
        size: usize,
        mode: DisplayMode,
        instant: bool,
        rng: &mut R,
    ) -> Result<Maze, GridError> {
        let mut maze = Maze::new(size)?;
        if instant {
            maze.generator.run_to_completion(&mut maze.grid, rng)?;
        }
        info!("new {size}x{size} maze on the {mode} canvas");
        Ok(maze)
    }

    /// Discards the current maze and starts carving a new `size` x `size` one.
    pub fn setup(&mut self, size: usize) -> Result<(), GridError> {
        let size = clamp_size(size);
        self.maze = Self::build(size, self.mode, self.instant, &mut self.rng)?;
        self.size = size;
        Ok(())
    }

    pub fn regenerate(&mut self) -> Result<(), GridError> {
        self.setup(self.size)
    }

    /// Moves the size by `delta`, staying inside the allowed range. Returns
    /// whether the size changed; an unchanged size keeps the current maze.
    pub fn resize(&mut self, delta: isize) -> Result<bool, GridError> {
        let target = clamp_size(self.size.saturating_add_signed(delta));
        if target == self.size {
            return Ok(false);
        }
        self.setup(target)?;
        Ok(true)
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) -> Result<(), GridError> {
        info!("switching to {mode} canvas");
        self.mode = mode;
        self.setup(self.size)
    }

    pub fn step_generation(&mut self) -> Result<GenState, GridError> {
        self.maze.generator.step(&mut self.maze.grid, &mut self.rng)
    }

    pub fn attempt_move(&mut self, dir: Dir) -> MoveResult {
        self.maze.tracker.attempt_move(&self.maze.grid, dir)
    }

    pub fn check_win(&self) -> bool {
        self.maze.tracker.check_win()
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn grid(&self) -> &Grid {
        &self.maze.grid
    }

    pub fn generator(&self) -> &Generator {
        &self.maze.generator
    }

    pub fn tracker(&self) -> &Tracker {
        &self.maze.tracker
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_generating(&self) -> bool {
        !self.maze.generator.is_done()
    }
}
