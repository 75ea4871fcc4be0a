//! Randomized iterative depth-first carving, driven one step at a time so the
//! caller can redraw between steps.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Grid, GridError, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenState {
    Running,
    Done,
}

#[derive(Clone, Debug)]
pub struct Generator {
    stack: Vec<usize>,
    state: GenState,
    steps: usize,
}

impl Generator {
    /// Marks the origin visited and seeds the stack with it.
    pub fn new(grid: &mut Grid) -> Self {
        grid.mark_visited(0);
        Self {
            stack: vec![0],
            state: GenState::Running,
            steps: 0,
        }
    }

    pub fn state(&self) -> GenState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == GenState::Done
    }

    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Cell on top of the stack: the head of the carve.
    pub fn current(&self, grid: &Grid) -> Option<Pos> {
        self.stack.last().map(|&idx| grid.cell_at(idx).pos)
    }

    /// One push-and-carve or one pop. Once the stack drains the generator is
    /// `Done` and further calls change nothing.
    pub fn step(&mut self, grid: &mut Grid, rng: &mut impl Rng) -> Result<GenState, GridError> {
        let Some(&current) = self.stack.last() else {
            if self.state == GenState::Running {
                debug!("maze generation finished after {} steps", self.steps);
                self.state = GenState::Done;
            }
            return Ok(self.state);
        };

        let unvisited: Vec<usize> = grid
            .neighbors_of(current)
            .into_iter()
            .filter(|&idx| !grid.cell_at(idx).visited)
            .collect();

        match unvisited.choose(rng) {
            Some(&next) => {
                grid.mark_visited(next);
                self.stack.push(next);
                let from = grid.cell_at(current).pos;
                let to = grid.cell_at(next).pos;
                grid.remove_wall_pair(from, to)?;
            }
            None => {
                self.stack.pop();
            }
        }
        self.steps += 1;
        Ok(self.state)
    }

    pub fn run_to_completion(&mut self, grid: &mut Grid, rng: &mut impl Rng) -> Result<(), GridError> {
        while self.step(grid, rng)? == GenState::Running {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(size: usize, seed: u64) -> (Grid, Generator) {
        let mut grid = Grid::new(size, size).unwrap();
        let mut gen = Generator::new(&mut grid);
        let mut rng = StdRng::seed_from_u64(seed);
        gen.run_to_completion(&mut grid, &mut rng).unwrap();
        (grid, gen)
    }

    #[test]
    fn starts_running_at_origin() {
        let mut grid = Grid::new(3, 3).unwrap();
        let gen = Generator::new(&mut grid);
        assert_eq!(gen.state(), GenState::Running);
        assert_eq!(gen.stack(), &[0]);
        assert!(grid.cell_at(0).visited);
        assert_eq!(gen.current(&grid), Some(Pos::new(0, 0)));
    }

    #[test]
    fn first_step_carves_from_origin() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut gen = Generator::new(&mut grid);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(gen.step(&mut grid, &mut rng).unwrap(), GenState::Running);
        assert_eq!(gen.stack().len(), 2);
        assert_eq!(grid.passage_count(), 1);
        let head = gen.current(&grid).unwrap();
        assert!(head == Pos::new(1, 0) || head == Pos::new(0, 1));
    }

    #[test]
    fn completes_with_every_cell_visited() {
        for size in 2..=12 {
            let (grid, gen) = generate(size, size as u64);
            assert!(gen.is_done());
            assert!(gen.stack().is_empty());
            assert!(grid.cells().iter().all(|c| c.visited));
            assert_eq!(grid.passage_count(), size * size - 1);
        }
    }

    #[test]
    fn step_count_is_one_push_and_one_pop_per_cell() {
        let (_, gen) = generate(6, 3);
        // every cell but the origin is pushed once, every cell is popped once
        assert_eq!(gen.steps(), 2 * 36 - 1);
    }

    #[test]
    fn steps_after_done_change_nothing() {
        let (mut grid, mut gen) = generate(4, 11);
        let before = grid.cells().to_vec();
        let mut rng = StdRng::seed_from_u64(99);
        assert_eq!(gen.step(&mut grid, &mut rng).unwrap(), GenState::Done);
        assert_eq!(grid.cells(), before.as_slice());
    }

    #[test]
    fn same_seed_same_maze() {
        let (a, _) = generate(9, 42);
        let (b, _) = generate(9, 42);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn single_cell_grid_finishes_immediately() {
        let (grid, gen) = generate(1, 0);
        assert!(gen.is_done());
        assert_eq!(gen.steps(), 1);
        assert_eq!(grid.passage_count(), 0);
    }
}
