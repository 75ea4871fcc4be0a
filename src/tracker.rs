use log::trace;

use crate::grid::{Dir, Grid, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Accepted(Pos),
    Rejected,
}

/// Player position plus the path walked from the start cell.
///
/// The last trace entry always equals the player position. Stepping onto a
/// cell already on the trace cuts the trace back to that cell.
#[derive(Clone, Debug)]
pub struct Tracker {
    player: Pos,
    trace: Vec<Pos>,
    start: Pos,
    end: Pos,
}

impl Tracker {
    pub fn new(cols: usize, rows: usize) -> Self {
        let start = Pos::new(0, 0);
        Self {
            player: start,
            trace: vec![start],
            start,
            end: Pos::new(cols.saturating_sub(1), rows.saturating_sub(1)),
        }
    }

    pub fn position(&self) -> Pos {
        self.player
    }

    pub fn trace(&self) -> &[Pos] {
        &self.trace
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn end(&self) -> Pos {
        self.end
    }

    pub fn attempt_move(&mut self, grid: &Grid, dir: Dir) -> MoveResult {
        let Some(cell) = grid.cell(self.player) else {
            return MoveResult::Rejected;
        };
        if cell.has_wall(dir) {
            return MoveResult::Rejected;
        }
        let Some(next) = grid.step(self.player, dir) else {
            return MoveResult::Rejected;
        };

        self.player = next;
        match self.trace.iter().position(|&p| p == next) {
            Some(idx) if idx + 1 != self.trace.len() => {
                trace!("trace cut back to {} entries", idx + 1);
                self.trace.truncate(idx + 1);
            }
            Some(_) => {}
            None => self.trace.push(next),
        }
        MoveResult::Accepted(next)
    }

    pub fn check_win(&self) -> bool {
        self.player == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: usize, y: usize) -> Pos {
        Pos::new(x, y)
    }

    /// 3x3 grid with an L-shaped corridor (0,0) -> (1,0) -> (1,1) -> (1,2) -> (2,2).
    fn corridor() -> Grid {
        let mut grid = Grid::new(3, 3).unwrap();
        for (a, b) in [(p(0, 0), p(1, 0)), (p(1, 0), p(1, 1)), (p(1, 1), p(1, 2)), (p(1, 2), p(2, 2))] {
            grid.remove_wall_pair(a, b).unwrap();
        }
        grid
    }

    #[test]
    fn walled_cell_rejects_every_direction() {
        let grid = Grid::new(3, 3).unwrap();
        let mut tracker = Tracker::new(3, 3);
        for dir in Dir::ALL {
            assert_eq!(tracker.attempt_move(&grid, dir), MoveResult::Rejected);
            assert_eq!(tracker.position(), p(0, 0));
            assert_eq!(tracker.trace(), &[p(0, 0)]);
        }
    }

    #[test]
    fn border_is_rejected_even_without_wall() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.cell_mut(0).walls[Dir::Up.wall_index()] = false;
        let mut tracker = Tracker::new(2, 2);
        assert_eq!(tracker.attempt_move(&grid, Dir::Up), MoveResult::Rejected);
        assert_eq!(tracker.position(), p(0, 0));
        assert_eq!(tracker.trace(), &[p(0, 0)]);
    }

    #[test]
    fn new_cell_is_appended() {
        let grid = corridor();
        let mut tracker = Tracker::new(3, 3);
        assert_eq!(tracker.attempt_move(&grid, Dir::Right), MoveResult::Accepted(p(1, 0)));
        assert_eq!(tracker.trace(), &[p(0, 0), p(1, 0)]);
    }

    #[test]
    fn stepping_back_truncates() {
        let grid = corridor();
        let mut tracker = Tracker::new(3, 3);
        tracker.attempt_move(&grid, Dir::Right);
        tracker.attempt_move(&grid, Dir::Down);
        assert_eq!(tracker.trace(), &[p(0, 0), p(1, 0), p(1, 1)]);
        assert_eq!(tracker.position(), p(1, 1));

        assert_eq!(tracker.attempt_move(&grid, Dir::Up), MoveResult::Accepted(p(1, 0)));
        assert_eq!(tracker.trace(), &[p(0, 0), p(1, 0)]);
        assert_eq!(tracker.trace().last(), Some(&tracker.position()));
    }

    #[test]
    fn walking_back_to_start_leaves_only_start() {
        let grid = corridor();
        let mut tracker = Tracker::new(3, 3);
        for dir in [Dir::Right, Dir::Down, Dir::Down] {
            tracker.attempt_move(&grid, dir);
        }
        assert_eq!(tracker.trace().len(), 4);
        for (dir, len) in [(Dir::Up, 3), (Dir::Up, 2), (Dir::Left, 1)] {
            tracker.attempt_move(&grid, dir);
            assert_eq!(tracker.trace().len(), len);
        }
        assert_eq!(tracker.trace(), &[p(0, 0)]);
    }

    #[test]
    fn win_only_on_end_cell() {
        let grid = corridor();
        let mut tracker = Tracker::new(3, 3);
        assert_eq!(tracker.end(), p(2, 2));
        for dir in [Dir::Right, Dir::Down, Dir::Down] {
            assert!(!tracker.check_win());
            tracker.attempt_move(&grid, dir);
        }
        assert!(!tracker.check_win());
        tracker.attempt_move(&grid, Dir::Right);
        assert_eq!(tracker.position(), p(2, 2));

        let trace = tracker.trace().to_vec();
        assert!(tracker.check_win());
        assert!(tracker.check_win());
        assert_eq!(tracker.trace(), trace.as_slice());
    }
}
