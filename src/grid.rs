//! Cell grid and wall bookkeeping.

use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Right => (1, 0),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
        }
    }

    /// Index into a cell's wall array: top, right, bottom, left.
    pub fn wall_index(self) -> usize {
        match self {
            Dir::Up => 0,
            Dir::Right => 1,
            Dir::Down => 2,
            Dir::Left => 3,
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }

    /// Direction leading from `from` to an orthogonally adjacent `to`.
    pub fn between(from: Pos, to: Pos) -> Option<Dir> {
        let dx = to.x as isize - from.x as isize;
        let dy = to.y as isize - from.y as isize;
        match (dx, dy) {
            (1, 0) => Some(Dir::Right),
            (-1, 0) => Some(Dir::Left),
            (0, 1) => Some(Dir::Down),
            (0, -1) => Some(Dir::Up),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pos: Pos,
    pub walls: [bool; 4],
    pub visited: bool,
}

impl Cell {
    fn new(x: usize, y: usize) -> Self {
        Self {
            pos: Pos::new(x, y),
            walls: [true; 4],
            visited: false,
        }
    }

    pub fn has_wall(&self, dir: Dir) -> bool {
        self.walls[dir.wall_index()]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and one column, got {cols}x{rows}")]
    InvalidSize { cols: usize, rows: usize },
    #[error("cell {pos} is outside the grid")]
    OutOfBounds { pos: Pos },
    #[error("cannot carve between non-adjacent cells {a} and {b}")]
    NotAdjacent { a: Pos, b: Pos },
}

/// Row-major collection of `cols * rows` cells, indexed by `x + y * cols`.
#[derive(Clone, Debug)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::InvalidSize { cols, rows });
        }
        let mut cells = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                cells.push(Cell::new(x, y));
            }
        }
        Ok(Self { cols, rows, cells })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Linear index of `(x, y)`, or `None` outside the grid. Edge probes with
    /// negative coordinates are ordinary queries here.
    pub fn index_of(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(x + y * self.cols)
    }

    pub fn index_of_pos(&self, pos: Pos) -> Option<usize> {
        self.index_of(pos.x as isize, pos.y as isize)
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index_of_pos(pos).map(|idx| &self.cells[idx])
    }

    pub fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    #[cfg(test)]
    pub(crate) fn cell_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    pub fn mark_visited(&mut self, idx: usize) {
        self.cells[idx].visited = true;
    }

    /// In-bounds position one step from `pos` in `dir`.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        self.index_of(nx, ny).map(|idx| self.cells[idx].pos)
    }

    /// Indices of the up to four in-bounds neighbours of `idx`, regardless of
    /// walls or visited state, in top, right, bottom, left order.
    pub fn neighbors_of(&self, idx: usize) -> Vec<usize> {
        let pos = self.cells[idx].pos;
        Dir::ALL
            .iter()
            .filter_map(|&dir| self.step(pos, dir))
            .filter_map(|p| self.index_of_pos(p))
            .collect()
    }

    pub fn has_wall(&self, pos: Pos, dir: Dir) -> Result<bool, GridError> {
        self.cell(pos)
            .map(|cell| cell.has_wall(dir))
            .ok_or(GridError::OutOfBounds { pos })
    }

    /// Clears the wall on each cell facing the other.
    pub fn remove_wall_pair(&mut self, a: Pos, b: Pos) -> Result<(), GridError> {
        let ia = self.index_of_pos(a).ok_or(GridError::OutOfBounds { pos: a })?;
        let ib = self.index_of_pos(b).ok_or(GridError::OutOfBounds { pos: b })?;
        let dir = Dir::between(a, b).ok_or(GridError::NotAdjacent { a, b })?;
        self.cells[ia].walls[dir.wall_index()] = false;
        self.cells[ib].walls[dir.opposite().wall_index()] = false;
        Ok(())
    }

    /// Positions reachable from `pos` in one step through an open wall.
    pub fn open_neighbors(&self, pos: Pos) -> Vec<Pos> {
        let Some(cell) = self.cell(pos) else {
            return Vec::new();
        };
        Dir::ALL
            .iter()
            .filter(|&&dir| !cell.has_wall(dir))
            .filter_map(|&dir| self.step(pos, dir))
            .collect()
    }

    /// Number of carved passages, each counted once.
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Dir::Right, Dir::Down]
                    .iter()
                    .filter(|&&dir| !cell.has_wall(dir) && self.step(cell.pos, dir).is_some())
                    .count()
            })
            .sum()
    }
}
