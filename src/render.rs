//! Terminal drawing. `compose` turns a maze into a character frame without
//! touching the terminal; `Renderer` writes the frame, sending only the
//! characters that changed since the previous call.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use log::debug;
use rand::Rng;
use unicode_width::UnicodeWidthChar;

use crate::config::DisplayMode;
use crate::grid::{Dir, Pos};
use crate::session::{Maze, Session};

/// Pixel width of one terminal character, used to map canvas presets onto
/// the terminal. Only the canvas width sizes cells; rows are two lines each.
const CHAR_PX_W: u32 = 8;

const UP: u8 = 1;
const RIGHT: u8 = 2;
const DOWN: u8 = 4;
const LEFT: u8 = 8;

const LIGHT: [char; 16] = [
    ' ', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
];
const HEAVY: [char; 16] = [
    ' ', '╹', '╺', '┗', '╻', '┃', '┏', '┣', '╸', '┛', '━', '┻', '┓', '┫', '┳', '╋',
];

pub const WIN_MESSAGE: &str = "Congratulations! You reached the end!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Blank,
    Wall(u8),
    Trace(u8),
    Head,
    Player,
}

impl Glyph {
    fn symbol(self) -> char {
        match self {
            Glyph::Blank => ' ',
            Glyph::Wall(mask) => LIGHT[(mask & 0xf) as usize],
            Glyph::Trace(mask) => HEAVY[(mask & 0xf) as usize],
            Glyph::Head => '◆',
            Glyph::Player => '●',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub glyph: Glyph,
    pub fg: Color,
    pub bg: Color,
}

impl Tile {
    const BLANK: Tile = Tile {
        glyph: Glyph::Blank,
        fg: Color::Reset,
        bg: Color::Reset,
    };

    pub fn symbol(&self) -> char {
        self.glyph.symbol()
    }
}

/// Where each maze cell lands in the character frame.
///
/// Cell size follows the canvas width divided by the column count, the same
/// way a pixel canvas would size its cells; each cell is `span` characters
/// wide and one row tall, with walls on the lines between cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub span: usize,
    pub width: usize,
    pub height: usize,
}

impl Layout {
    pub fn new(mode: DisplayMode, cols: usize, rows: usize) -> Self {
        let (canvas_w, _) = mode.canvas();
        let canvas_cols = (canvas_w / CHAR_PX_W) as usize;
        let span = ((canvas_cols - 1) / cols.max(1)).saturating_sub(1).max(1);
        Self {
            span,
            width: cols * (span + 1) + 1,
            height: rows * 2 + 1,
        }
    }

    /// Left edge column of `pos`'s cell (its left wall line).
    fn cell_x(&self, pos: Pos) -> usize {
        pos.x * (self.span + 1)
    }

    fn cell_y(&self, pos: Pos) -> usize {
        pos.y * 2
    }

    /// Character at the centre of `pos`'s cell.
    pub fn center(&self, pos: Pos) -> (usize, usize) {
        (self.cell_x(pos) + 1 + self.span / 2, self.cell_y(pos) + 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
}

impl Frame {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::BLANK; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x)
    }

    fn get_mut(&mut self, x: usize, y: usize) -> &mut Tile {
        &mut self.tiles[y * self.width + x]
    }

    /// The frame as plain text, one line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width) {
            out.extend(row.iter().map(Tile::symbol));
            out.push('\n');
        }
        out
    }
}

pub fn compose(maze: &Maze, layout: &Layout) -> Frame {
    let mut frame = Frame::new(layout.width, layout.height);
    let mut walls = vec![0u8; layout.width * layout.height];
    let span = layout.span;

    for cell in maze.grid.cells() {
        let x0 = layout.cell_x(cell.pos);
        let y0 = layout.cell_y(cell.pos);
        if cell.has_wall(Dir::Up) {
            for x in x0 + 1..=x0 + span {
                walls[y0 * layout.width + x] |= LEFT | RIGHT;
            }
        }
        if cell.has_wall(Dir::Down) {
            for x in x0 + 1..=x0 + span {
                walls[(y0 + 2) * layout.width + x] |= LEFT | RIGHT;
            }
        }
        if cell.has_wall(Dir::Left) {
            walls[(y0 + 1) * layout.width + x0] |= UP | DOWN;
        }
        if cell.has_wall(Dir::Right) {
            walls[(y0 + 1) * layout.width + x0 + span + 1] |= UP | DOWN;
        }
    }

    // Posts between cells join whichever wall lines touch them.
    for y in (0..layout.height).step_by(2) {
        for x in (0..layout.width).step_by(span + 1) {
            let at = |x: usize, y: usize| walls[y * layout.width + x];
            let mut mask = 0;
            if y > 0 && at(x, y - 1) & DOWN != 0 {
                mask |= UP;
            }
            if y + 1 < layout.height && at(x, y + 1) & UP != 0 {
                mask |= DOWN;
            }
            if x > 0 && at(x - 1, y) & RIGHT != 0 {
                mask |= LEFT;
            }
            if x + 1 < layout.width && at(x + 1, y) & LEFT != 0 {
                mask |= RIGHT;
            }
            walls[y * layout.width + x] = mask;
        }
    }

    for (tile, &mask) in frame.tiles.iter_mut().zip(&walls) {
        if mask != 0 {
            *tile = Tile {
                glyph: Glyph::Wall(mask),
                fg: Color::White,
                bg: Color::Reset,
            };
        }
    }

    fill_cell(&mut frame, layout, maze.tracker.start(), Color::Blue);
    fill_cell(&mut frame, layout, maze.tracker.end(), Color::Red);

    let mut trace = vec![0u8; layout.width * layout.height];
    for pair in maze.tracker.trace().windows(2) {
        let (ax, ay) = layout.center(pair[0]);
        let (bx, by) = layout.center(pair[1]);
        if ay == by {
            let (lo, hi) = (ax.min(bx), ax.max(bx));
            trace[ay * layout.width + lo] |= RIGHT;
            trace[ay * layout.width + hi] |= LEFT;
            for x in lo + 1..hi {
                trace[ay * layout.width + x] |= LEFT | RIGHT;
            }
        } else if ax == bx {
            let (lo, hi) = (ay.min(by), ay.max(by));
            trace[lo * layout.width + ax] |= DOWN;
            trace[hi * layout.width + ax] |= UP;
            for y in lo + 1..hi {
                trace[y * layout.width + ax] |= UP | DOWN;
            }
        }
    }
    for (tile, &mask) in frame.tiles.iter_mut().zip(&trace) {
        if mask != 0 {
            tile.glyph = Glyph::Trace(mask);
            tile.fg = Color::Cyan;
        }
    }

    if !maze.generator.is_done() {
        if let Some(head) = maze.generator.current(&maze.grid) {
            let (x, y) = layout.center(head);
            let tile = frame.get_mut(x, y);
            tile.glyph = Glyph::Head;
            tile.fg = Color::Magenta;
        }
    }

    let (x, y) = layout.center(maze.tracker.position());
    let tile = frame.get_mut(x, y);
    tile.glyph = Glyph::Player;
    tile.fg = Color::Cyan;

    frame
}

fn fill_cell(frame: &mut Frame, layout: &Layout, pos: Pos, bg: Color) {
    let x0 = layout.cell_x(pos);
    let y = layout.cell_y(pos) + 1;
    for x in x0 + 1..=x0 + layout.span {
        frame.get_mut(x, y).bg = bg;
    }
}

/// Longest prefix of `text` that fits in `width` terminal columns.
fn clip(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > width {
            return &text[..idx];
        }
    }
    text
}

pub fn hud<R: Rng>(session: &Session<R>) -> String {
    let progress = if session.is_generating() {
        format!("carving ({} steps)", session.generator().steps())
    } else {
        "ready".to_string()
    };
    format!(
        "Size: {0}x{0}  Mode: {1}  Maze: {2}  Trace: {3}  (arrows/hjkl move, r new, +/- size, m mode, q quit)",
        session.size(),
        session.display_mode(),
        progress,
        session.tracker().trace().len(),
    )
}

pub struct Renderer {
    last: Vec<Tile>,
    last_size: (usize, usize),
    last_hud: String,
    last_banner: Option<String>,
    needs_full: bool,
    too_small: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_size: (0, 0),
            last_hud: String::new(),
            last_banner: None,
            needs_full: true,
            too_small: false,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces the next `render` to redraw everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render(
        &mut self,
        out: &mut impl Write,
        frame: &Frame,
        hud: &str,
        banner: Option<&str>,
        term: (u16, u16),
    ) -> io::Result<()> {
        let (term_w, term_h) = term;
        let needed_w = frame.width as u16;
        let needed_h = frame.height as u16 + 2;

        if term_w < needed_w || term_h < needed_h {
            if !self.too_small {
                debug!("terminal {term_w}x{term_h} is smaller than {needed_w}x{needed_h}");
            }
            self.too_small = true;
            out.queue(MoveTo(0, 0))?;
            out.queue(Clear(ClearType::All))?;
            out.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }
        self.too_small = false;

        if self.last_size != (frame.width, frame.height) {
            self.last = vec![Tile::BLANK; frame.tiles.len()];
            self.last_size = (frame.width, frame.height);
            self.needs_full = true;
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }

        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(0, self.origin_y - 1))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Print(clip(hud, term_w as usize)))?;
            out.queue(ResetColor)?;
            self.last_hud = hud.to_string();
        }

        for y in 0..frame.height {
            for x in 0..frame.width {
                let idx = y * frame.width + x;
                let tile = frame.tiles[idx];
                if self.needs_full || tile != self.last[idx] {
                    self.last[idx] = tile;
                    self.draw_tile(out, x, y, tile)?;
                }
            }
        }

        let banner = banner.map(str::to_string);
        if self.needs_full || banner != self.last_banner {
            out.queue(MoveTo(self.origin_x, self.origin_y + frame.height as u16))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            if let Some(text) = &banner {
                out.queue(SetForegroundColor(Color::Green))?;
                out.queue(Print(clip(text, (term_w - self.origin_x) as usize)))?;
                out.queue(ResetColor)?;
            }
            self.last_banner = banner;
        }
        self.needs_full = false;

        out.flush()
    }

    fn draw_tile(&self, out: &mut impl Write, x: usize, y: usize, tile: Tile) -> io::Result<()> {
        let symbol = tile.symbol();
        out.queue(MoveTo(self.origin_x + x as u16, self.origin_y + y as u16))?;
        out.queue(SetForegroundColor(tile.fg))?;
        out.queue(SetBackgroundColor(tile.bg))?;
        out.queue(Print(symbol))?;
        if UnicodeWidthChar::width(symbol).unwrap_or(1) == 0 {
            out.queue(Print(' '))?;
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}
