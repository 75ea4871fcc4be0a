use std::fmt;
use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 50;
pub const DEFAULT_SIZE: usize = 10;
const DEFAULT_FPS: u64 = 60;
const DEFAULT_STEPS_PER_FRAME: u32 = 1;

/// Canvas aspect presets. Switching presets restarts the maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DisplayMode {
    #[default]
    Desktop,
    Phone,
}

impl DisplayMode {
    /// Canvas size in pixels, width by height.
    pub fn canvas(self) -> (u32, u32) {
        match self {
            DisplayMode::Desktop => (500, 500),
            DisplayMode::Phone => (320, 570),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Desktop => DisplayMode::Phone,
            DisplayMode::Phone => DisplayMode::Desktop,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Desktop => f.write_str("desktop"),
            DisplayMode::Phone => f.write_str("phone"),
        }
    }
}

/// Generate a maze in the terminal and walk it from the top-left to the
/// bottom-right corner.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Cells per side of the square maze.
    #[arg(
        short,
        long,
        env = "MAZE_SIZE",
        default_value_t = DEFAULT_SIZE,
        value_parser = clap::value_parser!(u16).range(MIN_SIZE as i64..=MAX_SIZE as i64).map(usize::from)
    )]
    pub size: usize,

    /// Canvas preset.
    #[arg(short, long, env = "MAZE_MODE", value_enum, default_value_t = DisplayMode::Desktop)]
    pub mode: DisplayMode,

    /// Seed for reproducible mazes. A fresh seed is drawn when omitted.
    #[arg(long, env = "MAZE_SEED")]
    pub seed: Option<u64>,

    /// Frames per second for the render loop.
    #[arg(
        long,
        env = "MAZE_FPS",
        default_value_t = DEFAULT_FPS,
        value_parser = clap::value_parser!(u64).range(1..=240)
    )]
    pub fps: u64,

    /// Generator steps taken between two frames.
    #[arg(
        long,
        env = "MAZE_STEPS_PER_FRAME",
        default_value_t = DEFAULT_STEPS_PER_FRAME,
        value_parser = clap::value_parser!(u32).range(1..=10_000)
    )]
    pub steps_per_frame: u32,

    /// Skip the carving animation and start with a finished maze.
    #[arg(long, env = "MAZE_INSTANT")]
    pub instant: bool,

    /// Write logs to this file. Logging is off without it.
    #[arg(long, env = "MAZE_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            size: self.size,
            mode: self.mode,
            instant: self.instant,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub size: usize,
    pub mode: DisplayMode,
    pub instant: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            mode: DisplayMode::default(),
            instant: false,
        }
    }
}

pub fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["maze"]).unwrap();
        assert_eq!(args.size, DEFAULT_SIZE);
        assert_eq!(args.mode, DisplayMode::Desktop);
        assert_eq!(args.seed, None);
        assert_eq!(args.steps_per_frame, 1);
        assert!(!args.instant);
        assert_eq!(args.session_config(), SessionConfig::default());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["maze", "-s", "8", "--mode", "phone", "--seed", "3", "--instant"])
            .unwrap();
        assert_eq!(args.size, 8);
        assert_eq!(args.mode, DisplayMode::Phone);
        assert_eq!(args.seed, Some(3));
        assert!(args.instant);
    }

    #[test]
    fn size_outside_range_is_rejected() {
        assert!(Args::try_parse_from(["maze", "--size", "1"]).is_err());
        assert!(Args::try_parse_from(["maze", "--size", "51"]).is_err());
    }

    #[test]
    fn canvas_presets() {
        assert_eq!(DisplayMode::Desktop.canvas(), (500, 500));
        assert_eq!(DisplayMode::Phone.canvas(), (320, 570));
        assert_eq!(DisplayMode::Phone.toggled(), DisplayMode::Desktop);
    }

    #[test]
    fn clamps_to_size_range() {
        assert_eq!(clamp_size(0), MIN_SIZE);
        assert_eq!(clamp_size(7), 7);
        assert_eq!(clamp_size(500), MAX_SIZE);
    }
}
