use std::fs::File;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal;
use log::{info, trace, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use maze_runner::input::{Command, InputMapper};
use maze_runner::render::{self, Layout, Renderer, WIN_MESSAGE};
use maze_runner::terminal::TerminalGuard;
use maze_runner::{Args, GenState, MoveResult, Session};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let _terminal = TerminalGuard::enter().context("cannot take over the terminal")?;
    run(&mut io::stdout(), &args)
}

/// The game owns the terminal, so logs only go to a file when one is given.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("maze runner starting up, seed {seed}");
    let mut session = Session::new(args.session_config(), StdRng::seed_from_u64(seed))
        .context("cannot set up maze")?;
    let mut input = InputMapper::new();
    let mut renderer = Renderer::new();
    let frame_time = Duration::from_micros(1_000_000 / args.fps.max(1));
    let mut was_won = false;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            if let Event::Resize(..) = event {
                renderer.invalidate();
            }
            let Some(command) = input.map(&event) else {
                continue;
            };
            match command {
                Command::Quit => return Ok(()),
                Command::Move(dir) => {
                    if let MoveResult::Accepted(pos) = session.attempt_move(dir) {
                        trace!("player moved to {pos}");
                    }
                }
                Command::Regenerate => session.regenerate()?,
                Command::Resize(delta) => {
                    session.resize(delta)?;
                }
                Command::ToggleDisplayMode => {
                    session.set_display_mode(session.display_mode().toggled())?
                }
            }
        }

        if session.is_generating() {
            for _ in 0..args.steps_per_frame {
                let state = session.step_generation().context("maze generation failed")?;
                if state == GenState::Done {
                    break;
                }
            }
        }

        let won = session.check_win();
        if won && !was_won {
            info!(
                "player reached the end after {} trace steps",
                session.tracker().trace().len() - 1
            );
        }
        was_won = won;

        let grid = session.grid();
        let layout = Layout::new(session.display_mode(), grid.cols(), grid.rows());
        let frame = render::compose(session.maze(), &layout);
        let hud = render::hud(&session);
        let banner = won.then_some(WIN_MESSAGE);
        renderer.render(stdout, &frame, &hud, banner, terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
