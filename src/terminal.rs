//! Raw-mode terminal ownership. The screen is handed back when the guard
//! drops, whether the game quits, fails or panics.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::warn;

pub struct TerminalGuard {
    _owned: (),
}

impl TerminalGuard {
    /// Switches to raw mode and the alternate screen with mouse capture on.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // from here on a failure still restores through Drop
        let guard = Self { _owned: () };
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        stdout.execute(Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = leave_screen(&mut io::stdout()) {
            warn!("cannot restore screen: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("cannot leave raw mode: {err}");
        }
    }
}

/// Undoes the screen changes made by `TerminalGuard::enter`. Every step runs
/// even when an earlier one fails; the first error is returned.
pub fn leave_screen(out: &mut impl Write) -> io::Result<()> {
    let shown = out.execute(Show).map(|_| ());
    let released = out.execute(DisableMouseCapture).map(|_| ());
    let left = out.execute(LeaveAlternateScreen).map(|_| ());
    shown.and(released).and(left)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer whose every write fails, counting the attempts.
    #[derive(Default)]
    struct Broken {
        attempts: usize,
    }

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn leave_screen_writes_every_step() {
        let mut out = Vec::new();
        leave_screen(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // show cursor, then leave the alternate screen last
        assert!(text.contains("\x1b[?25h"));
        assert!(text.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn leave_screen_keeps_going_after_a_failure() {
        let mut out = Broken::default();
        let err = leave_screen(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(out.attempts >= 3, "only {} writes attempted", out.attempts);
    }
}
