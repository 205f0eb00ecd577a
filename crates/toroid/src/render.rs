//! # Terminal Rendering
//!
//! ```text
//! <clear>
//!  Time Steps: 2
//! -----
//! --@--
//! --@--
//! --@--
//! -----
//! <pause> <clear unless last>
//! ```

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use toroid_core::{Frame, FrameObserver};

/// ANSI: clear screen, cursor home.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Text of one frame: a header counting from 1, then the grid.
#[must_use]
pub fn format_frame(frame: &Frame<'_>) -> String {
    format!("\n Time Steps: {}\n{}", frame.generation + 1, frame.grid)
}

/// Draws frames to a terminal-like writer.
///
/// Frames are written in full before the pause so the screen never shows a
/// half-drawn grid. The last frame stays on screen.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
    delay: Duration,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer on standard output.
    #[must_use]
    pub fn stdout(delay: Duration) -> Self {
        Self::new(io::stdout(), delay)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Renderer on `out`, pausing `delay` after each frame.
    #[must_use]
    pub fn new(out: W, delay: Duration) -> Self {
        Self {
            out: Mutex::new(out),
            delay,
        }
    }

    /// The pause after each frame.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Takes the writer back.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn draw(&self, frame: &Frame<'_>) -> io::Result<()> {
        {
            let mut out = self.out.lock();
            out.write_all(CLEAR_SCREEN.as_bytes())?;
            out.write_all(format_frame(frame).as_bytes())?;
            out.flush()?;
        }

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        if !frame.is_last {
            let mut out = self.out.lock();
            out.write_all(CLEAR_SCREEN.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}

impl<W: Write + Send> FrameObserver for TerminalRenderer<W> {
    fn on_frame(&self, frame: Frame<'_>) {
        // Drawing failures are logged, not fatal.
        if let Err(e) = self.draw(&frame) {
            tracing::warn!(generation = frame.generation, error = %e, "frame not drawn");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toroid_core::{Board, Cell};

    fn blinker() -> toroid_core::Grid {
        let mut board = Board::new(5, 5).unwrap();
        for col in 1..=3 {
            board.set(1, col, Cell::Alive).unwrap();
        }
        board.to_grid()
    }

    #[test]
    fn test_format_frame() {
        let grid = blinker();
        let frame = Frame {
            generation: 0,
            is_last: false,
            grid: &grid,
        };
        assert_eq!(
            format_frame(&frame),
            "\n Time Steps: 1\n-----\n-@@@-\n-----\n-----\n-----\n"
        );
    }

    #[test]
    fn test_last_frame_stays_on_screen() {
        let grid = blinker();
        let renderer = TerminalRenderer::new(Vec::new(), Duration::ZERO);

        renderer.on_frame(Frame {
            generation: 0,
            is_last: false,
            grid: &grid,
        });
        renderer.on_frame(Frame {
            generation: 1,
            is_last: true,
            grid: &grid,
        });

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text.matches(CLEAR_SCREEN).count(), 3);
        assert!(text.ends_with("-----\n"));
        assert!(text.contains(" Time Steps: 2\n"));
    }
}
