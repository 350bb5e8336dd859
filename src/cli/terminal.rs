//! Output width for wrapping help text.
//!
//! Resolution order, first usable answer wins:
//! 1. `COLUMNS` holding a positive integer
//! 2. the geometry of stdout, when stdout is a terminal
//! 3. 80 columns, when stdout is a terminal whose geometry is unknown
//! 4. no wrapping
//!
//! Detection errors only mean a step produced nothing; they never fail the help render.

use std::io::{self, IsTerminal};
use tracing::trace;

/// Environment variable that fixes the output width
pub const WIDTH_ENV: &str = "COLUMNS";

/// Width used for a terminal of unknown size
pub const FALLBACK_COLUMNS: usize = 80;

/// Width to wrap help text to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalWidth {
    Columns(usize),
    Unbounded,
}

impl TerminalWidth {
    pub fn columns(self) -> Option<usize> {
        match self {
            TerminalWidth::Columns(c) => Some(c),
            TerminalWidth::Unbounded => None,
        }
    }
}

/// Inputs the resolver reads. Implemented over the real process for the binary and by fakes in
/// tests.
pub trait TerminalProbe {
    /// Raw value of the width override variable
    fn width_override(&self) -> Option<String>;

    /// Whether stdout is connected to a terminal
    fn is_terminal(&self) -> bool;

    /// Column count reported by the terminal
    fn geometry(&self) -> io::Result<u16>;
}

/// Probe of the current process's environment and stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProbe;

impl TerminalProbe for StdoutProbe {
    fn width_override(&self) -> Option<String> {
        std::env::var(WIDTH_ENV).ok()
    }

    fn is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }

    /// crossterm reads the window size of the controlling terminal (`/dev/tty`), not of fd 1, and
    /// falls back to running `tput` when that ioctl fails. Only called once stdout is known to be
    /// a terminal, so both name the same device in practice.
    fn geometry(&self) -> io::Result<u16> {
        crossterm::terminal::size().map(|(columns, _rows)| columns)
    }
}

type Step = fn(&dyn TerminalProbe) -> Option<usize>;

const RESOLUTION_ORDER: [(&str, Step); 3] = [
    ("override", from_override),
    ("geometry", from_geometry),
    ("terminal default", terminal_default),
];

/// Resolve the help text width.
pub fn resolve_width(probe: &dyn TerminalProbe) -> TerminalWidth {
    RESOLUTION_ORDER
        .iter()
        .find_map(|(name, step)| {
            let columns = step(probe)?;
            trace!(step = *name, columns, "resolved help width");
            Some(columns)
        })
        .map(TerminalWidth::Columns)
        .unwrap_or(TerminalWidth::Unbounded)
}

fn from_override(probe: &dyn TerminalProbe) -> Option<usize> {
    probe
        .width_override()?
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|columns| *columns > 0)
}

fn from_geometry(probe: &dyn TerminalProbe) -> Option<usize> {
    if !probe.is_terminal() {
        return None;
    }
    match probe.geometry() {
        Ok(0) => None,
        Ok(columns) => Some(usize::from(columns)),
        Err(e) => {
            trace!(error = %e, "terminal geometry unavailable");
            None
        }
    }
}

fn terminal_default(probe: &dyn TerminalProbe) -> Option<usize> {
    probe.is_terminal().then_some(FALLBACK_COLUMNS)
}
