//! Progress reporting.
//!
//! The engine reports the attempt index through an injected reporter instead
//! of mutating shared state; reporters must not affect control flow.

use colored::Colorize;
use std::io::Write;

/// Observer for probe progress.
pub trait ProgressReporter {
    /// Called once before the first attempt.
    fn init(&mut self, total: usize);

    /// Called after every attempt with the 1-based attempt index.
    fn progress(&mut self, current: usize, total: usize);
}

/// Carriage-return progress bar on stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleProgress {
    width: usize,
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn init(&mut self, total: usize) {
        self.progress(0, total);
    }

    fn progress(&mut self, current: usize, total: usize) {
        let filled = if total == 0 {
            self.width
        } else {
            self.width * current / total
        };
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(self.width - filled)
        );
        let mut stderr = std::io::stderr().lock();
        let _ = write!(
            stderr,
            "\r{} {current:>width$}/{total}",
            bar.cyan(),
            width = total.to_string().len()
        );
        if current >= total {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    }
}

/// No-op reporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn init(&mut self, _total: usize) {}
    fn progress(&mut self, _current: usize, _total: usize) {}
}
