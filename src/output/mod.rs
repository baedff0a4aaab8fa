//! User-facing output.
//!
//! Status lines go to stdout through a [`Reporter`], which drops everything in
//! quiet mode. Errors never pass through here; they are printed by
//! [`ErrorContext::display`](crate::core::ErrorContext::display) on stderr and
//! so remain visible with `--quiet`.

pub mod github;

use colored::Colorize;

/// Prints status messages unless quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    /// Create a reporter; `quiet` suppresses all output.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self {
            quiet,
        }
    }

    /// Whether output is suppressed.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// A progress or status line.
    pub fn info(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{} {}", "==>".cyan().bold(), message.as_ref());
        }
    }

    /// A completed step.
    pub fn success(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{} {}", "✓".green().bold(), message.as_ref());
        }
    }

    /// An advisory that never changes the outcome of the run.
    pub fn warn(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{} {}", "warning:".yellow().bold(), message.as_ref());
        }
    }
}
