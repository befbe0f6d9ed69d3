//! Operator-facing messages.
//!
//! These are what the person at the terminal reads (step done lines, the
//! final banner, the abort diagnostic). Diagnostics for developers go through
//! `tracing` instead.

use colored::Colorize;

/// Sink for operator-facing messages.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Colored terminal output: info on stdout, warn/error on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{}", message.green());
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.red());
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
