//! Console report sink

use crate::report::{Reporter, Verbosity};
use std::io::Write;

/// Prints report lines to stdout as they arrive
pub struct ConsoleReporter {
    level: Verbosity,
}

impl ConsoleReporter {
    pub fn new(level: Verbosity) -> Self {
        Self { level }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, message: &str, level: Verbosity) {
        if level < self.level {
            return;
        }
        // stdout lock keeps concurrent lines whole
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", message);
    }
}
