//! Verbosity globals and display macros.
//!
//! The CLI front end never pulls in a logging crate: diagnostics are a
//! small set of `eprintln!`-based macros gated on a global display level,
//! matching the shape of a typical Unix command-line tool's `-v` handling.
//!
//! Levels: 0 = silent, 1 = errors only, 2 = normal (default), 3 = verbose,
//! 4 = trace (arena chaining, block dispatch).

use std::sync::atomic::{AtomicU32, Ordering};

pub const COMPRESSOR_NAME: &str = "unzipr";

/// 0 = no output; 1 = errors only; 2 = normal; 3 = verbose; 4 = trace.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Print a single diagnostic line in the `[level] (scope): message` format
/// required of every user-visible failure.
pub fn report_error(level: &str, scope: &str, err: &dyn std::error::Error) {
    eprintln!("[{level}] ({scope}): {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_level_default_round_trips() {
        let prev = display_level();
        set_display_level(3);
        assert_eq!(display_level(), 3);
        set_display_level(prev);
    }

    #[test]
    fn compressor_name_constant() {
        assert_eq!(COMPRESSOR_NAME, "unzipr");
    }
}
