//! Console output with colored prefixes.
//!
//! - `log!` macro for `[module] message` lines
//! - `debug!` macro, only printed with `--verbose`
//! - `success()` for `✓` summary lines
//!
//! # Example
//!
//! ```ignore
//! log!("error"; "{} not found", path.display());
//! debug!("rewrite"; "replaced {} tags", count);
//! ```

use owo_colors::{OwoColorize, Stream::Stdout};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Print a summary line with a green `✓`.
pub fn success(message: &str) {
    let mark = "✓".if_supports_color(Stdout, |t| t.green()).to_string();
    let mut stdout = stdout().lock();
    writeln!(stdout, "{mark} {message}").ok();
    stdout.flush().ok();
}

/// Print a plain line (no prefix).
pub fn plain(message: &str) {
    let mut stdout = stdout().lock();
    writeln!(stdout, "{message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix
            .if_supports_color(Stdout, |t| t.bright_red().bold().to_string())
            .to_string(),
        "config" => prefix
            .if_supports_color(Stdout, |t| t.bright_blue().bold().to_string())
            .to_string(),
        _ => prefix
            .if_supports_color(Stdout, |t| t.bright_yellow().bold().to_string())
            .to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_prefix_keeps_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("error"), "[error]");
        assert_eq!(colorize_prefix("migrate"), "[migrate]");
        owo_colors::unset_override();
    }
}
