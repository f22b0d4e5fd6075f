use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// ANSI color codes for CLI output; all empty when disabled.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub error: &'static str,
    pub warning: &'static str,
    /// `[path]` headers
    pub header: &'static str,
    /// Property names
    pub key: &'static str,
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                error: "\x1b[31m",   // Red
                warning: "\x1b[33m", // Yellow
                header: "\x1b[1;36m", // Bold cyan
                key: "\x1b[32m",     // Green
                enabled: true,
            }
        } else {
            Self {
                error: "",
                warning: "",
                header: "",
                key: "",
                enabled: false,
            }
        }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled {
            RESET
        } else {
            ""
        }
    }

    /// Wrap `text` in `color` and a reset.
    pub fn paint(&self, color: &str, text: &str) -> String {
        format!("{color}{text}{}", self.reset())
    }
}

pub fn should_use_colors(force_color: bool, no_color: bool) -> bool {
    // Priority: --no-color > --color > NO_COLOR env > TTY detection
    if no_color {
        return false;
    }
    if force_color {
        return true;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_terminal()
}
