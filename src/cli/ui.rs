//! Unified CLI UI components for consistent output
//!
//! Inspired by: cargo, ripgrep

/// ANSI color codes for terminal styling
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const GREEN: &str = "\x1b[32m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
}

/// Check if colors should be enabled
pub fn colors_enabled() -> bool {
    // Respect NO_COLOR and TERM conventions
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

/// Get terminal width, defaulting to 80
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Horizontal rule sized to the terminal, capped at 80 columns
pub fn separator() -> String {
    "─".repeat(terminal_width().min(80))
}

/// Status line printer with consistent formatting
/// Inspired by cargo's output style: `   Compiling foo v0.1.0`
pub struct StatusPrinter {
    use_colors: bool,
}

impl StatusPrinter {
    pub fn new() -> Self {
        Self {
            use_colors: colors_enabled(),
        }
    }

    fn styled(&self, color: &str, bold: bool, text: &str) -> String {
        if self.use_colors {
            let bold_code = if bold { colors::BOLD } else { "" };
            format!("{}{}{}{}", bold_code, color, text, colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, keyword: &str, message: &str) {
        let keyword_styled = self.styled(color, true, &format!("{:>12}", keyword));
        eprintln!("{} {}", keyword_styled, message);
    }

    /// Print an info line: `      Info  some information`
    pub fn info(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_CYAN, keyword, message);
    }

    pub fn warning(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_YELLOW, keyword, message);
    }

    pub fn error(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_RED, keyword, message);
    }

    pub fn success(&self, keyword: &str, message: &str) {
        self.line(colors::GREEN, keyword, message);
    }

    /// Print a dim/secondary info line
    pub fn dim(&self, message: &str) {
        let msg = if self.use_colors {
            format!("{}{}{}", colors::DIM, message, colors::RESET)
        } else {
            message.to_string()
        };
        eprintln!("             {}", msg);
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        let key_styled = self.styled(colors::DIM, false, key);
        eprintln!("  {}: {}", key_styled, value);
    }
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new()
    }
}
