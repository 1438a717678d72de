//! # Output Configuration
//!
//! Controls how the CLI decorates its output. Color follows the `--color`
//! flag; in `auto` mode it is disabled by `NO_COLOR`, `CLICOLOR=0`,
//! `TERM=dumb` or a non-TTY stdout, and forced by `CLICOLOR_FORCE=1`.

use std::env;

use console::Style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// Whether colored markers should be used.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and the `--color`
    /// flag value (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // https://no-color.org/
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Marker for a successful step
    pub fn ok(&self) -> String {
        self.marker("[OK]", Style::new().green().bold())
    }

    /// Marker for an informational line
    pub fn info(&self) -> String {
        self.marker("[INFO]", Style::new().cyan())
    }

    /// Marker for a dry-run line
    pub fn dry_run(&self) -> String {
        self.marker("[DRY-RUN]", Style::new().yellow())
    }

    fn marker(&self, text: &str, style: Style) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
