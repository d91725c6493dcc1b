//! Terminal colours for wizard output
//!
//! All colour decisions live here. Wizard replies carry a [`Tone`] and are
//! painted only when written, so the controller itself stays colour-free
//! and tests can compare plain text.

use crossterm::style::{Color, Stylize};

// =============================================================================
// COLOR PALETTE
// =============================================================================

pub struct Colors;

impl Colors {
    /// Validation problems, fatal errors, the exit message (ANSI red)
    pub const ERROR: Color = Color::DarkRed;

    /// Final "installation finished" line (bright green)
    pub const SUCCESS: Color = Color::Green;

    /// Non-fatal problems the user has to act on later
    pub const WARNING: Color = Color::Yellow;
}

// =============================================================================
// TONES
// =============================================================================

/// How a line of wizard output should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

pub struct Theme;

impl Theme {
    /// Render `text` for the terminal. With `color` off the text is returned as-is.
    pub fn paint(tone: Tone, text: &str, color: bool) -> String {
        if !color {
            return text.to_string();
        }
        match tone {
            Tone::Info => text.to_string(),
            Tone::Success => text.with(Colors::SUCCESS).bold().to_string(),
            Tone::Warning => text.with(Colors::WARNING).to_string(),
            Tone::Error => text.with(Colors::ERROR).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_is_untouched() {
        for tone in [Tone::Info, Tone::Success, Tone::Warning, Tone::Error] {
            assert_eq!(Theme::paint(tone, "Skipping download.", false), "Skipping download.");
        }
    }

    #[test]
    fn test_info_never_coloured() {
        assert_eq!(Theme::paint(Tone::Info, "Loading, please wait.", true), "Loading, please wait.");
    }

    #[test]
    fn test_error_keeps_text() {
        let painted = Theme::paint(Tone::Error, "Invalid release.", true);
        assert!(painted.contains("Invalid release."));
    }

    #[test]
    fn test_palette_codes() {
        // 256-colour indices: 1 is red, 10 is bright green
        let error = Theme::paint(Tone::Error, "x", true);
        assert!(error.starts_with("\u{1b}[38;5;1m"), "{:?}", error);

        let success = Theme::paint(Tone::Success, "Installation finished!", true);
        assert!(success.contains("\u{1b}[38;5;10m"), "{:?}", success);
    }
}
