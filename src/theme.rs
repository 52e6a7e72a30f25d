//! Reader color themes.

use console::{Color, Style};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual theme of the reader.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on white.
    #[default]
    Light,
    /// Light text on near-black.
    Dark,
    /// Brown text on cream paper.
    Sepia,
}

/// An sRGB color.
pub type Rgb = (u8, u8, u8);

/// Colors used by a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background.
    pub background: Rgb,
    /// Body text.
    pub text: Rgb,
    /// Header bar.
    pub header: Rgb,
    /// Muted text such as separators and page counters.
    pub secondary_text: Rgb,
}

const LIGHT: Palette = Palette {
    background: (0xFF, 0xFF, 0xFF),
    text: (0x2C, 0x3E, 0x50),
    header: (0xF8, 0xF9, 0xFA),
    secondary_text: (0x6C, 0x75, 0x7D),
};

const DARK: Palette = Palette {
    background: (0x1A, 0x1A, 0x1A),
    text: (0xF8, 0xF9, 0xFA),
    header: (0x2C, 0x3E, 0x50),
    secondary_text: (0xAD, 0xB5, 0xBD),
};

const SEPIA: Palette = Palette {
    background: (0xF4, 0xEC, 0xD8),
    text: (0x5B, 0x46, 0x36),
    header: (0xE4, 0xD5, 0xB7),
    secondary_text: (0x7F, 0x6B, 0x5C),
};

impl Theme {
    /// Next theme in the light → dark → sepia cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Sepia,
            Theme::Sepia => Theme::Light,
        }
    }

    /// Colors for this theme.
    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
            Theme::Sepia => &SEPIA,
        }
    }
}

impl Palette {
    /// Style for page text.
    pub fn body(&self) -> Style {
        Style::new()
            .fg(ansi(self.text))
            .bg(ansi(self.background))
    }

    /// Style for the title bar.
    pub fn title(&self) -> Style {
        Style::new()
            .fg(ansi(self.text))
            .bg(ansi(self.header))
            .bold()
    }

    /// Style for separators and counters.
    pub fn muted(&self) -> Style {
        Style::new()
            .fg(ansi(self.secondary_text))
            .bg(ansi(self.background))
    }
}

fn ansi(rgb: Rgb) -> Color {
    Color::Color256(rgb_to_ansi256(rgb))
}

/// Nearest index in the 256-color terminal palette.
pub fn rgb_to_ansi256((r, g, b): Rgb) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((u16::from(r) - 8) * 24 / 247) as u8
        }
    } else {
        let cube = |c: u8| (u16::from(c) * 5 / 255) as u8;
        16 + 36 * cube(r) + 6 * cube(g) + cube(b)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_to_start() {
        let start = Theme::Light;
        assert_eq!(start.next(), Theme::Dark);
        assert_eq!(start.next().next(), Theme::Sepia);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_palette() {
        assert_eq!(Theme::Sepia.palette().background, (0xF4, 0xEC, 0xD8));
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
    }

    #[test]
    fn test_rgb_to_ansi256() {
        assert_eq!(rgb_to_ansi256((0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256((255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256((0, 122, 255)), 16 + 6 * 2 + 5);
    }

    #[test]
    fn test_body_style_paints_text() {
        let styled = Theme::Dark
            .palette()
            .body()
            .force_styling(true)
            .apply_to("page")
            .to_string();
        assert!(styled.contains("page"));
        assert!(styled.starts_with("\u{1b}["));
        assert!(styled.contains("38;5;"));
    }
}
