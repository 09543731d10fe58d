// Dark and light palettes. Each one pairs the terminal chrome colors with the
// raster background that the engine clears and fades toward.

use ratatui::style::Color;

use crate::engine::surface::Rgb;

pub const THEME_DARK: &str = "dark";
pub const THEME_LIGHT: &str = "light";

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Active mode name and panel title.
    pub primary: Color,
    /// Family label.
    pub secondary: Color,
    pub text: Color,
    pub text_dim: Color,
    /// Key hints and the lightning intensity readout.
    pub accent: Color,
    pub border: Color,
    /// Fault counter once a mode has failed to draw.
    pub fault: Color,
    /// Quality indicator while the monitor has scaled work down.
    pub degraded: Color,
    /// Running indicator.
    pub healthy: Color,
    /// Raster clear color.
    pub background: Rgb,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: THEME_DARK,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            text: Color::White,
            text_dim: Color::DarkGray,
            accent: Color::Yellow,
            border: Color::DarkGray,
            fault: Color::Red,
            degraded: Color::Yellow,
            healthy: Color::Green,
            background: Rgb::new(6, 6, 14),
        }
    }

    pub fn light() -> Self {
        Self {
            name: THEME_LIGHT,
            primary: Color::Blue,
            secondary: Color::Magenta,
            text: Color::Black,
            text_dim: Color::DarkGray,
            accent: Color::Rgb(180, 120, 0),
            border: Color::Rgb(180, 180, 180),
            fault: Color::Red,
            degraded: Color::Rgb(180, 120, 0),
            healthy: Color::Rgb(0, 140, 60),
            background: Rgb::new(226, 230, 240),
        }
    }

    /// Unknown names fall back to the dark palette.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(THEME_LIGHT) {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn is_light(&self) -> bool {
        self.name == THEME_LIGHT
    }

    pub fn toggled(&self) -> Self {
        if self.is_light() {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
