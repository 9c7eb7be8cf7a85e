//! Display parameters derived from the settings store.
//!
//! Only the settings a character terminal can honor are used. Font family,
//! font size and antialiasing belong to the terminal emulator and are ignored
//! here; `transparency` maps to the terminal's own background.

use crossterm::cursor::SetCursorStyle;
use ratatui::style::{Color, Modifier, Style};

use nebula_engine::{OutputStyle, SettingsStore};
use nebula_types::{CursorShape, SettingKey};

/// Accent colors that are not user configurable.
mod colors {
    use super::Color;

    pub const PATH: Color = Color::Rgb(127, 180, 202);
    pub const ERROR: Color = Color::Rgb(255, 93, 98);
    pub const SUCCESS: Color = Color::Rgb(152, 187, 108);
    pub const PROMPT: Color = Color::Rgb(230, 195, 132);

    pub const FALLBACK_FG: Color = Color::White;
    pub const FALLBACK_BG: Color = Color::Black;
}

/// Pixel settings are converted to cells with these ratios.
const PIXELS_PER_COLUMN: i64 = 5;
const PIXELS_PER_ROW: i64 = 10;

/// Transcript lines moved per `PageUp`/`PageDown` at `scroll_speed = 1.0`.
const BASE_SCROLL_LINES: f64 = 5.0;

/// Space around the transcript, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub horizontal: u16,
    pub vertical: u16,
}

impl Insets {
    fn from_pixels(px: i64) -> Self {
        let cells = |ratio: i64| u16::try_from((px / ratio).max(0)).unwrap_or(u16::MAX);
        Self {
            horizontal: cells(PIXELS_PER_COLUMN),
            vertical: cells(PIXELS_PER_ROW),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub foreground: Color,
    pub background: Color,
    pub path: Color,
    pub error: Color,
    pub success: Color,
    pub prompt: Color,
    pub cursor_shape: CursorShape,
    pub cursor_blink: bool,
    pub padding: Insets,
    pub margin: Insets,
    pub scroll_lines: u16,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_settings(&SettingsStore::new())
    }
}

impl Theme {
    #[must_use]
    pub fn from_settings(settings: &SettingsStore) -> Self {
        let color = |key: SettingKey, fallback: Color| {
            settings
                .text(key)
                .and_then(parse_color)
                .unwrap_or(fallback)
        };
        let transparent = settings.flag(SettingKey::Transparency).unwrap_or(false);
        let background = if transparent {
            Color::Reset
        } else {
            color(SettingKey::BackgroundColor, colors::FALLBACK_BG)
        };
        let speed = settings.float(SettingKey::ScrollSpeed).unwrap_or(1.0);

        Self {
            foreground: color(SettingKey::FontColor, colors::FALLBACK_FG),
            background,
            path: colors::PATH,
            error: colors::ERROR,
            success: colors::SUCCESS,
            prompt: colors::PROMPT,
            cursor_shape: settings.cursor_shape(),
            cursor_blink: settings.flag(SettingKey::CursorBlink).unwrap_or(true),
            padding: Insets::from_pixels(settings.int(SettingKey::Padding).unwrap_or(0)),
            margin: Insets::from_pixels(settings.int(SettingKey::Margin).unwrap_or(0)),
            scroll_lines: scroll_lines(speed),
        }
    }

    #[must_use]
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    #[must_use]
    pub fn style_for(&self, style: OutputStyle) -> Style {
        let base = self.base();
        match style {
            OutputStyle::Plain => base,
            OutputStyle::Bold => base.add_modifier(Modifier::BOLD),
            OutputStyle::Command => base.fg(self.prompt),
            OutputStyle::Path => base.fg(self.path),
            OutputStyle::Error => base.fg(self.error),
            OutputStyle::Success => base.fg(self.success),
        }
    }

    #[must_use]
    pub fn prompt_style(&self) -> Style {
        self.base().fg(self.prompt).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor_style(&self) -> SetCursorStyle {
        match (self.cursor_shape, self.cursor_blink) {
            (CursorShape::Block, true) => SetCursorStyle::BlinkingBlock,
            (CursorShape::Block, false) => SetCursorStyle::SteadyBlock,
            (CursorShape::Underline, true) => SetCursorStyle::BlinkingUnderScore,
            (CursorShape::Underline, false) => SetCursorStyle::SteadyUnderScore,
            (CursorShape::Ibeam, true) => SetCursorStyle::BlinkingBar,
            (CursorShape::Ibeam, false) => SetCursorStyle::SteadyBar,
        }
    }
}

/// Named colors (`cyan`, `light_blue`), `#rrggbb`, or a 256-color index.
fn parse_color(raw: &str) -> Option<Color> {
    match raw.trim().parse::<Color>() {
        Ok(color) => Some(color),
        Err(_) => {
            tracing::warn!(color = raw, "Unrecognized color, using default");
            None
        }
    }
}

fn scroll_lines(speed: f64) -> u16 {
    (BASE_SCROLL_LINES * speed).round().clamp(1.0, f64::from(u16::MAX)) as u16
}
