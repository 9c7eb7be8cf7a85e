//! TUI rendering for Nebula using ratatui.
//!
//! The screen is one scrolling pane: transcript lines followed by the prompt
//! and the draft input, like a plain terminal. Lines are wrapped here rather
//! than by the paragraph widget so the cursor position is exact.

mod input;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Insets, Theme};

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use nebula_engine::{SettingsStore, Shell};

/// View state owned by the front-end: theme and scrollback position.
#[derive(Debug, Clone, Default)]
pub struct Ui {
    theme: Theme,
    /// Rows scrolled up from the bottom of the transcript.
    scroll_back: u16,
    /// Rows that did not fit on the last draw.
    overflow: u16,
}

impl Ui {
    #[must_use]
    pub fn new(settings: &SettingsStore) -> Self {
        Self {
            theme: Theme::from_settings(settings),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Re-derive display parameters after a settings change.
    pub fn refresh_theme(&mut self, settings: &SettingsStore) {
        self.theme = Theme::from_settings(settings);
        tracing::debug!("Theme refreshed from settings");
    }

    pub fn scroll_up(&mut self) {
        self.scroll_back = self
            .scroll_back
            .saturating_add(self.theme.scroll_lines)
            .min(self.overflow);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(self.theme.scroll_lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }

    #[must_use]
    pub fn scroll_back(&self) -> u16 {
        self.scroll_back
    }
}

/// Main draw function
pub fn draw(frame: &mut Frame, shell: &Shell, ui: &mut Ui) {
    let theme = ui.theme;
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let area = inset(inset(frame.area(), theme.margin), theme.padding);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for event in shell.transcript().events() {
        let style = theme.style_for(event.style());
        for raw in event.text().split('\n') {
            lines.extend(wrap_segments(&[(raw, style)], area.width));
        }
    }

    let mut cursor = None;
    if shell.is_ready() {
        let prompt = shell.prompt();
        let input = shell.input();
        let row = lines.len();
        let offset = display_width(&prompt) + display_width(input.before_cursor());
        lines.extend(wrap_segments(
            &[(&prompt, theme.prompt_style()), (input.text(), theme.base())],
            area.width,
        ));
        let width = usize::from(area.width);
        cursor = Some((row + offset / width, offset % width));
        // The cursor may sit one past the last wrapped row.
        if let Some((cursor_row, _)) = cursor
            && cursor_row >= lines.len()
        {
            lines.push(Line::default());
        }
    }

    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    ui.overflow = total.saturating_sub(area.height);
    ui.scroll_back = ui.scroll_back.min(ui.overflow);
    let top = ui.overflow - ui.scroll_back;

    let paragraph = Paragraph::new(lines)
        .style(theme.base())
        .scroll((top, 0));
    frame.render_widget(paragraph, area);

    if let Some((row, col)) = cursor {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        if row >= top && row - top < area.height {
            let col = u16::try_from(col).unwrap_or(0);
            frame.set_cursor_position(Position::new(area.x + col, area.y + row - top));
        }
    }
}

fn inset(area: Rect, by: Insets) -> Rect {
    let horizontal = by.horizontal.min(area.width / 2);
    let vertical = by.vertical.min(area.height / 2);
    Rect {
        x: area.x + horizontal,
        y: area.y + vertical,
        width: area.width - horizontal * 2,
        height: area.height - vertical * 2,
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Hard-wrap styled segments into rows of at most `width` columns.
///
/// Always yields at least one row so empty lines keep their place.
fn wrap_segments(segments: &[(&str, Style)], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for (text, style) in segments {
        let mut run = String::new();
        for c in text.chars() {
            let w = match c {
                '\t' => 1,
                c => c.width().unwrap_or(0),
            };
            if used + w > width && used > 0 {
                if !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), *style));
                }
                rows.push(Line::from(std::mem::take(&mut spans)));
                used = 0;
            }
            run.push(if c == '\t' { ' ' } else { c });
            used += w;
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, *style));
        }
    }
    rows.push(Line::from(spans));
    rows
}
