// Theme system for the grid TUI
//
// Two palettes, picked by name from config or GRIDSCOPE_THEME. Cell
// backgrounds come from the colormap, so the theme only covers chrome:
// borders, captions, logs and the highlight markers.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// Parse a theme name; unknown names fall back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

/// Resolved colors for the TUI chrome
#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    pub border_type: BorderType,

    // ─── Chrome ──────────────────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    /// Focused border
    pub highlight: Color,
    pub title: Color,
    pub muted: Color,
    pub status_bar: Color,

    // ─── Grid ────────────────────────────────────────────────
    /// Marker for highlighted cells
    pub selected_cell: Color,
    pub axis_label: Color,
    pub caption: Color,

    // ─── Log levels ──────────────────────────────────────────
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub debug: Color,
}

impl Theme {
    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::from_kind(ThemeKind::from_name(name))
    }

    fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            border_type: BorderType::Rounded,
            background: Color::Rgb(30, 30, 46),
            foreground: Color::Rgb(205, 214, 244),
            border: Color::Rgb(88, 91, 112),
            highlight: Color::Rgb(137, 180, 250),
            title: Color::Rgb(203, 166, 247),
            muted: Color::Rgb(127, 132, 156),
            status_bar: Color::Rgb(166, 173, 200),
            selected_cell: Color::Rgb(255, 0, 0),
            axis_label: Color::Rgb(249, 226, 175),
            caption: Color::Rgb(166, 227, 161),
            error: Color::Rgb(243, 139, 168),
            warn: Color::Rgb(250, 179, 135),
            info: Color::Rgb(137, 220, 235),
            debug: Color::Rgb(127, 132, 156),
        }
    }

    fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            border_type: BorderType::Plain,
            background: Color::Rgb(239, 241, 245),
            foreground: Color::Rgb(76, 79, 105),
            border: Color::Rgb(156, 160, 176),
            highlight: Color::Rgb(30, 102, 245),
            title: Color::Rgb(136, 57, 239),
            muted: Color::Rgb(140, 143, 161),
            status_bar: Color::Rgb(92, 95, 119),
            selected_cell: Color::Rgb(210, 15, 57),
            axis_label: Color::Rgb(223, 142, 29),
            caption: Color::Rgb(64, 160, 43),
            error: Color::Rgb(210, 15, 57),
            warn: Color::Rgb(254, 100, 11),
            info: Color::Rgb(4, 165, 229),
            debug: Color::Rgb(140, 143, 161),
        }
    }

    /// Style for the title text of focused panels
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_kind(ThemeKind::default())
    }
}
