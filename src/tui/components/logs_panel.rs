//! Logs panel component
//!
//! Shows the tail of the in-memory log buffer. The buffer is shared with the
//! tracing layer, so the panel only reads from it at render time.

use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::tui::theme::Theme;
use crate::tui::traits::{Component, ComponentId, RenderContext};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    buffer: LogBuffer,
}

impl LogsPanel {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl Component for LogsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Logs
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let height = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = if self.buffer.is_empty() {
            vec![ListItem::new("No log entries yet").style(Style::default().fg(ctx.theme.muted))]
        } else {
            self.buffer
                .tail(height)
                .iter()
                .map(|entry| {
                    ListItem::new(format_log_entry(entry))
                        .style(log_level_style(&entry.level, ctx.theme))
                })
                .collect()
        };

        let border_color = if ctx.is_focused(self.id()) {
            ctx.theme.highlight
        } else {
            ctx.theme.border
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(ctx.theme.border_type)
                .border_style(Style::default().fg(border_color))
                .title(format!(" Logs ({}) ", self.buffer.len())),
        );
        f.render_widget(list, area);
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn log_level_style(level: &LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.warn),
        LogLevel::Info => Style::default().fg(theme.info),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.debug),
    }
}
