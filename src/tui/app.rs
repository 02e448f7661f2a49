// App state for the grid TUI
//
// App owns the panels and routes input: global keys first (quit, logs on
// shift-L, copy), then the focused grid panel. Mouse clicks go straight to the grid's
// hit test.

use super::clipboard;
use super::components::{caption_bar, status_bar, GridPanel, LogsPanel, Toast};
use super::layout::AppLayout;
use super::theme::Theme;
use super::traits::{Component, ComponentId, Copyable, Handled, Interactive, RenderContext};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::wrapped::WrappedArray;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;

pub struct App {
    pub grid: GridPanel,
    pub logs_panel: LogsPanel,
    pub theme: Theme,
    pub toast: Option<Toast>,
    pub show_logs: bool,
    pub should_quit: bool,
    focus: ComponentId,
}

impl App {
    pub fn new(array: WrappedArray, config: &Config, log_buffer: LogBuffer) -> Self {
        Self {
            grid: GridPanel::new(array, &config.grid),
            logs_panel: LogsPanel::new(log_buffer),
            theme: Theme::from_name(&config.theme),
            toast: None,
            show_logs: false,
            should_quit: false,
            focus: ComponentId::Grid,
        }
    }

    /// Periodic housekeeping between events
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('L') => self.show_logs = !self.show_logs,
            KeyCode::Char('y') => self.copy_caption(),
            _ => {
                if self.grid.handle_key(key) == Handled::No {
                    tracing::trace!(code = ?key.code, "Unhandled key");
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        match self.grid.click(mouse.column, mouse.row) {
            Some(Ok(highlighted)) => {
                tracing::debug!(highlighted, "Cell clicked");
            }
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Click outside array bounds");
            }
            None => {}
        }
    }

    fn copy_caption(&mut self) {
        let message = match self.grid.copy_text() {
            Some(text) => match clipboard::copy_to_clipboard(&text) {
                Ok(()) => "Copied statistics".to_string(),
                Err(e) => {
                    tracing::warn!("Clipboard copy failed: {:#}", e);
                    "Clipboard unavailable".to_string()
                }
            },
            None => "Nothing selected".to_string(),
        };
        self.toast = Some(Toast::new(message));
    }

    pub fn draw(&self, f: &mut Frame) {
        let layout = AppLayout::split(f.area(), self.show_logs);
        let ctx = RenderContext::new(&self.theme, self.focus);

        self.grid.render(f, layout.grid, &ctx);
        caption_bar::render(f, layout.caption, self.grid.caption(), &self.theme);
        if let Some(area) = layout.logs {
            self.logs_panel.render(f, area, &ctx);
        }
        status_bar::render(f, layout.status, self);

        if let Some(toast) = &self.toast {
            toast.render(f, f.area(), &self.theme);
        }
    }
}
