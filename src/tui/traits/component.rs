//! Core component trait

use crate::tui::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Identifier for each panel, used for focus tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Grid,
    Logs,
}

/// Immutable context passed to components during rendering
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    /// Which component currently has focus
    pub focus: ComponentId,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme, focus: ComponentId) -> Self {
        Self { theme, focus }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.focus == id
    }
}

/// Anything that can render itself into a frame area
pub trait Component {
    fn id(&self) -> ComponentId;

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext);
}
