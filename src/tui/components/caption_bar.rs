// Caption bar component
//
// One line of selection statistics under the grid. Recomputing statistics
// only changes this panel.

use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, caption: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(" Statistics ");

    let paragraph = Paragraph::new(caption.to_string())
        .style(Style::default().fg(theme.caption))
        .block(block);
    f.render_widget(paragraph, area);
}
