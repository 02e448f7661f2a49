// Status bar component
//
// Key hints plus selection count and array size. Narrow terminals get the
// short form.

use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use crate::tui::traits::Interactive;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(
        Paragraph::new(status_text(app, area.width)).style(Style::default().fg(app.theme.status_bar)),
        area,
    );
}

pub fn status_text(app: &App, width: u16) -> String {
    let bp = Breakpoint::from_width(width);
    let highlights = app.grid.session().highlights();
    let selected = if highlights.is_empty() {
        "nothing selected".to_string()
    } else {
        format!("{} selected", highlights.len())
    };

    if !bp.at_least(Breakpoint::Normal) {
        return format!(" {} │ q:quit y:copy L:logs", selected);
    }

    let hint = app.grid.focus_hint().unwrap_or("q:quit");
    if !bp.at_least(Breakpoint::Wide) {
        return format!(" {} │ {}", selected, hint);
    }

    format!(
        " {} │ {} bytes │ {}",
        selected,
        app.grid.array().nbytes(),
        hint
    )
}
