//! Grid panel component
//!
//! Draws the wrapped array as a color-coded grid with axis labels and owns
//! the interactive session for it. Each render records where the cells
//! landed on screen so mouse clicks can be mapped back into grid
//! coordinates.

use crate::array::ArrayError;
use crate::config::GridConfig;
use crate::highlight::{grid_dims, Coord};
use crate::session::{Direction, GridSession, PointerEvent};
use crate::tui::colormap::{text_color, Colormap, Normalizer};
use crate::tui::traits::{Component, ComponentId, Copyable, Handled, Interactive, RenderContext};
use crate::wrapped::WrappedArray;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cell::Cell;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Where the visible cells were drawn on the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Screen position of the top-left visible cell
    pub origin_x: u16,
    pub origin_y: u16,
    pub cell_width: u16,
    /// First visible row and column
    pub row_offset: usize,
    pub col_offset: usize,
    pub visible_rows: usize,
    pub visible_cols: usize,
}

impl GridGeometry {
    /// Convert a terminal position into continuous grid coordinates, or
    /// `None` when the position is outside the drawn cells
    pub fn pointer_at(&self, column: u16, row: u16) -> Option<PointerEvent> {
        let width = self.visible_cols as u16 * self.cell_width;
        let height = self.visible_rows as u16;
        if column < self.origin_x
            || row < self.origin_y
            || column >= self.origin_x + width
            || row >= self.origin_y + height
        {
            return None;
        }

        let dx = (column - self.origin_x) as f64 + 0.5;
        let x = self.col_offset as f64 + dx / self.cell_width as f64 - 0.5;
        let y = (self.row_offset + (row - self.origin_y) as usize) as f64;
        Some(PointerEvent::new(x, y))
    }
}

pub struct GridPanel {
    array: WrappedArray,
    session: GridSession,
    colormap: Colormap,
    normalizer: Normalizer,
    cell_width: u16,
    geometry: Cell<Option<GridGeometry>>,
    /// Scroll offset as (row, col), adjusted during render to keep the
    /// cursor visible
    offset: Cell<(usize, usize)>,
}

impl GridPanel {
    pub fn new(array: WrappedArray, config: &GridConfig) -> Self {
        let colormap = if array.ndim() == 1 {
            Colormap::from_config(&config.vector_colormap, Colormap::Coolwarm)
        } else {
            Colormap::from_config(&config.matrix_colormap, Colormap::Blues)
        };
        let session = GridSession::new(array.array(), config.show_stats);
        let normalizer = Normalizer::for_array(array.array());

        Self {
            array,
            session,
            colormap,
            normalizer,
            cell_width: config.cell_width.max(GridConfig::MIN_CELL_WIDTH),
            geometry: Cell::new(None),
            offset: Cell::new((0, 0)),
        }
    }

    pub fn array(&self) -> &WrappedArray {
        &self.array
    }

    pub fn session(&self) -> &GridSession {
        &self.session
    }

    pub fn caption(&self) -> &str {
        self.session.caption()
    }

    #[cfg(test)]
    pub fn geometry(&self) -> Option<GridGeometry> {
        self.geometry.get()
    }

    /// Handle a left click at a terminal position. Returns `None` when the
    /// click missed the grid, otherwise whether the cell is now highlighted.
    pub fn click(&mut self, column: u16, row: u16) -> Option<Result<bool, ArrayError>> {
        let event = self.geometry.get()?.pointer_at(column, row)?;
        Some(self.session.on_pointer_click(self.array.array(), event))
    }

    fn toggle_cursor(&mut self) {
        if let Err(e) = self.session.toggle_cursor(self.array.array()) {
            tracing::debug!(error = %e, "Cursor toggle ignored");
        }
    }

    /// Scroll so the cursor stays inside the visible window
    fn adjust_offset(&self, visible_rows: usize, visible_cols: usize) -> (usize, usize) {
        let (mut row_off, mut col_off) = self.offset.get();
        let (row, col) = self.session.cursor();
        if visible_rows > 0 {
            if row < row_off {
                row_off = row;
            } else if row >= row_off + visible_rows {
                row_off = row + 1 - visible_rows;
            }
        }
        if visible_cols > 0 {
            if col < col_off {
                col_off = col;
            } else if col >= col_off + visible_cols {
                col_off = col + 1 - visible_cols;
            }
        }
        self.offset.set((row_off, col_off));
        (row_off, col_off)
    }

    fn title(&self) -> String {
        let shape = self
            .array
            .shape()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let shape = if self.array.ndim() == 1 {
            format!("({},)", shape)
        } else {
            format!("({})", shape)
        };
        format!(" array {} {} ", shape, self.array.array().dtype().name())
    }

    fn cell_spans(&self, coord: Coord, cursor_visible: bool, ctx: &RenderContext) -> Vec<Span<'static>> {
        let value = match crate::highlight::value_at(self.array.array(), coord) {
            Ok(v) => v,
            Err(_) => return vec![Span::raw(" ".repeat(self.cell_width as usize))],
        };

        let rgb = self.colormap.rgb(self.normalizer.normalize(value));
        let mut style = Style::default()
            .bg(Color::Rgb(rgb.0, rgb.1, rgb.2))
            .fg(text_color(rgb));
        if cursor_visible && self.session.cursor() == coord {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let inner = self.cell_width.saturating_sub(2) as usize;
        let text = center(&truncate(&value.to_string(), inner), inner);

        if self.session.highlights().contains(coord) {
            let marker = style
                .fg(ctx.theme.selected_cell)
                .add_modifier(Modifier::BOLD);
            vec![
                Span::styled("[", marker),
                Span::styled(text, style.add_modifier(Modifier::BOLD)),
                Span::styled("]", marker),
            ]
        } else {
            vec![Span::styled(format!(" {} ", text), style)]
        }
    }
}

impl Component for GridPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Grid
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let focused = ctx.is_focused(self.id());
        let border_color = if focused {
            ctx.theme.highlight
        } else {
            ctx.theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(ctx.theme.border_type)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(self.title(), ctx.theme.title_style()));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let (rows, cols) = grid_dims(self.array.shape());
        let show_row_labels = self.array.ndim() == 2;
        let gutter = if show_row_labels {
            let widest = self
                .array
                .y_labels()
                .iter()
                .map(|l| l.width())
                .max()
                .unwrap_or(0);
            (widest as u16 + 1).min(inner.width / 3)
        } else {
            0
        };

        let cw = self.cell_width;
        let visible_cols = ((inner.width.saturating_sub(gutter)) / cw) as usize;
        let visible_cols = visible_cols.min(cols);
        let visible_rows = (inner.height.saturating_sub(1) as usize).min(rows);
        let (row_off, col_off) = self.adjust_offset(visible_rows, visible_cols);

        self.geometry.set(Some(GridGeometry {
            origin_x: inner.x + gutter,
            origin_y: inner.y + 1,
            cell_width: cw,
            row_offset: row_off,
            col_offset: col_off,
            visible_rows,
            visible_cols,
        }));

        let label_style = Style::default().fg(ctx.theme.axis_label);
        let mut lines = Vec::with_capacity(visible_rows + 1);

        let mut header = vec![Span::raw(" ".repeat(gutter as usize))];
        for col in col_off..col_off + visible_cols {
            let label = self.array.x_labels().get(col).map(String::as_str).unwrap_or("");
            header.push(Span::styled(
                center(&truncate(label, cw as usize), cw as usize),
                label_style,
            ));
        }
        lines.push(Line::from(header));

        for row in row_off..row_off + visible_rows {
            let mut spans = Vec::with_capacity(visible_cols * 3 + 1);
            if show_row_labels {
                let label = self.array.y_labels().get(row).map(String::as_str).unwrap_or("");
                let width = gutter.saturating_sub(1) as usize;
                spans.push(Span::styled(
                    format!("{} ", pad_left(&truncate(label, width), width)),
                    label_style,
                ));
            }
            for col in col_off..col_off + visible_cols {
                spans.extend(self.cell_spans((row, col), focused, ctx));
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), inner);
    }
}

impl Interactive for GridPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.session.move_cursor(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => self.session.move_cursor(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => self.session.move_cursor(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => self.session.move_cursor(Direction::Right),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_cursor(),
            KeyCode::Char('c') => self.session.clear_highlights(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("click/space:toggle  ←↑↓→:move  c:clear  y:copy  L:logs  q:quit")
    }
}

impl Copyable for GridPanel {
    fn copy_text(&self) -> Option<String> {
        self.session.stats().map(|stats| stats.caption())
    }
}

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

fn pad_left(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::NdArray;
    use crate::tui::theme::Theme;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn panel() -> GridPanel {
        let array = NdArray::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let wrapped = WrappedArray::with_labels(
            array,
            Some(vec!["a".into(), "b".into()]),
            Some(vec!["r0".into(), "r1".into()]),
        )
        .unwrap();
        GridPanel::new(wrapped, &GridConfig::default())
    }

    fn draw(panel: &GridPanel) -> Buffer {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|f| {
                let ctx = RenderContext::new(&theme, ComponentId::Grid);
                panel.render(f, f.area(), &ctx);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn renders_labels_and_values() {
        let panel = panel();
        let text = buffer_text(&draw(&panel));
        assert!(text.contains("array (2, 2) int64"), "{}", text);
        assert!(text.contains("r0"));
        assert!(text.contains("r1"));
        let header = text.lines().nth(1).unwrap();
        assert!(header.contains('a') && header.contains('b'), "{}", header);
        let last_row = text.lines().nth(3).unwrap();
        assert!(last_row.contains('3') && last_row.contains('4'), "{}", last_row);
    }

    #[test]
    fn geometry_places_cells_after_the_row_labels() {
        let panel = panel();
        draw(&panel);
        let geometry = panel.geometry().unwrap();
        // border + "r0 " gutter
        assert_eq!(geometry.origin_x, 4);
        assert_eq!(geometry.origin_y, 2);
        assert_eq!(geometry.visible_cols, 2);
        assert_eq!(geometry.visible_rows, 2);
    }

    #[test]
    fn clicks_map_to_cells() {
        let mut panel = panel();
        draw(&panel);
        let geometry = panel.geometry().unwrap();

        // anywhere inside the second column of the second row
        for dx in 0..geometry.cell_width {
            let column = geometry.origin_x + geometry.cell_width + dx;
            let event = geometry.pointer_at(column, geometry.origin_y + 1).unwrap();
            assert_eq!(event.cell().unwrap(), (1, 1));
        }

        assert!(panel
            .click(geometry.origin_x + 1, geometry.origin_y)
            .unwrap()
            .unwrap());
        assert_eq!(panel.caption(), "Min: 1, Max: 1, Median: 1.0, Mean: 1.00, Std: 0.00, Sum: 1.00");
        assert!(panel.click(0, 0).is_none());
    }

    #[test]
    fn highlighted_cells_are_bracketed() {
        let mut panel = panel();
        draw(&panel);
        let geometry = panel.geometry().unwrap();
        panel.click(geometry.origin_x, geometry.origin_y);
        let text = buffer_text(&draw(&panel));
        assert!(text.contains("[  1   ]"), "{}", text);
        assert!(!text.contains("[  2   ]"));
    }

    #[test]
    fn keyboard_moves_and_toggles() {
        let mut panel = panel();
        let key = |code| KeyEvent::from(code);
        assert_eq!(panel.handle_key(key(KeyCode::Down)), Handled::Yes);
        assert_eq!(panel.handle_key(key(KeyCode::Right)), Handled::Yes);
        assert_eq!(panel.handle_key(key(KeyCode::Char(' '))), Handled::Yes);
        assert!(panel.session().highlights().contains((1, 1)));
        assert_eq!(panel.copy_text().unwrap(), panel.caption());

        assert_eq!(panel.handle_key(key(KeyCode::Char('c'))), Handled::Yes);
        assert!(panel.session().highlights().is_empty());
        assert!(panel.copy_text().is_none());
        assert_eq!(panel.handle_key(key(KeyCode::Char('z'))), Handled::No);
    }

    #[test]
    fn vectors_use_a_single_row_without_row_labels() {
        let panel = GridPanel::new(
            WrappedArray::new(NdArray::from_vec(vec![0.5, 1.5, 2.5])),
            &GridConfig::default(),
        );
        let text = buffer_text(&draw(&panel));
        assert!(text.contains("array (3,) float64"), "{}", text);
        let geometry = panel.geometry().unwrap();
        assert_eq!(geometry.origin_x, 1);
        assert_eq!(geometry.visible_rows, 1);
        assert!(text.contains("1.5"));
    }

    #[test]
    fn long_values_are_truncated() {
        assert_eq!(truncate("123456789", 6), "12345…");
        assert_eq!(truncate("12", 6), "12");
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(pad_left("x", 3), "  x");
    }
}
