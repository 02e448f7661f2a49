//! Screen layout: responsive breakpoints and the panel split.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width classes for layout decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 60 cols: split pane, minimal terminal
    Compact,
    /// 60-99 cols
    Normal,
    /// 100+ cols
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }
}

/// Height of the caption panel including borders
pub const CAPTION_HEIGHT: u16 = 3;
/// Height of the logs panel including borders
pub const LOGS_HEIGHT: u16 = 8;
pub const STATUS_HEIGHT: u16 = 1;

/// Areas for each panel of the grid screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub grid: Rect,
    pub caption: Rect,
    pub logs: Option<Rect>,
    pub status: Rect,
}

impl AppLayout {
    /// Grid on top, then caption, optional logs and the status line
    pub fn split(area: Rect, show_logs: bool) -> Self {
        let mut constraints = vec![Constraint::Min(3), Constraint::Length(CAPTION_HEIGHT)];
        if show_logs {
            constraints.push(Constraint::Length(LOGS_HEIGHT));
        }
        constraints.push(Constraint::Length(STATUS_HEIGHT));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Self {
            grid: chunks[0],
            caption: chunks[1],
            logs: show_logs.then(|| chunks[2]),
            status: chunks[chunks.len() - 1],
        }
    }
}

/// Lines needed to show a grid of `rows` without scrolling: borders, the
/// column header, the rows, then caption and status
pub fn inline_height(rows: usize) -> u16 {
    let grid = rows.min(u16::MAX as usize / 2) as u16 + 3;
    grid + CAPTION_HEIGHT + STATUS_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(59), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(99), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(100), Breakpoint::Wide);
        assert!(Breakpoint::Wide.at_least(Breakpoint::Normal));
        assert!(!Breakpoint::Compact.at_least(Breakpoint::Normal));
    }

    #[test]
    fn split_reserves_fixed_panels() {
        let layout = AppLayout::split(Rect::new(0, 0, 80, 24), false);
        assert_eq!(layout.caption.height, CAPTION_HEIGHT);
        assert_eq!(layout.status.height, STATUS_HEIGHT);
        assert_eq!(layout.status.y, 23);
        assert_eq!(layout.grid.height, 24 - CAPTION_HEIGHT - STATUS_HEIGHT);
        assert!(layout.logs.is_none());

        let with_logs = AppLayout::split(Rect::new(0, 0, 80, 24), true);
        assert_eq!(with_logs.logs.map(|r| r.height), Some(LOGS_HEIGHT));
    }

    #[test]
    fn inline_height_fits_grid_and_chrome() {
        assert_eq!(inline_height(2), 2 + 3 + CAPTION_HEIGHT + STATUS_HEIGHT);
    }
}
