//! Interactive grid session state
//!
//! A session is created for every display of an array. It owns the highlight
//! set, the latest statistics and the caption text, and a keyboard cursor.
//! Pointer coordinates arrive in grid-cell units where cell `i` spans
//! `[i - 0.5, i + 0.5)`.

use crate::array::{ArrayError, NdArray};
use crate::highlight::{caption_for, compute_stats, Coord, HighlightSet, Stats};

/// Placeholder caption shown when statistics are always on and nothing is
/// selected
pub const STATS_PLACEHOLDER: &str = "Click cells to see statistics";

/// A click in continuous grid coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest cell as `(row, col)`. Coordinates left of or above the first
    /// cell, or not finite, map to an out-of-range index error.
    pub fn cell(&self) -> Result<Coord, ArrayError> {
        let col = nearest_index(self.x, 1)?;
        let row = nearest_index(self.y, 0)?;
        Ok((row, col))
    }
}

fn nearest_index(position: f64, axis: usize) -> Result<usize, ArrayError> {
    let index = (position + 0.5).floor();
    if !index.is_finite() || index < 0.0 {
        return Err(ArrayError::IndexOutOfBounds {
            // NaN casts to 0, infinities saturate
            index: index as isize,
            axis,
            size: 0,
        });
    }
    Ok(index as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Per-display interaction state
#[derive(Debug, Clone)]
pub struct GridSession {
    highlights: HighlightSet,
    stats: Option<Stats>,
    caption: String,
    show_stats: bool,
    cursor: Coord,
}

impl GridSession {
    pub fn new(array: &NdArray, show_stats: bool) -> Self {
        let mut session = Self {
            highlights: HighlightSet::for_shape(array.shape()),
            stats: None,
            caption: String::new(),
            show_stats,
            cursor: (0, 0),
        };
        session.update_caption();
        session
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Map a click to a cell and toggle it. Returns whether the cell is
    /// highlighted afterwards.
    pub fn on_pointer_click(
        &mut self,
        array: &NdArray,
        event: PointerEvent,
    ) -> Result<bool, ArrayError> {
        let coord = event.cell()?;
        self.toggle(array, coord)
    }

    /// Toggle a cell and recompute the statistics
    pub fn toggle(&mut self, array: &NdArray, coord: Coord) -> Result<bool, ArrayError> {
        let highlighted = self.highlights.toggle(coord)?;
        self.cursor = coord;
        self.refresh_stats(array)?;
        tracing::debug!(
            row = coord.0,
            col = coord.1,
            highlighted,
            selected = self.highlights.len(),
            "Toggled cell"
        );
        Ok(highlighted)
    }

    /// Toggle the cell under the keyboard cursor
    pub fn toggle_cursor(&mut self, array: &NdArray) -> Result<bool, ArrayError> {
        self.toggle(array, self.cursor)
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
        self.stats = None;
        self.update_caption();
    }

    pub fn refresh_stats(&mut self, array: &NdArray) -> Result<(), ArrayError> {
        self.stats = compute_stats(&self.highlights, array)?;
        self.update_caption();
        Ok(())
    }

    /// Move the cursor one cell, clamped to the grid
    pub fn move_cursor(&mut self, direction: Direction) {
        let (rows, cols) = self.highlights.dims();
        if rows == 0 || cols == 0 {
            return;
        }
        let (row, col) = self.cursor;
        self.cursor = match direction {
            Direction::Up => (row.saturating_sub(1), col),
            Direction::Down => ((row + 1).min(rows - 1), col),
            Direction::Left => (row, col.saturating_sub(1)),
            Direction::Right => (row, (col + 1).min(cols - 1)),
        };
    }

    fn update_caption(&mut self) {
        self.caption = match &self.stats {
            None if self.show_stats => STATS_PLACEHOLDER.to_string(),
            stats => caption_for(stats.as_ref()),
        };
    }
}
