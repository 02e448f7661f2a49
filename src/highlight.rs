//! Highlight set and selection statistics
//!
//! The highlight set is the collection of grid cells the user has clicked.
//! Statistics are a pure function of that set and the array: population
//! mean and standard deviation, median, extremes and the sum.

use crate::array::{ArrayError, DType, NdArray, Scalar};
use std::collections::BTreeSet;
use std::fmt;

/// Grid coordinate as `(row, col)`; rank-1 arrays always use row 0
pub type Coord = (usize, usize);

/// Cells currently marked by the user, bound to a grid size so that every
/// stored coordinate is valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSet {
    rows: usize,
    cols: usize,
    cells: BTreeSet<Coord>,
}

impl HighlightSet {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: BTreeSet::new(),
        }
    }

    /// Empty set sized for an array's display grid
    pub fn for_shape(shape: &[usize]) -> Self {
        let (rows, cols) = grid_dims(shape);
        Self::new(rows, cols)
    }

    /// Add the cell if absent, remove it if present. Returns whether the
    /// cell is highlighted afterwards.
    pub fn toggle(&mut self, coord: Coord) -> Result<bool, ArrayError> {
        let (row, col) = coord;
        if row >= self.rows {
            return Err(ArrayError::IndexOutOfBounds {
                index: row as isize,
                axis: 0,
                size: self.rows,
            });
        }
        if col >= self.cols {
            return Err(ArrayError::IndexOutOfBounds {
                index: col as isize,
                axis: 1,
                size: self.cols,
            });
        }

        if self.cells.remove(&coord) {
            Ok(false)
        } else {
            self.cells.insert(coord);
            Ok(true)
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Rows and columns of the display grid for an array shape. Rank 1 is a
/// single row; unsupported ranks have no grid.
pub fn grid_dims(shape: &[usize]) -> (usize, usize) {
    match shape {
        [n] => (1, *n),
        [rows, cols] => (*rows, *cols),
        _ => (0, 0),
    }
}

/// Value of the array under a grid coordinate
pub fn value_at(array: &NdArray, coord: Coord) -> Result<Scalar, ArrayError> {
    let (row, col) = coord;
    match array.ndim() {
        1 => array.get_at(&[col]),
        _ => array.get_at(&[row, col]),
    }
}

/// Summary statistics over the highlighted cells
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub min: Scalar,
    pub max: Scalar,
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub sum: Scalar,
    pub count: usize,
}

/// Statistics over the highlighted values, or `None` when nothing is
/// highlighted
pub fn compute_stats(set: &HighlightSet, array: &NdArray) -> Result<Option<Stats>, ArrayError> {
    let values = set
        .iter()
        .map(|coord| value_at(array, coord))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(summarize(&values))
}

/// Statistics over a list of values
pub fn summarize(values: &[Scalar]) -> Option<Stats> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    if values.iter().any(|v| v.to_f64().is_nan()) {
        let nan = f64::NAN;
        return Some(Stats {
            min: Scalar::Float(nan),
            max: Scalar::Float(nan),
            median: nan,
            mean: nan,
            std: nan,
            sum: Scalar::Float(nan),
            count,
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let middle = count / 2;
    let median = if count % 2 == 1 {
        sorted[middle].to_f64()
    } else {
        (sorted[middle - 1].to_f64() + sorted[middle].to_f64()) / 2.0
    };

    let floats: Vec<f64> = values.iter().map(|v| v.to_f64()).collect();
    let mean = floats.iter().sum::<f64>() / count as f64;
    let variance = floats.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    let sum_dtype = values[0].dtype().arithmetic(DType::Bool);
    let sum = match sum_dtype {
        DType::Float => Scalar::Float(floats.iter().sum()),
        _ => Scalar::Int(values.iter().fold(0i64, |acc, v| acc.wrapping_add(v.to_i64()))),
    };

    Some(Stats {
        min: sorted[0],
        max: sorted[count - 1],
        median,
        mean,
        std: variance.sqrt(),
        sum,
        count,
    })
}

impl Stats {
    /// Caption text; min/max/median print unrounded, the rest to two decimals
    pub fn caption(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Min: {}, Max: {}, Median: {}, Mean: {:.2}, Std: {:.2}, Sum: {:.2}",
            self.min,
            self.max,
            Scalar::Float(self.median),
            Scalar::Float(self.mean),
            Scalar::Float(self.std),
            self.sum
        )
    }
}

/// Caption for an optional summary; an empty selection clears the caption
pub fn caption_for(stats: Option<&Stats>) -> String {
    stats.map(Stats::caption).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> NdArray {
        NdArray::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()
    }

    #[test]
    fn toggle_twice_restores_set() {
        let mut set = HighlightSet::for_shape(&[2, 3]);
        for row in 0..2 {
            for col in 0..3 {
                let before = set.clone();
                assert!(set.toggle((row, col)).unwrap());
                assert!(!set.toggle((row, col)).unwrap());
                assert_eq!(set, before);
            }
        }
    }

    #[test]
    fn toggle_out_of_range_fails_without_mutation() {
        let mut set = HighlightSet::for_shape(&[2, 3]);
        set.toggle((0, 0)).unwrap();
        let before = set.clone();
        assert!(matches!(
            set.toggle((2, 0)),
            Err(ArrayError::IndexOutOfBounds { axis: 0, .. })
        ));
        assert!(matches!(
            set.toggle((0, 3)),
            Err(ArrayError::IndexOutOfBounds { axis: 1, .. })
        ));
        assert_eq!(set, before);
    }

    #[test]
    fn rank_one_arrays_use_a_single_row() {
        let mut set = HighlightSet::for_shape(&[4]);
        assert_eq!(set.dims(), (1, 4));
        assert!(set.toggle((0, 3)).unwrap());
        assert!(set.toggle((1, 0)).is_err());
    }

    #[test]
    fn empty_selection_has_no_stats() {
        let set = HighlightSet::for_shape(&[2, 3]);
        assert_eq!(compute_stats(&set, &grid()).unwrap(), None);
        assert_eq!(caption_for(None), "");
    }

    #[test]
    fn single_cell_stats_collapse_to_the_value() {
        let mut set = HighlightSet::for_shape(&[2, 3]);
        set.toggle((1, 1)).unwrap();
        let stats = compute_stats(&set, &grid()).unwrap().unwrap();
        assert_eq!(stats.min, Scalar::Int(5));
        assert_eq!(stats.max, Scalar::Int(5));
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn population_statistics() {
        let mut set = HighlightSet::for_shape(&[2, 3]);
        for coord in [(0, 0), (0, 1), (0, 2), (1, 0)] {
            set.toggle(coord).unwrap();
        }
        let stats = compute_stats(&set, &grid()).unwrap().unwrap();
        assert_eq!(stats.min, Scalar::Int(1));
        assert_eq!(stats.max, Scalar::Int(4));
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        // population std of 1..=4 is sqrt(1.25)
        assert!((stats.std - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.sum, Scalar::Int(10));
    }

    #[test]
    fn caption_rounds_only_mean_std_and_sum() {
        let stats = summarize(&[Scalar::Int(1), Scalar::Int(2), Scalar::Int(4)]).unwrap();
        assert_eq!(
            stats.caption(),
            "Min: 1, Max: 4, Median: 2.0, Mean: 2.33, Std: 1.25, Sum: 7.00"
        );
    }

    #[test]
    fn float_values_print_unrounded_extremes() {
        let stats = summarize(&[Scalar::Float(0.125), Scalar::Float(2.5)]).unwrap();
        assert!(stats.caption().starts_with("Min: 0.125, Max: 2.5, Median: 1.3125"));
    }

    #[test]
    fn rank_one_values_are_read_by_column() {
        let array = NdArray::from_vec(vec![7, 8, 9]);
        let mut set = HighlightSet::for_shape(array.shape());
        set.toggle((0, 2)).unwrap();
        let stats = compute_stats(&set, &array).unwrap().unwrap();
        assert_eq!(stats.sum, Scalar::Int(9));
    }

    #[test]
    fn nan_in_selection_poisons_every_field() {
        let numerator = NdArray::from_vec(vec![0.0, 5.0, 1.0]);
        let denominator = NdArray::from_vec(vec![0.0, 1.0, 1.0]);
        let array = numerator
            .binary(crate::array::BinaryOp::Div, &denominator)
            .unwrap();
        let mut set = HighlightSet::for_shape(array.shape());
        for col in 0..3 {
            set.toggle((0, col)).unwrap();
        }
        let stats = compute_stats(&set, &array).unwrap().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(
            stats.caption(),
            "Min: nan, Max: nan, Median: nan, Mean: nan, Std: nan, Sum: nan"
        );
    }
}
