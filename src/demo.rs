// Demo arrays for trying the grid without an input file
//
// Run with: gridscope grid --demo table

use crate::array::{ArrayError, NdArray, Scalar};
use crate::wrapped::WrappedArray;

/// Built-in sample arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoKind {
    /// Signed values in a single row (diverging colormap)
    Vector,
    /// Multiplication table with 1-based labels
    Table,
    /// 2x2x2 cube, which the grid refuses to draw
    Cube,
}

const VECTOR: [i64; 8] = [3, -1, 4, 1, -5, 9, 2, -6];
const TABLE_SIZE: usize = 6;

pub fn demo_array(kind: DemoKind) -> Result<WrappedArray, ArrayError> {
    match kind {
        DemoKind::Vector => Ok(WrappedArray::new(NdArray::from_vec(VECTOR.to_vec()))),
        DemoKind::Table => {
            let rows: Vec<Vec<i64>> = (1..=TABLE_SIZE as i64)
                .map(|r| (1..=TABLE_SIZE as i64).map(|c| r * c).collect())
                .collect();
            let labels: Vec<String> = (1..=TABLE_SIZE).map(|i| i.to_string()).collect();
            WrappedArray::with_labels(
                NdArray::from_rows(rows)?,
                Some(labels.clone()),
                Some(labels),
            )
        }
        DemoKind::Cube => {
            let data = (0..8).map(Scalar::Int).collect();
            NdArray::from_shape_vec(vec![2, 2, 2], data).map(WrappedArray::new)
        }
    }
}
