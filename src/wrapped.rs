//! Wrapped array: a numeric buffer plus axis labels
//!
//! This is the user-facing type of the grid viewer. Arithmetic and
//! comparisons produce fresh wrapped arrays with default labels, indexing
//! hands back either a wrapped sub-array or a bare scalar, and `display()`
//! opens an interactive grid session for rank-1 and rank-2 arrays.

use crate::array::{
    ArrayError, BinaryOp, CompareOp, ElementwiseOp, Item, NdArray, Operand, Scalar,
};
use crate::config::Config;
use crate::logging::LogBuffer;
use std::borrow::Cow;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Either a wrapped sub-array or a single element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Array(WrappedArray),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedArray {
    array: NdArray,
    /// Column labels (rank 2) or element labels (rank 1)
    x_labels: Vec<String>,
    /// Row labels, rank 2 only
    y_labels: Vec<String>,
}

impl WrappedArray {
    /// Wrap an array with index labels on each displayed axis
    pub fn new(array: NdArray) -> Self {
        let (x_labels, y_labels) = default_labels(array.shape());
        Self {
            array,
            x_labels,
            y_labels,
        }
    }

    /// Wrap an array with custom labels. Each given label sequence must match
    /// the length of the axis it labels; omitted ones default to indices.
    pub fn with_labels(
        array: NdArray,
        x_labels: Option<Vec<String>>,
        y_labels: Option<Vec<String>>,
    ) -> Result<Self, ArrayError> {
        let mut wrapped = Self::new(array);
        let (x_axis, y_axis) = match wrapped.array.ndim() {
            1 => (Some(0), None),
            2 => (Some(1), Some(0)),
            _ => (None, None),
        };

        if let Some(labels) = x_labels {
            let axis = x_axis.unwrap_or(0);
            check_labels(wrapped.array.shape(), axis, &labels)?;
            wrapped.x_labels = labels;
        }
        if let Some(labels) = y_labels {
            let axis = y_axis.unwrap_or(wrapped.array.ndim());
            check_labels(wrapped.array.shape(), axis, &labels)?;
            wrapped.y_labels = labels;
        }
        Ok(wrapped)
    }

    pub fn array(&self) -> &NdArray {
        &self.array
    }

    pub fn into_inner(self) -> NdArray {
        self.array
    }

    pub fn shape(&self) -> &[usize] {
        self.array.shape()
    }

    pub fn ndim(&self) -> usize {
        self.array.ndim()
    }

    pub fn x_labels(&self) -> &[String] {
        &self.x_labels
    }

    pub fn y_labels(&self) -> &[String] {
        &self.y_labels
    }

    /// Buffer size in bytes
    pub fn nbytes(&self) -> usize {
        self.array.nbytes()
    }

    /// Whether `display()` can draw this array as a grid
    pub fn is_displayable(&self) -> bool {
        matches!(self.ndim(), 1 | 2)
    }

    /// Open an interactive grid session for this array.
    ///
    /// Ranks other than 1 and 2 print a notice and draw nothing. Each call
    /// starts from an empty selection; `clear` wipes the screen first.
    pub async fn display(
        &self,
        config: &Config,
        log_buffer: LogBuffer,
        clear: bool,
    ) -> anyhow::Result<()> {
        if !self.is_displayable() {
            tracing::warn!(shape = ?self.shape(), "Cannot display array");
            println!("Array dimensions not supported.");
            return Ok(());
        }

        crate::tui::run_grid(self.clone(), config, log_buffer, clear).await
    }

    /// Index the leading axes: a partial index returns a wrapped sub-array,
    /// a complete one returns the element itself
    pub fn get(&self, index: &[isize]) -> Result<Element, ArrayError> {
        Ok(match self.array.select(index)? {
            Item::Array(array) => Element::Array(WrappedArray::new(array)),
            Item::Scalar(value) => Element::Scalar(value),
        })
    }

    /// Overwrite the indexed region in place
    pub fn set<'a>(
        &mut self,
        index: &[isize],
        value: impl Into<Operand<'a>>,
    ) -> Result<(), ArrayError> {
        self.array.assign(index, value)
    }

    /// Sum everything (`None`) or along one axis
    pub fn sum(&self, axis: Option<usize>) -> Result<WrappedArray, ArrayError> {
        self.array.sum(axis).map(WrappedArray::new)
    }

    /// Apply any elementwise operator; the result carries no labels
    pub fn apply<'a>(
        &self,
        op: ElementwiseOp,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<WrappedArray, ArrayError> {
        self.array.apply(op, rhs).map(WrappedArray::new)
    }

    pub fn pow<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Binary(BinaryOp::Pow), rhs)
    }

    pub fn equal<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Compare(CompareOp::Eq), rhs)
    }

    pub fn not_equal<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Compare(CompareOp::Ne), rhs)
    }

    pub fn less<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Compare(CompareOp::Lt), rhs)
    }

    pub fn less_equal<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Compare(CompareOp::Le), rhs)
    }

    pub fn greater<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Compare(CompareOp::Gt), rhs)
    }

    pub fn greater_equal<'a>(
        &self,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<WrappedArray, ArrayError> {
        self.apply(ElementwiseOp::Compare(CompareOp::Ge), rhs)
    }
}

fn default_labels(shape: &[usize]) -> (Vec<String>, Vec<String>) {
    let indices = |n: usize| (0..n).map(|i| i.to_string()).collect::<Vec<_>>();
    match shape {
        [n] => (indices(*n), Vec::new()),
        [rows, cols] => (indices(*cols), indices(*rows)),
        _ => (Vec::new(), Vec::new()),
    }
}

fn check_labels(shape: &[usize], axis: usize, labels: &[String]) -> Result<(), ArrayError> {
    let expected = shape.get(axis).copied().unwrap_or(0);
    if labels.len() != expected {
        return Err(ArrayError::LabelLengthMismatch {
            axis,
            expected,
            actual: labels.len(),
        });
    }
    Ok(())
}

impl From<NdArray> for WrappedArray {
    fn from(array: NdArray) -> Self {
        WrappedArray::new(array)
    }
}

/// A wrapped operand is unwrapped before combining
impl<'a> From<&'a WrappedArray> for Operand<'a> {
    fn from(wrapped: &'a WrappedArray) -> Self {
        Operand::Array(Cow::Borrowed(&wrapped.array))
    }
}

macro_rules! arithmetic_operator {
    ($trait:ident, $method:ident, $op:expr, [$($scalar:ty),*]) => {
        impl<'b> $trait<&'b WrappedArray> for &WrappedArray {
            type Output = Result<WrappedArray, ArrayError>;

            fn $method(self, rhs: &'b WrappedArray) -> Self::Output {
                self.apply(ElementwiseOp::Binary($op), rhs)
            }
        }

        impl<'b> $trait<&'b NdArray> for &WrappedArray {
            type Output = Result<WrappedArray, ArrayError>;

            fn $method(self, rhs: &'b NdArray) -> Self::Output {
                self.apply(ElementwiseOp::Binary($op), rhs)
            }
        }

        $(
            impl $trait<$scalar> for &WrappedArray {
                type Output = Result<WrappedArray, ArrayError>;

                fn $method(self, rhs: $scalar) -> Self::Output {
                    self.apply(ElementwiseOp::Binary($op), rhs)
                }
            }
        )*
    };
}

arithmetic_operator!(Add, add, BinaryOp::Add, [i64, f64]);
arithmetic_operator!(Sub, sub, BinaryOp::Sub, [i64, f64]);
arithmetic_operator!(Mul, mul, BinaryOp::Mul, [i64, f64]);
arithmetic_operator!(Div, div, BinaryOp::Div, [i64, f64]);

/// Plain-text table: column labels on top, row labels on the left
impl fmt::Display for WrappedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.array.data();
        let (rows, cols) = match self.shape() {
            [n] => (1, *n),
            [r, c] => (*r, *c),
            _ => {
                return write!(
                    f,
                    "array(shape={:?}, dtype={})",
                    self.shape(),
                    self.array.dtype().name()
                )
            }
        };

        let cells: Vec<String> = data.iter().map(|v| v.to_string()).collect();
        let width = cells
            .iter()
            .chain(self.x_labels.iter())
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(1);
        let gutter = self
            .y_labels
            .iter()
            .map(|s| s.chars().count())
            .max()
            .map(|w| w + 1)
            .unwrap_or(0);

        write!(f, "{:gutter$}", "")?;
        for label in &self.x_labels {
            write!(f, " {:>width$}", label)?;
        }
        writeln!(f)?;

        for row in 0..rows {
            let label = self.y_labels.get(row).map(String::as_str).unwrap_or("");
            write!(f, "{:<gutter$}", label)?;
            for cell in &cells[row * cols..(row + 1) * cols] {
                write!(f, " {:>width$}", cell)?;
            }
            if row + 1 < rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DType;

    #[tokio::test]
    async fn display_rejects_unsupported_ranks() {
        let cube = WrappedArray::new(NdArray::full(vec![2, 2, 2], Scalar::Int(0)));
        assert!(!cube.is_displayable());
        cube.display(&Config::default(), LogBuffer::new(), false)
            .await
            .unwrap();

        let scalar = WrappedArray::new(NdArray::scalar(Scalar::Int(3)));
        assert!(!scalar.is_displayable());
        scalar
            .display(&Config::default(), LogBuffer::new(), true)
            .await
            .unwrap();
    }

    fn matrix() -> WrappedArray {
        WrappedArray::new(NdArray::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap())
    }

    #[test]
    fn default_labels_are_indices() {
        let m = WrappedArray::new(NdArray::from_rows(vec![vec![1, 2, 3]]).unwrap());
        assert_eq!(m.x_labels(), &["0", "1", "2"]);
        assert_eq!(m.y_labels(), &["0"]);
        let v = WrappedArray::new(NdArray::from_vec(vec![1.0, 2.0]));
        assert_eq!(v.x_labels(), &["0", "1"]);
        assert!(v.y_labels().is_empty());
    }

    #[test]
    fn labels_must_match_axis_length() {
        let err = WrappedArray::with_labels(
            NdArray::from_vec(vec![1, 2, 3]),
            Some(vec!["a".into(), "b".into()]),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ArrayError::LabelLengthMismatch {
                axis: 0,
                expected: 3,
                actual: 2
            }
        );

        let ok = WrappedArray::with_labels(
            NdArray::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap(),
            Some(vec!["a".into(), "b".into(), "c".into()]),
            Some(vec!["top".into(), "bottom".into()]),
        )
        .unwrap();
        assert_eq!(ok.y_labels(), &["top", "bottom"]);
    }

    #[test]
    fn wrapped_sum_matches_direct_sum() {
        let a = matrix();
        let b = WrappedArray::new(NdArray::from_rows(vec![vec![10, 20], vec![30, 40]]).unwrap());
        let direct = a.array().binary(BinaryOp::Add, b.array()).unwrap();
        let wrapped = (&a + &b).unwrap();
        assert_eq!(wrapped.array(), &direct);
    }

    #[test]
    fn operators_drop_custom_labels() {
        let labelled = WrappedArray::with_labels(
            NdArray::from_vec(vec![1, 2]),
            Some(vec!["x".into(), "y".into()]),
            None,
        )
        .unwrap();
        let doubled = (&labelled * 2).unwrap();
        assert_eq!(doubled.x_labels(), &["0", "1"]);
    }

    #[test]
    fn mismatched_operands_propagate_shape_error() {
        let a = matrix();
        let b = WrappedArray::new(NdArray::from_vec(vec![1, 2, 3]));
        assert!(matches!(&a - &b, Err(ArrayError::ShapeMismatch { .. })));
    }

    #[test]
    fn comparisons_and_power() {
        let a = matrix();
        let mask = a.greater_equal(3).unwrap();
        assert_eq!(mask.array().dtype(), DType::Bool);
        assert_eq!(mask.array().sum(None).unwrap().data()[0], Scalar::Int(2));
        let squared = a.pow(2).unwrap();
        assert_eq!(squared.array().get_at(&[1, 1]).unwrap(), Scalar::Int(16));
        let halves = (&a / 2).unwrap();
        assert_eq!(halves.array().get_at(&[0, 0]).unwrap(), Scalar::Float(0.5));
    }

    #[test]
    fn get_row_returns_wrapped_rank_one() {
        let Element::Array(row) = matrix().get(&[1]).unwrap() else {
            panic!("row index should return an array");
        };
        assert_eq!(row.ndim(), 1);
        assert_eq!(row.array().data(), &[Scalar::Int(3), Scalar::Int(4)]);
    }

    #[test]
    fn get_full_coordinate_returns_scalar() {
        assert_eq!(matrix().get(&[0, 1]).unwrap(), Element::Scalar(Scalar::Int(2)));
    }

    #[test]
    fn set_mutates_in_place() {
        let mut m = matrix();
        m.set(&[0, 0], 42).unwrap();
        assert_eq!(m.get(&[0, 0]).unwrap(), Element::Scalar(Scalar::Int(42)));
    }

    #[test]
    fn sum_returns_wrapped_instance() {
        let total = matrix().sum(Some(0)).unwrap();
        assert_eq!(total.array().data(), &[Scalar::Int(4), Scalar::Int(6)]);
        assert_eq!(total.x_labels(), &["0", "1"]);
    }

    #[test]
    fn display_renders_a_labelled_table() {
        let text = matrix().to_string();
        assert_eq!(text, "   0 1\n0  1 2\n1  3 4");
    }
}
