//! Elementwise operations with broadcasting
//!
//! Every operator funnels through [`combine`]: the right-hand side is an
//! [`Operand`] (array or scalar), both sides are broadcast to a common shape,
//! and a per-element closure produces the result.

use super::{strides_for, ArrayError, DType, NdArray, Scalar};
use std::borrow::Cow;
use std::str::FromStr;

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division, always produces floats
    Div,
    Pow,
}

/// Comparison operators, all producing boolean arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Any elementwise operator, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementwiseOp {
    Binary(BinaryOp),
    Compare(CompareOp),
}

impl BinaryOp {
    pub fn result_dtype(self, left: DType, right: DType) -> DType {
        match self {
            BinaryOp::Div => DType::Float,
            _ => left.arithmetic(right),
        }
    }

    fn apply(self, left: Scalar, right: Scalar, dtype: DType) -> Result<Scalar, ArrayError> {
        if dtype == DType::Float {
            let (a, b) = (left.to_f64(), right.to_f64());
            return Ok(Scalar::Float(match self {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Pow => a.powf(b),
            }));
        }

        let (a, b) = (left.to_i64(), right.to_i64());
        let value = match self {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div => return Ok(Scalar::Float(a as f64 / b as f64)),
            BinaryOp::Pow => {
                if b < 0 {
                    return Err(ArrayError::NegativeIntegerPower);
                }
                a.wrapping_pow(u32::try_from(b).unwrap_or(u32::MAX))
            }
        };
        Ok(Scalar::Int(value))
    }
}

impl CompareOp {
    fn apply(self, left: Scalar, right: Scalar) -> bool {
        let floating = left.dtype() == DType::Float || right.dtype() == DType::Float;
        if floating {
            let (a, b) = (left.to_f64(), right.to_f64());
            match self {
                CompareOp::Eq => a == b,
                CompareOp::Ne => a != b,
                CompareOp::Lt => a < b,
                CompareOp::Le => a <= b,
                CompareOp::Gt => a > b,
                CompareOp::Ge => a >= b,
            }
        } else {
            let (a, b) = (left.to_i64(), right.to_i64());
            match self {
                CompareOp::Eq => a == b,
                CompareOp::Ne => a != b,
                CompareOp::Lt => a < b,
                CompareOp::Le => a <= b,
                CompareOp::Gt => a > b,
                CompareOp::Ge => a >= b,
            }
        }
    }
}

impl FromStr for ElementwiseOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_lowercase().as_str() {
            "add" | "+" => ElementwiseOp::Binary(BinaryOp::Add),
            "sub" | "-" => ElementwiseOp::Binary(BinaryOp::Sub),
            "mul" | "*" => ElementwiseOp::Binary(BinaryOp::Mul),
            "div" | "/" => ElementwiseOp::Binary(BinaryOp::Div),
            "pow" | "**" => ElementwiseOp::Binary(BinaryOp::Pow),
            "eq" | "==" => ElementwiseOp::Compare(CompareOp::Eq),
            "ne" | "!=" => ElementwiseOp::Compare(CompareOp::Ne),
            "lt" | "<" => ElementwiseOp::Compare(CompareOp::Lt),
            "le" | "<=" => ElementwiseOp::Compare(CompareOp::Le),
            "gt" | ">" => ElementwiseOp::Compare(CompareOp::Gt),
            "ge" | ">=" => ElementwiseOp::Compare(CompareOp::Ge),
            other => return Err(format!("unknown operator '{}'", other)),
        };
        Ok(op)
    }
}

/// Right-hand side of an elementwise operation
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    Array(Cow<'a, NdArray>),
    Scalar(Scalar),
}

impl Operand<'_> {
    /// Materialize as an array (scalars become rank 0)
    pub fn into_array(self) -> NdArray {
        match self {
            Operand::Array(array) => array.into_owned(),
            Operand::Scalar(value) => NdArray::scalar(value),
        }
    }

    fn as_array(&self) -> Cow<'_, NdArray> {
        match self {
            Operand::Array(array) => Cow::Borrowed(array.as_ref()),
            Operand::Scalar(value) => Cow::Owned(NdArray::scalar(*value)),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Operand::Array(array) => array.dtype(),
            Operand::Scalar(value) => value.dtype(),
        }
    }
}

macro_rules! scalar_operand {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand<'_> {
                fn from(value: $ty) -> Self {
                    Operand::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

scalar_operand!(bool, i32, i64, f64, Scalar);

impl<'a> From<&'a NdArray> for Operand<'a> {
    fn from(array: &'a NdArray) -> Self {
        Operand::Array(Cow::Borrowed(array))
    }
}

impl From<NdArray> for Operand<'_> {
    fn from(array: NdArray) -> Self {
        Operand::Array(Cow::Owned(array))
    }
}

/// Common shape of two operands, aligned from the trailing axis
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Result<Vec<usize>, ArrayError> {
    let ndim = left.len().max(right.len());
    let mut shape = vec![0; ndim];
    for i in 0..ndim {
        let l = dim_from_end(left, i);
        let r = dim_from_end(right, i);
        shape[ndim - 1 - i] = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => {
                return Err(ArrayError::ShapeMismatch {
                    left: left.to_vec(),
                    right: right.to_vec(),
                })
            }
        };
    }
    Ok(shape)
}

fn dim_from_end(shape: &[usize], i: usize) -> usize {
    if i < shape.len() {
        shape[shape.len() - 1 - i]
    } else {
        1
    }
}

/// Walks an output shape in row-major order, yielding the matching flat
/// offset into a source array that broadcasts to it
pub(crate) struct BroadcastIter {
    shape: Vec<usize>,
    strides: Vec<usize>,
    counter: Vec<usize>,
    remaining: usize,
    offset: usize,
}

impl BroadcastIter {
    pub(crate) fn new(out_shape: &[usize], src_shape: &[usize]) -> Self {
        let src_strides = strides_for(src_shape);
        let lead = out_shape.len() - src_shape.len();
        let strides = (0..out_shape.len())
            .map(|axis| {
                if axis < lead {
                    return 0;
                }
                let src_axis = axis - lead;
                if src_shape[src_axis] == 1 {
                    0
                } else {
                    src_strides[src_axis]
                }
            })
            .collect();
        Self {
            shape: out_shape.to_vec(),
            strides,
            counter: vec![0; out_shape.len()],
            remaining: out_shape.iter().product(),
            offset: 0,
        }
    }
}

impl Iterator for BroadcastIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.offset;

        // Odometer increment: carry into the next axis when one wraps
        for axis in (0..self.shape.len()).rev() {
            self.counter[axis] += 1;
            self.offset += self.strides[axis];
            if self.counter[axis] < self.shape[axis] {
                break;
            }
            self.offset -= self.strides[axis] * self.counter[axis];
            self.counter[axis] = 0;
        }

        Some(current)
    }
}

fn combine(
    lhs: &NdArray,
    rhs: &Operand<'_>,
    dtype: DType,
    f: impl Fn(Scalar, Scalar) -> Result<Scalar, ArrayError>,
) -> Result<NdArray, ArrayError> {
    let rhs = rhs.as_array();
    let shape = broadcast_shapes(lhs.shape(), rhs.shape())?;
    let data = BroadcastIter::new(&shape, lhs.shape())
        .zip(BroadcastIter::new(&shape, rhs.shape()))
        .map(|(i, j)| f(lhs.data[i], rhs.data[j]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NdArray { shape, dtype, data })
}

impl NdArray {
    /// Elementwise arithmetic against an array or scalar
    pub fn binary<'a>(
        &self,
        op: BinaryOp,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<NdArray, ArrayError> {
        let rhs = rhs.into();
        let dtype = op.result_dtype(self.dtype, rhs.dtype());
        combine(self, &rhs, dtype, |a, b| op.apply(a, b, dtype))
    }

    /// Elementwise comparison against an array or scalar
    pub fn compare<'a>(
        &self,
        op: CompareOp,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<NdArray, ArrayError> {
        let rhs = rhs.into();
        combine(self, &rhs, DType::Bool, |a, b| Ok(Scalar::Bool(op.apply(a, b))))
    }

    pub fn apply<'a>(
        &self,
        op: ElementwiseOp,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<NdArray, ArrayError> {
        match op {
            ElementwiseOp::Binary(op) => self.binary(op, rhs),
            ElementwiseOp::Compare(op) => self.compare(op, rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(shape: Vec<usize>, values: &[i64]) -> NdArray {
        NdArray::from_shape_vec(shape, values.iter().map(|&v| Scalar::Int(v)).collect()).unwrap()
    }

    #[test]
    fn add_matching_shapes() {
        let a = ints(vec![2, 2], &[1, 2, 3, 4]);
        let b = ints(vec![2, 2], &[10, 20, 30, 40]);
        assert_eq!(
            a.binary(BinaryOp::Add, &b).unwrap(),
            ints(vec![2, 2], &[11, 22, 33, 44])
        );
    }

    #[test]
    fn scalar_broadcasts_to_every_element() {
        let a = ints(vec![3], &[1, 2, 3]);
        assert_eq!(a.binary(BinaryOp::Mul, 2).unwrap(), ints(vec![3], &[2, 4, 6]));
        let shifted = a.binary(BinaryOp::Add, 0.5).unwrap();
        assert_eq!(shifted.dtype(), DType::Float);
        assert_eq!(shifted.data()[0], Scalar::Float(1.5));
    }

    #[test]
    fn row_vector_broadcasts_across_matrix() {
        let m = ints(vec![2, 3], &[1, 2, 3, 4, 5, 6]);
        let row = ints(vec![3], &[10, 20, 30]);
        assert_eq!(
            m.binary(BinaryOp::Add, &row).unwrap(),
            ints(vec![2, 3], &[11, 22, 33, 14, 25, 36])
        );
        let column = ints(vec![2, 1], &[100, 200]);
        assert_eq!(
            m.binary(BinaryOp::Add, &column).unwrap(),
            ints(vec![2, 3], &[101, 102, 103, 204, 205, 206])
        );
    }

    #[test]
    fn mismatched_shapes_fail() {
        let a = ints(vec![3], &[1, 2, 3]);
        let b = ints(vec![2], &[1, 2]);
        assert_eq!(
            a.binary(BinaryOp::Add, &b).unwrap_err(),
            ArrayError::ShapeMismatch {
                left: vec![3],
                right: vec![2]
            }
        );
    }

    #[test]
    fn division_is_true_division() {
        let a = ints(vec![2], &[1, 4]);
        let out = a.binary(BinaryOp::Div, 2).unwrap();
        assert_eq!(out.dtype(), DType::Float);
        assert_eq!(out.data(), &[Scalar::Float(0.5), Scalar::Float(2.0)]);
    }

    #[test]
    fn integer_power_rejects_negative_exponent() {
        let a = ints(vec![2], &[2, 3]);
        assert_eq!(a.binary(BinaryOp::Pow, 2).unwrap(), ints(vec![2], &[4, 9]));
        assert_eq!(
            a.binary(BinaryOp::Pow, -1).unwrap_err(),
            ArrayError::NegativeIntegerPower
        );
        let float = a.binary(BinaryOp::Pow, -1.0).unwrap();
        assert_eq!(float.data()[0], Scalar::Float(0.5));
    }

    #[test]
    fn comparisons_produce_bools() {
        let a = ints(vec![3], &[1, 2, 3]);
        let gt = a.compare(CompareOp::Gt, 1).unwrap();
        assert_eq!(gt.dtype(), DType::Bool);
        assert_eq!(
            gt.data(),
            &[Scalar::Bool(false), Scalar::Bool(true), Scalar::Bool(true)]
        );
        let eq = a.compare(CompareOp::Eq, 2.0).unwrap();
        assert_eq!(
            eq.data(),
            &[Scalar::Bool(false), Scalar::Bool(true), Scalar::Bool(false)]
        );
    }

    #[test]
    fn operator_names_parse() {
        assert_eq!(
            "pow".parse::<ElementwiseOp>().unwrap(),
            ElementwiseOp::Binary(BinaryOp::Pow)
        );
        assert_eq!(
            ">=".parse::<ElementwiseOp>().unwrap(),
            ElementwiseOp::Compare(CompareOp::Ge)
        );
        assert!("mod".parse::<ElementwiseOp>().is_err());
    }

    #[test]
    fn broadcast_iter_repeats_broadcast_axes() {
        let offsets: Vec<usize> = BroadcastIter::new(&[2, 3], &[3]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 0, 1, 2]);
        let offsets: Vec<usize> = BroadcastIter::new(&[2, 3], &[2, 1]).collect();
        assert_eq!(offsets, vec![0, 0, 0, 1, 1, 1]);
    }
}
