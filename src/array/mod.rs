//! N-dimensional numeric buffer
//!
//! A row-major `Vec<Scalar>` plus a shape. Every element shares the array's
//! dtype, which is fixed at construction; writes through `assign` are cast to
//! it. Only the operations the grid viewer needs are provided: elementwise
//! arithmetic with broadcasting, prefix indexing, and sum reductions.

mod error;
mod load;
mod ops;
mod scalar;

pub use error::ArrayError;
pub use ops::{BinaryOp, CompareOp, ElementwiseOp, Operand};
pub use scalar::{DType, Scalar};

/// Result of indexing: a sub-array, or a single element when every axis
/// was indexed
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Array(NdArray),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    dtype: DType,
    data: Vec<Scalar>,
}

impl NdArray {
    /// Build from a shape and flat row-major data. The dtype is the
    /// promotion of all elements; an empty buffer defaults to Float.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<Scalar>) -> Result<Self, ArrayError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ArrayError::InvalidInput(format!(
                "shape {:?} needs {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        let dtype = data
            .iter()
            .map(Scalar::dtype)
            .reduce(DType::promote)
            .unwrap_or(DType::Float);
        Ok(Self::with_dtype(shape, dtype, data))
    }

    /// Internal constructor: casts every element to `dtype`
    fn with_dtype(shape: Vec<usize>, dtype: DType, data: Vec<Scalar>) -> Self {
        let data = data.into_iter().map(|s| s.cast(dtype)).collect();
        Self { shape, dtype, data }
    }

    /// Rank-1 array from a vector
    pub fn from_vec<T: Into<Scalar>>(values: Vec<T>) -> Self {
        let data: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        let len = data.len();
        // Length always matches a rank-1 shape
        Self::from_shape_vec(vec![len], data).unwrap_or_else(|_| Self::empty())
    }

    /// Rank-2 array from rows; rows of different lengths are rejected
    pub fn from_rows<T: Into<Scalar>>(rows: Vec<Vec<T>>) -> Result<Self, ArrayError> {
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != ncols) {
            return Err(ArrayError::RaggedInput);
        }
        let nrows = rows.len();
        let data = rows.into_iter().flatten().map(Into::into).collect();
        Self::from_shape_vec(vec![nrows, ncols], data)
    }

    /// Rank-0 array holding one value
    pub fn scalar(value: Scalar) -> Self {
        Self {
            shape: Vec::new(),
            dtype: value.dtype(),
            data: vec![value],
        }
    }

    /// Array of the given shape with every element set to `value`
    pub fn full(shape: Vec<usize>, value: Scalar) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            dtype: value.dtype(),
            data: vec![value; len],
        }
    }

    fn empty() -> Self {
        Self {
            shape: vec![0],
            dtype: DType::Float,
            data: Vec::new(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Flat row-major view of the elements
    pub fn data(&self) -> &[Scalar] {
        &self.data
    }

    /// Size of the element buffer in bytes
    pub fn nbytes(&self) -> usize {
        self.data.len() * self.dtype.item_size()
    }

    /// Copy with every element cast to `dtype`
    pub fn astype(&self, dtype: DType) -> NdArray {
        Self::with_dtype(self.shape.clone(), dtype, self.data.clone())
    }

    /// Row-major strides in elements
    pub fn strides(&self) -> Vec<usize> {
        strides_for(&self.shape)
    }

    /// Smallest and largest element as f64, `None` for an empty array
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data.iter().map(|s| s.to_f64()).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Element at a complete coordinate
    pub fn get_at(&self, coord: &[usize]) -> Result<Scalar, ArrayError> {
        if coord.len() != self.ndim() {
            return Err(ArrayError::TooManyIndices {
                given: coord.len(),
                ndim: self.ndim(),
            });
        }
        let mut offset = 0;
        for (axis, (&i, stride)) in coord.iter().zip(self.strides()).enumerate() {
            if i >= self.shape[axis] {
                return Err(ArrayError::IndexOutOfBounds {
                    index: i as isize,
                    axis,
                    size: self.shape[axis],
                });
            }
            offset += i * stride;
        }
        Ok(self.data[offset])
    }

    /// Resolve a prefix index (negative entries count from the end) into the
    /// flat offset and the shape of what remains
    fn locate(&self, index: &[isize]) -> Result<(usize, Vec<usize>), ArrayError> {
        if index.len() > self.ndim() {
            return Err(ArrayError::TooManyIndices {
                given: index.len(),
                ndim: self.ndim(),
            });
        }
        let strides = self.strides();
        let mut offset = 0;
        for (axis, &raw) in index.iter().enumerate() {
            let size = self.shape[axis];
            let resolved = if raw < 0 { raw + size as isize } else { raw };
            if resolved < 0 || resolved as usize >= size {
                return Err(ArrayError::IndexOutOfBounds {
                    index: raw,
                    axis,
                    size,
                });
            }
            offset += resolved as usize * strides[axis];
        }
        Ok((offset, self.shape[index.len()..].to_vec()))
    }

    /// Index the leading axes. A complete index yields a scalar, a partial
    /// one yields a copy of the addressed sub-array.
    pub fn select(&self, index: &[isize]) -> Result<Item, ArrayError> {
        let (offset, sub_shape) = self.locate(index)?;
        if sub_shape.is_empty() {
            return Ok(Item::Scalar(self.data[offset]));
        }
        let len: usize = sub_shape.iter().product();
        Ok(Item::Array(NdArray {
            shape: sub_shape,
            dtype: self.dtype,
            data: self.data[offset..offset + len].to_vec(),
        }))
    }

    /// Write `value` into the region addressed by a prefix index. The value
    /// broadcasts to the region and is cast to this array's dtype.
    pub fn assign<'a>(
        &mut self,
        index: &[isize],
        value: impl Into<Operand<'a>>,
    ) -> Result<(), ArrayError> {
        let (offset, sub_shape) = self.locate(index)?;
        let value = value.into().into_array();
        let filled = value.broadcast_to(&sub_shape)?;
        for (slot, item) in self.data[offset..offset + filled.len()]
            .iter_mut()
            .zip(filled.data)
        {
            *slot = item.cast(self.dtype);
        }
        Ok(())
    }

    /// Expand to `shape` following broadcasting rules
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<NdArray, ArrayError> {
        let target = ops::broadcast_shapes(&self.shape, shape)?;
        if target != shape {
            return Err(ArrayError::ShapeMismatch {
                left: self.shape.clone(),
                right: shape.to_vec(),
            });
        }
        let data = ops::BroadcastIter::new(&target, &self.shape)
            .map(|src| self.data[src])
            .collect();
        Ok(NdArray {
            shape: target,
            dtype: self.dtype,
            data,
        })
    }

    /// Sum of all elements (`axis = None`) or along one axis. Booleans sum
    /// to an integer count; integer sums wrap on overflow.
    pub fn sum(&self, axis: Option<usize>) -> Result<NdArray, ArrayError> {
        let out_dtype = self.dtype.arithmetic(DType::Bool);
        let Some(axis) = axis else {
            return Ok(NdArray::scalar(sum_scalars(self.data.iter().copied(), out_dtype)));
        };
        if axis >= self.ndim() {
            return Err(ArrayError::AxisOutOfRange {
                axis,
                ndim: self.ndim(),
            });
        }
        let outer: usize = self.shape[..axis].iter().product();
        let n = self.shape[axis];
        let inner: usize = self.shape[axis + 1..].iter().product();

        let mut data = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            for i in 0..inner {
                let column = (0..n).map(|j| self.data[(o * n + j) * inner + i]);
                data.push(sum_scalars(column, out_dtype));
            }
        }

        let mut shape = self.shape.clone();
        shape.remove(axis);
        Ok(NdArray {
            shape,
            dtype: out_dtype,
            data,
        })
    }
}

pub(crate) fn strides_for(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

fn sum_scalars(values: impl Iterator<Item = Scalar>, dtype: DType) -> Scalar {
    match dtype {
        DType::Float => Scalar::Float(values.map(Scalar::to_f64).sum()),
        _ => Scalar::Int(values.fold(0i64, |acc, s| acc.wrapping_add(s.to_i64()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> NdArray {
        NdArray::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = NdArray::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(err, ArrayError::RaggedInput);
    }

    #[test]
    fn mixed_input_promotes_dtype() {
        let arr = NdArray::from_shape_vec(vec![2], vec![Scalar::Int(1), Scalar::Float(0.5)])
            .unwrap();
        assert_eq!(arr.dtype(), DType::Float);
        assert_eq!(arr.data()[0], Scalar::Float(1.0));
    }

    #[test]
    fn select_row_returns_sub_array() {
        let Item::Array(row) = matrix().select(&[1]).unwrap() else {
            panic!("expected a row");
        };
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.data(), &[Scalar::Int(4), Scalar::Int(5), Scalar::Int(6)]);
    }

    #[test]
    fn select_full_coordinate_returns_scalar() {
        assert_eq!(
            matrix().select(&[0, 2]).unwrap(),
            Item::Scalar(Scalar::Int(3))
        );
        assert_eq!(
            matrix().select(&[-1, -1]).unwrap(),
            Item::Scalar(Scalar::Int(6))
        );
    }

    #[test]
    fn select_out_of_bounds_fails() {
        let err = matrix().select(&[2]).unwrap_err();
        assert_eq!(
            err,
            ArrayError::IndexOutOfBounds {
                index: 2,
                axis: 0,
                size: 2
            }
        );
        assert!(matches!(
            matrix().select(&[0, 0, 0]),
            Err(ArrayError::TooManyIndices { given: 3, ndim: 2 })
        ));
    }

    #[test]
    fn assign_scalar_broadcasts_over_row() {
        let mut arr = matrix();
        arr.assign(&[0], 9).unwrap();
        assert_eq!(arr.select(&[0, 1]).unwrap(), Item::Scalar(Scalar::Int(9)));
        assert_eq!(arr.select(&[1, 1]).unwrap(), Item::Scalar(Scalar::Int(5)));
    }

    #[test]
    fn assign_casts_to_array_dtype() {
        let mut arr = matrix();
        arr.assign(&[1, 0], 7.9).unwrap();
        assert_eq!(arr.select(&[1, 0]).unwrap(), Item::Scalar(Scalar::Int(7)));
    }

    #[test]
    fn assign_wrong_shape_fails() {
        let mut arr = matrix();
        let value = NdArray::from_vec(vec![1, 2]);
        assert!(matches!(
            arr.assign(&[0], &value),
            Err(ArrayError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn sum_along_axes() {
        let arr = matrix();
        assert_eq!(arr.sum(None).unwrap(), NdArray::scalar(Scalar::Int(21)));
        assert_eq!(arr.sum(Some(0)).unwrap(), NdArray::from_vec(vec![5, 7, 9]));
        assert_eq!(arr.sum(Some(1)).unwrap(), NdArray::from_vec(vec![6, 15]));
        assert!(matches!(
            arr.sum(Some(2)),
            Err(ArrayError::AxisOutOfRange { axis: 2, ndim: 2 })
        ));
    }

    #[test]
    fn sum_of_bools_counts_true() {
        let arr = NdArray::from_vec(vec![true, false, true]);
        assert_eq!(arr.sum(None).unwrap(), NdArray::scalar(Scalar::Int(2)));
    }

    #[test]
    fn value_range_and_nbytes() {
        let arr = matrix();
        assert_eq!(arr.value_range(), Some((1.0, 6.0)));
        assert_eq!(arr.nbytes(), 48);
    }
}
