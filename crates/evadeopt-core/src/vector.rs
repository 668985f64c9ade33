//! Dense/sparse search-space vectors.
//!
//! The explorer manipulates points and directions through a single
//! vector abstraction with a sparsity capability flag, so every
//! operation it needs (norm, sign, ranking by magnitude, scatter at an
//! index set, axpy-style updates) is expressed once, independent of the
//! storage format. Sparse storage is coordinate format with sorted
//! indices.

use crate::{
    error::{OptimizerError, Result},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::cmp::Ordering;

/// Sparse vector in coordinate format.
///
/// Indices are kept sorted and values are always nonzero; storing a zero
/// through [`SparseVector::set`] removes the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<T: Scalar> {
    /// Logical dimension
    dim: usize,
    /// Sorted coordinate indices (length nnz)
    indices: Vec<usize>,
    /// Non-zero values (length nnz)
    values: Vec<T>,
}

impl<T: Scalar> SparseVector<T> {
    /// Creates an all-zero sparse vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates a sparse vector from (index, value) pairs.
    ///
    /// Pairs are sorted internally; exact zeros are dropped. Fails on an
    /// out-of-range or duplicated index.
    pub fn from_pairs(dim: usize, pairs: Vec<(usize, T)>) -> Result<Self> {
        let mut pairs: Vec<(usize, T)> = pairs
            .into_iter()
            .filter(|&(_, v)| v != T::zero())
            .collect();
        pairs.sort_by_key(|&(i, _)| i);

        for window in pairs.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(OptimizerError::numerical_error(format!(
                    "duplicate sparse index {}",
                    window[0].0
                )));
            }
        }
        if let Some(&(last, _)) = pairs.last() {
            if last >= dim {
                return Err(OptimizerError::dimension_mismatch(
                    format!("index < {dim}"),
                    format!("index {last}"),
                ));
            }
        }

        let (indices, values) = pairs.into_iter().unzip();
        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    /// Creates a sparse vector from a dense one, skipping exact zeros.
    pub fn from_dense(dense: &DVector<T>) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, &v) in dense.iter().enumerate() {
            if v != T::zero() {
                indices.push(i);
                values.push(v);
            }
        }
        Self {
            dim: dense.len(),
            indices,
            values,
        }
    }

    /// Logical dimension of the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.dim
    }

    /// True when the dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the value at coordinate `i` (zero when absent).
    pub fn get(&self, i: usize) -> T {
        match self.indices.binary_search(&i) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    /// Sets the value at coordinate `i`, removing the entry when zero.
    pub fn set(&mut self, i: usize, value: T) {
        debug_assert!(i < self.dim);
        match self.indices.binary_search(&i) {
            Ok(pos) => {
                if value == T::zero() {
                    self.indices.remove(pos);
                    self.values.remove(pos);
                } else {
                    self.values[pos] = value;
                }
            }
            Err(pos) => {
                if value != T::zero() {
                    self.indices.insert(pos, i);
                    self.values.insert(pos, value);
                }
            }
        }
    }

    /// Iterates over the stored (index, value) entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Euclidean norm of the vector.
    pub fn norm(&self) -> T {
        let sum = self
            .values
            .iter()
            .fold(T::zero(), |acc, &v| acc + v * v);
        <T as Float>::sqrt(sum)
    }

    /// Converts to a dense vector.
    pub fn to_dense(&self) -> DVector<T> {
        let mut dense = DVector::zeros(self.dim);
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

/// A search-space vector, dense or sparse.
///
/// The sparsity mode is a capability of the value, not of the API: all
/// operations behave identically in both modes, and binary operations
/// on mixed modes promote to dense.
#[derive(Debug, Clone)]
pub enum SearchVector<T: Scalar> {
    /// Dense storage
    Dense(DVector<T>),
    /// Sparse coordinate storage
    Sparse(SparseVector<T>),
}

impl<T: Scalar> SearchVector<T> {
    /// Creates an all-zero vector with the given dimension and mode.
    pub fn zeros(dim: usize, sparse: bool) -> Self {
        if sparse {
            Self::Sparse(SparseVector::zeros(dim))
        } else {
            Self::Dense(DVector::zeros(dim))
        }
    }

    /// Creates a dense vector from a slice.
    pub fn from_slice(values: &[T]) -> Self {
        Self::Dense(DVector::from_row_slice(values))
    }

    /// Creates an all-zero vector with the same dimension and mode as
    /// `self`.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.len(), self.is_sparse())
    }

    /// Logical dimension of the vector.
    pub fn len(&self) -> usize {
        match self {
            Self::Dense(v) => v.len(),
            Self::Sparse(v) => v.len(),
        }
    }

    /// True when the dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for sparse storage.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// Returns the value at coordinate `i`.
    pub fn get(&self, i: usize) -> T {
        match self {
            Self::Dense(v) => v[i],
            Self::Sparse(v) => v.get(i),
        }
    }

    /// Sets the value at coordinate `i`.
    pub fn set(&mut self, i: usize, value: T) {
        match self {
            Self::Dense(v) => v[i] = value,
            Self::Sparse(v) => v.set(i, value),
        }
    }

    /// Euclidean norm of the vector.
    pub fn norm(&self) -> T {
        match self {
            Self::Dense(v) => v.norm(),
            Self::Sparse(v) => v.norm(),
        }
    }

    /// Returns the element-wise sign vector: entries map to ±1, zeros
    /// stay zero.
    pub fn signum(&self) -> Self {
        let sign = |v: T| -> T {
            if v > T::zero() {
                T::one()
            } else if v < T::zero() {
                -T::one()
            } else {
                T::zero()
            }
        };
        match self {
            Self::Dense(v) => Self::Dense(v.map(sign)),
            Self::Sparse(v) => {
                let mut out = SparseVector::zeros(v.len());
                for (i, val) in v.iter() {
                    out.set(i, sign(val));
                }
                Self::Sparse(out)
            }
        }
    }

    /// Returns `self * factor`.
    pub fn scaled(&self, factor: T) -> Self {
        match self {
            Self::Dense(v) => Self::Dense(v * factor),
            Self::Sparse(v) => {
                let mut out = SparseVector::zeros(v.len());
                for (i, val) in v.iter() {
                    out.set(i, val * factor);
                }
                Self::Sparse(out)
            }
        }
    }

    /// Returns `self + t * other`.
    ///
    /// Sparse + sparse stays sparse (sorted merge); mixed modes promote
    /// to dense. Fails loudly on a dimension mismatch.
    pub fn add_scaled(&self, t: T, other: &Self) -> Result<Self> {
        if self.len() != other.len() {
            return Err(OptimizerError::dimension_mismatch(self.len(), other.len()));
        }
        match (self, other) {
            (Self::Sparse(a), Self::Sparse(b)) => {
                let mut out = SparseVector::zeros(a.len());
                let mut ai = a.iter().peekable();
                let mut bi = b.iter().peekable();
                loop {
                    match (ai.peek().copied(), bi.peek().copied()) {
                        (Some((i, av)), Some((j, bv))) => match i.cmp(&j) {
                            Ordering::Less => {
                                out.set(i, av);
                                ai.next();
                            }
                            Ordering::Greater => {
                                out.set(j, t * bv);
                                bi.next();
                            }
                            Ordering::Equal => {
                                out.set(i, av + t * bv);
                                ai.next();
                                bi.next();
                            }
                        },
                        (Some((i, av)), None) => {
                            out.set(i, av);
                            ai.next();
                        }
                        (None, Some((j, bv))) => {
                            out.set(j, t * bv);
                            bi.next();
                        }
                        (None, None) => break,
                    }
                }
                Ok(Self::Sparse(out))
            }
            _ => {
                let mut dense = self.to_dense();
                dense.axpy(t, &other.to_dense(), T::one());
                Ok(Self::Dense(dense))
            }
        }
    }

    /// Indices sorted by descending absolute value, stable on ties.
    ///
    /// The result is a permutation of `0..len`. For sparse vectors the
    /// stored entries are ranked first and the absent (zero)
    /// coordinates appended in index order; zero entries are
    /// interchangeable for every consumer of the ranking, so the two
    /// modes are equivalent.
    pub fn abs_argsort_desc(&self) -> Vec<usize> {
        match self {
            Self::Dense(v) => {
                let mut idx: Vec<usize> = (0..v.len()).collect();
                idx.sort_by(|&a, &b| {
                    let (fa, fb) = (<T as Float>::abs(v[a]), <T as Float>::abs(v[b]));
                    fb.partial_cmp(&fa).unwrap_or(Ordering::Equal)
                });
                idx
            }
            Self::Sparse(v) => {
                let mut nonzero: Vec<(usize, T)> = v.iter().collect();
                nonzero.sort_by(|&(_, a), &(_, b)| {
                    let (fa, fb) = (<T as Float>::abs(a), <T as Float>::abs(b));
                    fb.partial_cmp(&fa).unwrap_or(Ordering::Equal)
                });
                let mut idx: Vec<usize> = nonzero.into_iter().map(|(i, _)| i).collect();
                let mut seen = vec![false; v.len()];
                for &i in &idx {
                    seen[i] = true;
                }
                idx.extend((0..v.len()).filter(|&i| !seen[i]));
                idx
            }
        }
    }

    /// Converts to a dense vector (clones for dense inputs).
    pub fn to_dense(&self) -> DVector<T> {
        match self {
            Self::Dense(v) => v.clone(),
            Self::Sparse(v) => v.to_dense(),
        }
    }
}

impl<T: Scalar> PartialEq for SearchVector<T> {
    /// Value equality across storage modes.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && (0..self.len()).all(|i| self.get(i) == other.get(i))
    }
}

impl<T: Scalar> From<DVector<T>> for SearchVector<T> {
    fn from(v: DVector<T>) -> Self {
        Self::Dense(v)
    }
}

impl<T: Scalar> From<SparseVector<T>> for SearchVector<T> {
    fn from(v: SparseVector<T>) -> Self {
        Self::Sparse(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sparse_get_set() {
        let mut v = SparseVector::<f64>::zeros(5);
        v.set(3, 2.0);
        v.set(1, -1.0);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(3), 2.0);
        assert_eq!(v.get(1), -1.0);
        assert_eq!(v.get(0), 0.0);

        // writing zero removes the entry
        v.set(3, 0.0);
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(3), 0.0);
    }

    #[test]
    fn test_sparse_from_pairs_validation() {
        assert!(SparseVector::from_pairs(3, vec![(0, 1.0), (0, 2.0)]).is_err());
        assert!(SparseVector::from_pairs(3, vec![(3, 1.0)]).is_err());

        let v = SparseVector::from_pairs(4, vec![(2, 1.0), (0, 0.0)]).unwrap();
        assert_eq!(v.nnz(), 1);
    }

    #[test]
    fn test_sparse_dense_round_trip() {
        let dense = DVector::from_row_slice(&[0.0, 2.5, 0.0, -1.0]);
        let sparse = SparseVector::from_dense(&dense);
        assert_eq!(sparse.nnz(), 2);
        assert_eq!(sparse.to_dense(), dense);
    }

    #[test]
    fn test_norm_agreement() {
        let dense = SearchVector::from_slice(&[3.0, 0.0, 4.0]);
        let sparse: SearchVector<f64> =
            SparseVector::from_pairs(3, vec![(0, 3.0), (2, 4.0)]).unwrap().into();
        assert_relative_eq!(dense.norm(), 5.0);
        assert_relative_eq!(sparse.norm(), 5.0);
    }

    #[test]
    fn test_signum() {
        let v = SearchVector::from_slice(&[3.0, -0.5, 0.0]);
        assert_eq!(v.signum(), SearchVector::from_slice(&[1.0, -1.0, 0.0]));

        let s: SearchVector<f64> =
            SparseVector::from_pairs(3, vec![(0, 3.0), (1, -0.5)]).unwrap().into();
        assert_eq!(s.signum(), SearchVector::from_slice(&[1.0, -1.0, 0.0]));
    }

    #[test]
    fn test_add_scaled_sparse_merge() {
        let a: SearchVector<f64> =
            SparseVector::from_pairs(4, vec![(0, 1.0), (2, 2.0)]).unwrap().into();
        let b: SearchVector<f64> =
            SparseVector::from_pairs(4, vec![(2, 1.0), (3, -1.0)]).unwrap().into();
        let c = a.add_scaled(-0.5, &b).unwrap();
        assert!(c.is_sparse());
        assert_eq!(c, SearchVector::from_slice(&[1.0, 0.0, 1.5, 0.5]));
    }

    #[test]
    fn test_add_scaled_mixed_promotes_dense() {
        let a: SearchVector<f64> = SparseVector::from_pairs(2, vec![(0, 1.0)]).unwrap().into();
        let b = SearchVector::from_slice(&[1.0, 1.0]);
        let c = a.add_scaled(2.0, &b).unwrap();
        assert!(!c.is_sparse());
        assert_eq!(c, SearchVector::from_slice(&[3.0, 2.0]));
    }

    #[test]
    fn test_add_scaled_dimension_mismatch() {
        let a = SearchVector::from_slice(&[1.0, 2.0]);
        let b = SearchVector::from_slice(&[1.0]);
        assert!(a.add_scaled(1.0, &b).is_err());
    }

    #[test]
    fn test_abs_argsort_desc_stable() {
        let v = SearchVector::from_slice(&[3.0, -1.0, 2.0]);
        assert_eq!(v.abs_argsort_desc(), vec![0, 2, 1]);

        // ties keep original index order
        let v = SearchVector::from_slice(&[1.0, -1.0, 1.0]);
        assert_eq!(v.abs_argsort_desc(), vec![0, 1, 2]);
    }

    #[test]
    fn test_abs_argsort_desc_sparse_is_permutation() {
        let v: SearchVector<f64> =
            SparseVector::from_pairs(5, vec![(1, -4.0), (3, 2.0)]).unwrap().into();
        let idx = v.abs_argsort_desc();
        assert_eq!(&idx[..2], &[1, 3]);
        let mut sorted = idx.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cross_mode_equality() {
        let dense = SearchVector::from_slice(&[0.0, 1.0, 0.0]);
        let sparse: SearchVector<f64> =
            SparseVector::from_pairs(3, vec![(1, 1.0)]).unwrap().into();
        assert_eq!(dense, sparse);
    }
}
