//! Memoization of interpolation matrices.
//!
//! A matrix is a pure function of its basis and sample layout, so a cache
//! entry never needs invalidation and concurrent population is harmless:
//! whichever thread inserts first wins and both built the same bits.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::family::{BasisFamily, BasisSpec};
use super::matrix::InterpolationMatrix;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct MatrixKey {
    spec: BasisSpec,
    samples_per_axis: usize,
    derivative_axis: Option<usize>,
}

static GLOBAL_CACHE: Lazy<MatrixCache> = Lazy::new(MatrixCache::new);

/// Thread-safe store of built interpolation matrices.
#[derive(Default)]
pub struct MatrixCache {
    entries: RwLock<HashMap<MatrixKey, Arc<InterpolationMatrix>>>,
}

impl MatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by the free lookup functions.
    pub fn global() -> &'static MatrixCache {
        &GLOBAL_CACHE
    }

    /// Matrix with the default `poly_order + 1` samples per axis.
    pub fn get(&self, spec: BasisSpec) -> Result<Arc<InterpolationMatrix>> {
        self.get_refined(spec, spec.default_samples_per_axis())
    }

    /// Matrix with `samples_per_axis` samples per axis.
    pub fn get_refined(
        &self,
        spec: BasisSpec,
        samples_per_axis: usize,
    ) -> Result<Arc<InterpolationMatrix>> {
        let key = MatrixKey {
            spec,
            samples_per_axis,
            derivative_axis: None,
        };
        self.get_or_build(key, || InterpolationMatrix::build_refined(spec, samples_per_axis))
    }

    /// Reference-space derivative matrix along `axis`.
    pub fn get_derivative(
        &self,
        spec: BasisSpec,
        samples_per_axis: usize,
        axis: usize,
    ) -> Result<Arc<InterpolationMatrix>> {
        let key = MatrixKey {
            spec,
            samples_per_axis,
            derivative_axis: Some(axis),
        };
        self.get_or_build(key, || {
            InterpolationMatrix::build_derivative(spec, samples_per_axis, axis)
        })
    }

    fn get_or_build<F>(&self, key: MatrixKey, build: F) -> Result<Arc<InterpolationMatrix>>
    where
        F: FnOnce() -> Result<InterpolationMatrix>,
    {
        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(Arc::clone(hit));
        }

        // Build outside the lock; failures are not cached.
        let matrix = Arc::new(build()?);
        debug!(
            "built interpolation matrix for {} ({}x{}, {} samples/axis, derivative {:?})",
            key.spec,
            matrix.num_sample_points(),
            matrix.num_nodes(),
            key.samples_per_axis,
            key.derivative_axis
        );

        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(key).or_insert(matrix)))
    }

    /// Number of cached matrices.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached matrix.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Interpolation matrix for `(num_dims, poly_order, family)` with the default
/// `poly_order + 1` samples per axis, served from the global cache.
pub fn get_interpolation_matrix(
    num_dims: usize,
    poly_order: usize,
    family: BasisFamily,
) -> Result<Arc<InterpolationMatrix>> {
    let spec = BasisSpec::new(num_dims, poly_order, family)?;
    MatrixCache::global().get(spec)
}

/// Interpolation matrix with `num_interp_per_axis` samples per axis, served
/// from the global cache.
pub fn get_interpolation_matrix_refined(
    num_dims: usize,
    poly_order: usize,
    family: BasisFamily,
    num_interp_per_axis: usize,
) -> Result<Arc<InterpolationMatrix>> {
    let spec = BasisSpec::new(num_dims, poly_order, family)?;
    MatrixCache::global().get_refined(spec, num_interp_per_axis)
}
