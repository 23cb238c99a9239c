//! Point-sampled fields on the fine mesh.

use ndarray::{Array1, ArrayD, Axis};

use crate::error::{InterpError, Result};

/// Field values on the fine mesh together with its coordinate arrays.
///
/// `values` has one axis per entry of `coords` with matching lengths. Fields
/// holding several components carry one extra trailing axis.
#[derive(Clone, Debug)]
pub struct SampledField {
    /// Fine sample coordinates, one array per spatial axis.
    pub coords: Vec<Array1<f64>>,
    /// Sampled values.
    pub values: ArrayD<f64>,
}

impl SampledField {
    /// Pair coordinates with values, checking that the spatial axes agree.
    pub fn new(coords: Vec<Array1<f64>>, values: ArrayD<f64>) -> Result<Self> {
        let spatial = coords.len();
        let ndim_ok = values.ndim() == spatial || values.ndim() == spatial + 1;
        let lens_ok = ndim_ok
            && coords
                .iter()
                .zip(values.shape())
                .all(|(c, &n)| c.len() == n);
        if !lens_ok {
            return Err(InterpError::shape_mismatch(
                format!(
                    "{:?}",
                    coords.iter().map(|c| c.len()).collect::<Vec<_>>()
                ),
                format!("{:?}", values.shape()),
            ));
        }
        Ok(Self { coords, values })
    }

    /// Stack single-component fields along a new trailing axis.
    ///
    /// All fields must share the same coordinates and shape.
    pub fn stack_components(fields: Vec<SampledField>) -> Result<Self> {
        let mut iter = fields.into_iter();
        let Some(first) = iter.next() else {
            return Err(InterpError::shape_mismatch("at least one component", "none"));
        };
        let shape = first.values.shape().to_vec();
        let mut columns = vec![first.values.insert_axis(Axis(shape.len()))];
        for field in iter {
            if field.values.shape() != shape.as_slice() {
                return Err(InterpError::shape_mismatch(
                    format!("{:?}", shape),
                    format!("{:?}", field.values.shape()),
                ));
            }
            columns.push(field.values.insert_axis(Axis(shape.len())));
        }

        let views: Vec<_> = columns.iter().map(|c| c.view()).collect();
        let values = ndarray::concatenate(Axis(shape.len()), &views)
            .map_err(|e| InterpError::shape_mismatch("stackable components", e.to_string()))?;
        Ok(Self {
            coords: first.coords,
            values,
        })
    }

    /// Number of spatial dimensions.
    #[inline]
    pub fn num_dims(&self) -> usize {
        self.coords.len()
    }

    /// Number of components (1 unless stacked).
    pub fn num_components(&self) -> usize {
        if self.values.ndim() > self.num_dims() {
            self.values.shape()[self.num_dims()]
        } else {
            1
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Arithmetic mean over all samples.
    pub fn mean(&self) -> f64 {
        self.values.mean().unwrap_or(f64::NAN)
    }

    /// `max - min`.
    pub fn spread(&self) -> f64 {
        self.max() - self.min()
    }

    /// Single component `c` of a stacked field.
    pub fn component(&self, c: usize) -> Result<SampledField> {
        let n = self.num_components();
        if c >= n {
            return Err(InterpError::ComponentOutOfRange {
                component: c,
                num_components: n,
            });
        }
        if self.values.ndim() == self.num_dims() {
            return Ok(self.clone());
        }
        Ok(Self {
            coords: self.coords.clone(),
            values: self.values.index_axis(Axis(self.num_dims()), c).to_owned(),
        })
    }

    /// `(coords, values)` tuple handed to plotting and export.
    pub fn into_parts(self) -> (Vec<Array1<f64>>, ArrayD<f64>) {
        (self.coords, self.values)
    }
}
