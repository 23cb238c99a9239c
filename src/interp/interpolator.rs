//! High-level projection of a dataset's components onto the fine mesh.

use std::sync::Arc;

use log::trace;

use super::extract::extract_component;
use super::reconstruct::interpolate_on_mesh;
use super::sampled::SampledField;
use crate::basis::{BasisFamily, BasisSpec, InterpolationMatrix, MatrixCache};
use crate::error::{InterpError, Result};
use crate::grid::FieldDataset;

// =============================================================================
// Interpolation Configuration
// =============================================================================

/// Configuration for projecting DG data onto a fine mesh.
#[derive(Clone, Debug)]
pub struct InterpolationConfig {
    /// Basis family. Inferred from dataset metadata when `None`.
    pub basis: Option<BasisFamily>,
    /// Polynomial order. Inferred from dataset metadata when `None`.
    pub poly_order: Option<usize>,
    /// Samples per axis and cell. Defaults to `poly_order + 1`.
    pub num_interp: Option<usize>,
    /// Serve matrices from the process-wide cache instead of building them per call.
    pub use_cache: bool,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            basis: None,
            poly_order: None,
            num_interp: None,
            use_cache: true,
        }
    }
}

impl InterpolationConfig {
    pub fn new(basis: BasisFamily, poly_order: usize) -> Self {
        Self {
            basis: Some(basis),
            poly_order: Some(poly_order),
            ..Default::default()
        }
    }

    pub fn with_basis(mut self, basis: BasisFamily) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn with_poly_order(mut self, poly_order: usize) -> Self {
        self.poly_order = Some(poly_order);
        self
    }

    pub fn with_num_interp(mut self, num_interp: usize) -> Self {
        self.num_interp = Some(num_interp);
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Resolve the basis spec from this config, falling back to `dataset` metadata.
    pub fn resolve_spec(&self, dataset: &FieldDataset) -> Result<BasisSpec> {
        let meta = dataset.metadata();
        let family = match (self.basis, meta.basis_family()) {
            (Some(family), _) => family,
            (None, Some(parsed)) => parsed?,
            (None, None) => {
                return Err(InterpError::UnknownBasisName(
                    "<none: no basis configured or stored in metadata>".to_string(),
                ));
            }
        };
        let poly_order = self.poly_order.or(meta.poly_order).ok_or_else(|| {
            InterpError::InvalidGrid(
                "polynomial order neither configured nor stored in metadata".to_string(),
            )
        })?;
        BasisSpec::new(dataset.num_dims(), poly_order, family)
    }
}

// =============================================================================
// DG Interpolator
// =============================================================================

/// Projects the components of one dataset onto its fine sample mesh.
///
/// # Example
///
/// ```
/// use dg_interp::{BasisFamily, DgInterpolator, FieldDataset, InterpolationConfig, UniformGrid};
/// use ndarray::{ArrayD, IxDyn};
///
/// let grid = UniformGrid::unit(1, 4).unwrap();
/// let mut values = ArrayD::zeros(IxDyn(&[4, 2]));
/// values.index_axis_mut(ndarray::Axis(1), 0).fill(2.0_f64.sqrt());
/// let data = FieldDataset::new(grid, values).unwrap();
///
/// let config = InterpolationConfig::new(BasisFamily::ModalSerendipity, 1);
/// let interp = DgInterpolator::new(&data, &config).unwrap();
/// let field = interp.project(0).unwrap();
/// assert_eq!(field.shape(), &[8]);
/// assert!((field.mean() - 1.0).abs() < 1e-12);
/// ```
pub struct DgInterpolator<'a> {
    dataset: &'a FieldDataset,
    spec: BasisSpec,
    samples_per_axis: usize,
    num_components: usize,
    use_cache: bool,
    matrix: Arc<InterpolationMatrix>,
}

impl<'a> DgInterpolator<'a> {
    /// Resolve the basis, check it against the data and build the matrix.
    pub fn new(dataset: &'a FieldDataset, config: &InterpolationConfig) -> Result<Self> {
        let spec = config.resolve_spec(dataset)?;
        let num_components = dataset.num_components_for(&spec)?;
        let samples_per_axis = config
            .num_interp
            .unwrap_or_else(|| spec.default_samples_per_axis());

        let matrix = if config.use_cache {
            MatrixCache::global().get_refined(spec, samples_per_axis)?
        } else {
            Arc::new(InterpolationMatrix::build_refined(spec, samples_per_axis)?)
        };

        Ok(Self {
            dataset,
            spec,
            samples_per_axis,
            num_components,
            use_cache: config.use_cache,
            matrix,
        })
    }

    #[inline]
    pub fn spec(&self) -> BasisSpec {
        self.spec
    }

    #[inline]
    pub fn samples_per_axis(&self) -> usize {
        self.samples_per_axis
    }

    /// Number of equations stored in the dataset.
    #[inline]
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn matrix(&self) -> &InterpolationMatrix {
        &self.matrix
    }

    fn block(&self, component: usize) -> Result<ndarray::ArrayD<f64>> {
        extract_component(
            self.dataset.values(),
            component,
            self.spec.num_nodes(),
            self.num_components,
            self.spec.layout(),
        )
    }

    /// Sample component `component` on the fine mesh.
    pub fn project(&self, component: usize) -> Result<SampledField> {
        trace!("projecting component {} with {}", component, self.spec);
        let block = self.block(component)?;
        interpolate_on_mesh(&self.matrix, block.view(), self.dataset.grid())
    }

    /// Sample every component, stacked along a trailing axis.
    pub fn project_all(&self) -> Result<SampledField> {
        let fields = (0..self.num_components)
            .map(|c| self.project(c))
            .collect::<Result<Vec<_>>>()?;
        SampledField::stack_components(fields)
    }

    /// Sample the physical derivative ∂/∂x_axis of component `component`.
    pub fn differentiate(&self, component: usize, axis: usize) -> Result<SampledField> {
        let matrix = if self.use_cache {
            MatrixCache::global().get_derivative(self.spec, self.samples_per_axis, axis)?
        } else {
            Arc::new(InterpolationMatrix::build_derivative(
                self.spec,
                self.samples_per_axis,
                axis,
            )?)
        };

        let block = self.block(component)?;
        let mut field = interpolate_on_mesh(&matrix, block.view(), self.dataset.grid())?;
        // dξ/dx = 2 / dx
        let scale = 2.0 / self.dataset.grid().cell_width(axis);
        field.values.mapv_inplace(|v| v * scale);
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{FieldMetadata, UniformGrid};
    use ndarray::{ArrayD, Axis, IxDyn};

    fn dataset(meta: FieldMetadata) -> FieldDataset {
        let grid = UniformGrid::unit(2, 3).unwrap();
        FieldDataset::new(grid, ArrayD::zeros(IxDyn(&[3, 3, 8])))
            .unwrap()
            .with_metadata(meta)
    }

    #[test]
    fn test_spec_from_metadata() {
        let data = dataset(FieldMetadata {
            poly_order: Some(1),
            basis_type: Some("serendipity".to_string()),
            ..Default::default()
        });
        let interp = DgInterpolator::new(&data, &InterpolationConfig::default()).unwrap();
        assert_eq!(interp.spec().family(), BasisFamily::ModalSerendipity);
        assert_eq!(interp.num_components(), 2);
        assert_eq!(interp.samples_per_axis(), 2);
    }

    #[test]
    fn test_config_overrides_metadata() {
        let data = dataset(FieldMetadata {
            poly_order: Some(1),
            basis_type: Some("serendipity".to_string()),
            ..Default::default()
        });
        let config = InterpolationConfig::default()
            .with_basis(BasisFamily::ModalSerendipity)
            .with_poly_order(2)
            .with_num_interp(5)
            .with_cache(false);
        let interp = DgInterpolator::new(&data, &config).unwrap();
        assert_eq!(interp.spec().poly_order(), 2);
        assert_eq!(interp.num_components(), 1);
        assert_eq!(interp.matrix().num_sample_points(), 25);
    }

    #[test]
    fn test_missing_basis_information() {
        let data = dataset(FieldMetadata::default());
        assert!(matches!(
            DgInterpolator::new(&data, &InterpolationConfig::default()),
            Err(InterpError::UnknownBasisName(_))
        ));
        let config = InterpolationConfig::default().with_basis(BasisFamily::ModalMaxOrder);
        assert!(matches!(
            DgInterpolator::new(&data, &config),
            Err(InterpError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_inconsistent_coefficient_count() {
        // 8 coefficients per cell is not a multiple of the 2D max-order p=1 count (3)
        let data = dataset(FieldMetadata::default());
        let config = InterpolationConfig::new(BasisFamily::ModalMaxOrder, 1);
        assert!(matches!(
            DgInterpolator::new(&data, &config),
            Err(InterpError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_project_all_stacks_components() {
        let grid = UniformGrid::unit(1, 4).unwrap();
        // Two equations, modal p=1: [c0_eq0, c1_eq0, c0_eq1, c1_eq1]
        let mut values = ArrayD::zeros(IxDyn(&[4, 4]));
        let phi0 = 0.5_f64.sqrt();
        values.index_axis_mut(Axis(1), 0).fill(1.0 / phi0);
        values.index_axis_mut(Axis(1), 2).fill(3.0 / phi0);
        let data = FieldDataset::new(grid, values).unwrap();

        let interp =
            DgInterpolator::new(&data, &InterpolationConfig::new(BasisFamily::ModalSerendipity, 1))
                .unwrap();
        let all = interp.project_all().unwrap();
        assert_eq!(all.shape(), &[8, 2]);
        assert!((all.component(0).unwrap().mean() - 1.0).abs() < 1e-12);
        assert!((all.component(1).unwrap().mean() - 3.0).abs() < 1e-12);
        assert!(interp.project(2).is_err());
    }
}
