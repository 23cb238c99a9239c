//! Selection of one equation's coefficients from raw per-cell data.

use ndarray::{ArrayD, ArrayViewD, Axis, Slice};

use crate::basis::{BasisSpec, CoefficientLayout};
use crate::error::{InterpError, Result};

/// Extract the `num_nodes` coefficients of equation `component` from every
/// cell of `values`.
///
/// `values` has shape `[cells..., num_equations * num_nodes]`; the result has
/// shape `[cells..., num_nodes]`.
///
/// - Nodal layout: `block[..., n] = values[..., component + n * num_equations]`
/// - Modal layout: `block[..., n] = values[..., component * num_nodes + n]`
///
/// # Errors
/// - `ShapeMismatch` if the trailing axis is not `num_equations * num_nodes`
/// - `ComponentOutOfRange` if `component >= num_equations`
pub fn extract_component(
    values: ArrayViewD<'_, f64>,
    component: usize,
    num_nodes: usize,
    num_equations: usize,
    layout: CoefficientLayout,
) -> Result<ArrayD<f64>> {
    let Some(last) = values.ndim().checked_sub(1) else {
        return Err(InterpError::shape_mismatch(
            "at least one coefficient axis",
            "a 0-dimensional array",
        ));
    };
    let total = values.shape()[last];
    if total != num_equations * num_nodes {
        return Err(InterpError::shape_mismatch(
            format!(
                "{} coefficients per cell ({} equation(s) x {} node(s))",
                num_equations * num_nodes,
                num_equations,
                num_nodes
            ),
            total.to_string(),
        ));
    }
    if component >= num_equations {
        return Err(InterpError::ComponentOutOfRange {
            component,
            num_components: num_equations,
        });
    }

    let block = match layout {
        CoefficientLayout::Nodal => {
            let indices: Vec<usize> = (0..num_nodes)
                .map(|n| component + n * num_equations)
                .collect();
            values.select(Axis(last), &indices)
        }
        CoefficientLayout::Modal => {
            let start = component * num_nodes;
            values
                .slice_axis(Axis(last), Slice::from(start..start + num_nodes))
                .to_owned()
        }
    };
    Ok(block)
}

/// Extract equation `component` using the layout and node count fixed by `spec`.
///
/// The number of equations is inferred from the trailing axis length.
pub fn extract_for_spec(
    values: ArrayViewD<'_, f64>,
    component: usize,
    spec: &BasisSpec,
) -> Result<ArrayD<f64>> {
    let num_nodes = spec.num_nodes();
    let total = values.shape().last().copied().unwrap_or(0);
    if total % num_nodes != 0 {
        return Err(InterpError::shape_mismatch(
            format!("a multiple of {} coefficients per cell for {}", num_nodes, spec),
            total.to_string(),
        ));
    }
    extract_component(values, component, num_nodes, total / num_nodes, spec.layout())
}
