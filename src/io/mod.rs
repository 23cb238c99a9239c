//! I/O utilities for reading and writing data files.
//!
//! This module provides:
//! - **`.gkyl` fields**: Binary DG coefficient snapshots in the legacy and
//!   versioned layouts
//! - **VTK output**: Sampled-field visualization in ParaView (VTR format)
//!
//! # Example
//!
//! ```ignore
//! use dg_interp::io::{read_gkyl, write_vtk_rectilinear};
//! use dg_interp::{BasisFamily, DgInterpolator, InterpolationConfig};
//!
//! let data = read_gkyl("plasma_elc_0.gkyl")?;
//! let config = InterpolationConfig::new(BasisFamily::ModalSerendipity, 2);
//! let field = DgInterpolator::new(&data, &config)?.project(0)?;
//! write_vtk_rectilinear("elc_density.vtr", &field, "density")?;
//! ```

mod gkyl;
mod vtk;

pub use gkyl::{GkylError, encode_gkyl, parse_gkyl, read_gkyl, write_gkyl};
pub use vtk::{VtkError, write_vtk_rectilinear, write_vtk_series};
