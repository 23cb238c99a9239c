//! VTK output for sampled fields.
//!
//! Writes VTR (XML RectilinearGrid) files for visualization in ParaView and
//! other VTK-compatible tools. The fine sample coordinates become the grid
//! lines; every sample is a VTK point.
//!
//! # Example
//!
//! ```ignore
//! use dg_interp::io::write_vtk_rectilinear;
//!
//! let field = interpolator.project(0)?;
//! write_vtk_rectilinear("density.vtr", &field, "density")?;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::IxDyn;
use thiserror::Error;

use crate::interp::SampledField;

/// Error type for VTK operations.
#[derive(Debug, Error)]
pub enum VtkError {
    /// I/O error during file operations.
    #[error("VTK I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rectilinear grids have at most three axes.
    #[error("VTK rectilinear output supports 1 to 3 dimensions, got {0}")]
    UnsupportedDimensionality(usize),
}

/// VTK XML writer helper.
struct VtkWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> VtkWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"RectilinearGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    fn write_data_array_f64<'a>(
        &mut self,
        name: &str,
        data: impl ExactSizeIterator<Item = &'a f64>,
        components: usize,
    ) -> std::io::Result<()> {
        self.write_indent()?;
        if components > 1 {
            writeln!(
                self.writer,
                "<DataArray type=\"Float64\" Name=\"{}\" NumberOfComponents=\"{}\" format=\"ascii\">",
                name, components
            )?;
        } else {
            writeln!(
                self.writer,
                "<DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
                name
            )?;
        }

        self.indent += 1;
        self.write_indent()?;
        let len = data.len();
        for (i, &v) in data.enumerate() {
            write!(self.writer, "{:.10e}", v)?;
            if i + 1 < len {
                write!(self.writer, " ")?;
            }
            // Line break every 6 values
            if (i + 1) % 6 == 0 && i + 1 < len {
                writeln!(self.writer)?;
                self.write_indent()?;
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;

        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        Ok(())
    }
}

/// `"0 nx-1 0 ny-1 0 nz-1"`, padding missing axes with `0 0`.
fn extent(shape: &[usize]) -> String {
    (0..3)
        .map(|d| match shape.get(d) {
            Some(&n) => format!("0 {}", n.saturating_sub(1)),
            None => "0 0".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write a sampled field to a `.vtr` file.
///
/// Point data is ordered x-fastest. Stacked fields are written as one array
/// with `NumberOfComponents` equal to the component count and flagged as the
/// active `Vectors` attribute; single-component fields are the active `Scalars`.
pub fn write_vtk_rectilinear(
    path: impl AsRef<Path>,
    field: &SampledField,
    name: &str,
) -> Result<(), VtkError> {
    let num_dims = field.num_dims();
    if !(1..=3).contains(&num_dims) {
        return Err(VtkError::UnsupportedDimensionality(num_dims));
    }

    let spatial: Vec<usize> = field.coords.iter().map(|c| c.len()).collect();
    let extent = extent(&spatial);
    let components = field.num_components();

    let file = File::create(path)?;
    let mut writer = VtkWriter::new(file);

    writer.write_header()?;
    writer.start_element("RectilinearGrid", &[("WholeExtent", &extent)])?;
    writer.start_element("Piece", &[("Extent", &extent)])?;

    let attribute = if components > 1 { "Vectors" } else { "Scalars" };
    writer.start_element("PointData", &[(attribute, name)])?;
    // Reverse the spatial axes so the first one varies fastest; a component
    // axis stays innermost.
    let mut perm: Vec<usize> = (0..num_dims).rev().collect();
    if field.values.ndim() > num_dims {
        perm.push(num_dims);
    }
    let ordered = field.values.view().permuted_axes(IxDyn(&perm));
    writer.write_data_array_f64(name, ordered.iter(), components)?;
    writer.end_element("PointData")?;

    writer.start_element("Coordinates", &[])?;
    let zero = [0.0];
    for (d, axis) in ["x", "y", "z"].iter().enumerate() {
        match field.coords.get(d) {
            Some(c) => writer.write_data_array_f64(axis, c.iter(), 1)?,
            None => writer.write_data_array_f64(axis, zero.iter(), 1)?,
        }
    }
    writer.end_element("Coordinates")?;

    writer.end_element("Piece")?;
    writer.end_element("RectilinearGrid")?;
    writer.write_footer()?;

    Ok(())
}

/// Write a `.vtr` file with automatic frame numbering.
///
/// Creates a filename like `base_0001.vtr` for frame 1.
/// Returns the full path of the created file.
pub fn write_vtk_series(
    base_path: impl AsRef<Path>,
    frame: usize,
    field: &SampledField,
    name: &str,
) -> Result<PathBuf, VtkError> {
    let base = base_path.as_ref();
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let parent = base.parent().unwrap_or(Path::new("."));

    let path = parent.join(format!("{}_{:04}.vtr", stem, frame));
    write_vtk_rectilinear(&path, field, name)?;
    Ok(path)
}
