//! Reader and writer for `.gkyl` binary field files.
//!
//! All integers are little-endian `u64`, all bounds little-endian `f64`.
//!
//! # Legacy layout
//!
//! ```text
//! realType        u64        1 = f32, 2 = f64
//! ndim            u64
//! cells           u64 x ndim
//! lower           f64 x ndim
//! upper           f64 x ndim
//! elemSize        u64        bytes per cell (num_coeffs x sizeof(real))
//! size            u64        number of cells
//! data            size x elemSize bytes, cells row-major, coefficients contiguous
//! ```
//!
//! # Versioned layout
//!
//! ```text
//! magic           "gkyl0"
//! version         u64
//! fileType        u64        1 = field
//! metaSize        u64
//! meta            metaSize bytes (skipped)
//! <legacy layout>
//! ```

use std::fs;
use std::path::Path;

use bytes::{Buf, BufMut, BytesMut};
use log::debug;
use ndarray::{ArrayD, IxDyn};
use thiserror::Error;

use crate::error::InterpError;
use crate::grid::{FieldDataset, MAX_GRID_DIMS, UniformGrid};

const MAGIC: &[u8] = b"gkyl0";
const FILE_TYPE_FIELD: u64 = 1;
const REAL_TYPE_F32: u64 = 1;
const REAL_TYPE_F64: u64 = 2;

/// Error type for `.gkyl` files.
#[derive(Debug, Error)]
pub enum GkylError {
    /// I/O error during file operations.
    #[error("gkyl I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer ended before the named section was complete.
    #[error("Truncated gkyl file while reading {section}: need {needed} bytes, have {available}")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    /// Header values are inconsistent.
    #[error("Invalid gkyl header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported gkyl real type {0} (expected 1 = f32 or 2 = f64)")]
    UnsupportedRealType(u64),

    #[error("Unsupported gkyl file type {0} (only fields are supported)")]
    UnsupportedFileType(u64),

    /// The decoded data does not form a valid dataset.
    #[error("Invalid gkyl dataset: {0}")]
    Dataset(#[from] InterpError),
}

fn ensure(buf: &[u8], needed: usize, section: &'static str) -> Result<(), GkylError> {
    if buf.remaining() < needed {
        return Err(GkylError::Truncated {
            section,
            needed,
            available: buf.remaining(),
        });
    }
    Ok(())
}

fn read_u64(buf: &mut &[u8], section: &'static str) -> Result<u64, GkylError> {
    ensure(buf, 8, section)?;
    Ok(buf.get_u64_le())
}

fn read_usize(buf: &mut &[u8], section: &'static str) -> Result<usize, GkylError> {
    let value = read_u64(buf, section)?;
    usize::try_from(value).map_err(|_| {
        GkylError::InvalidHeader(format!("{} value {} overflows usize", section, value))
    })
}

fn read_f64s(buf: &mut &[u8], n: usize, section: &'static str) -> Result<Vec<f64>, GkylError> {
    ensure(buf, 8 * n, section)?;
    Ok((0..n).map(|_| buf.get_f64_le()).collect())
}

/// Skip the versioned preamble if present.
fn skip_preamble(buf: &mut &[u8]) -> Result<(), GkylError> {
    if !buf.starts_with(MAGIC) {
        return Ok(());
    }
    buf.advance(MAGIC.len());

    let version = read_u64(buf, "version")?;
    let file_type = read_u64(buf, "file type")?;
    if file_type != FILE_TYPE_FIELD {
        return Err(GkylError::UnsupportedFileType(file_type));
    }
    let meta_size = read_usize(buf, "metadata size")?;
    ensure(buf, meta_size, "metadata")?;
    buf.advance(meta_size);
    debug!(
        "gkyl: version {} file, skipped {} bytes of metadata",
        version, meta_size
    );
    Ok(())
}

/// Decode a `.gkyl` field from memory.
pub fn parse_gkyl(data: &[u8]) -> Result<FieldDataset, GkylError> {
    let mut buf = data;
    skip_preamble(&mut buf)?;

    let real_type = read_u64(&mut buf, "real type")?;
    let real_size = match real_type {
        REAL_TYPE_F32 => 4,
        REAL_TYPE_F64 => 8,
        other => return Err(GkylError::UnsupportedRealType(other)),
    };

    let ndim = read_usize(&mut buf, "ndim")?;
    if !(1..=MAX_GRID_DIMS).contains(&ndim) {
        return Err(GkylError::InvalidHeader(format!(
            "ndim {} outside 1..={}",
            ndim, MAX_GRID_DIMS
        )));
    }
    let cells = (0..ndim)
        .map(|_| read_usize(&mut buf, "cells"))
        .collect::<Result<Vec<_>, _>>()?;
    let lower = read_f64s(&mut buf, ndim, "lower bounds")?;
    let upper = read_f64s(&mut buf, ndim, "upper bounds")?;
    let elem_size = read_usize(&mut buf, "element size")?;
    let size = read_usize(&mut buf, "size")?;

    if elem_size == 0 || elem_size % real_size != 0 {
        return Err(GkylError::InvalidHeader(format!(
            "element size {} is not a positive multiple of {}",
            elem_size, real_size
        )));
    }
    let total_cells = cells
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| GkylError::InvalidHeader("cell count overflows".to_string()))?;
    if size != total_cells {
        return Err(GkylError::InvalidHeader(format!(
            "size {} does not match {:?} cells",
            size, cells
        )));
    }

    let num_coeffs = elem_size / real_size;
    let data_len = size
        .checked_mul(elem_size)
        .ok_or_else(|| GkylError::InvalidHeader("data size overflows".to_string()))?;
    ensure(buf, data_len, "data")?;

    let count = size * num_coeffs;
    let raw: Vec<f64> = if real_type == REAL_TYPE_F32 {
        (0..count).map(|_| f64::from(buf.get_f32_le())).collect()
    } else {
        (0..count).map(|_| buf.get_f64_le()).collect()
    };

    let grid = UniformGrid::new(lower, upper, cells.clone())?;
    let mut shape = cells;
    shape.push(num_coeffs);
    let values = ArrayD::from_shape_vec(IxDyn(&shape), raw)
        .map_err(|e| InterpError::shape_mismatch(format!("{:?}", shape), e.to_string()))?;
    Ok(FieldDataset::new(grid, values)?)
}

/// Read a `.gkyl` field file.
pub fn read_gkyl(path: impl AsRef<Path>) -> Result<FieldDataset, GkylError> {
    let data = fs::read(path)?;
    parse_gkyl(&data)
}

/// Encode a dataset in the legacy layout with `f64` data.
pub fn encode_gkyl(dataset: &FieldDataset) -> Vec<u8> {
    let grid = dataset.grid();
    let ndim = grid.num_dims();
    let values = dataset.values();

    let mut buf = BytesMut::with_capacity(8 * (4 + 3 * ndim) + 8 * values.len());
    buf.put_u64_le(REAL_TYPE_F64);
    buf.put_u64_le(ndim as u64);
    for &n in grid.num_cells() {
        buf.put_u64_le(n as u64);
    }
    for &x in grid.lower() {
        buf.put_f64_le(x);
    }
    for &x in grid.upper() {
        buf.put_f64_le(x);
    }
    buf.put_u64_le((8 * dataset.total_coeffs()) as u64);
    buf.put_u64_le(grid.total_cells() as u64);
    for &v in values.iter() {
        buf.put_f64_le(v);
    }
    buf.to_vec()
}

/// Write a dataset to a `.gkyl` file in the legacy layout.
pub fn write_gkyl(path: impl AsRef<Path>, dataset: &FieldDataset) -> Result<(), GkylError> {
    fs::write(path, encode_gkyl(dataset))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn sample_dataset() -> FieldDataset {
        let grid = UniformGrid::new(vec![-1.0, 0.0], vec![1.0, 2.0], vec![3, 2]).unwrap();
        let values = Array::from_shape_fn(IxDyn(&[3, 2, 4]), |idx| {
            (100 * idx[0] + 10 * idx[1] + idx[2]) as f64
        });
        FieldDataset::new(grid, values).unwrap()
    }

    fn legacy_header_f32(cells: &[u64], coeffs: u64) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u64_le(REAL_TYPE_F32);
        buf.put_u64_le(cells.len() as u64);
        for &n in cells {
            buf.put_u64_le(n);
        }
        for _ in cells {
            buf.put_f64_le(0.0);
        }
        for _ in cells {
            buf.put_f64_le(1.0);
        }
        buf.put_u64_le(4 * coeffs);
        buf.put_u64_le(cells.iter().product());
        buf
    }

    #[test]
    fn test_legacy_layout_fields() {
        let ds = sample_dataset();
        let parsed = parse_gkyl(&encode_gkyl(&ds)).unwrap();
        assert_eq!(parsed.grid(), ds.grid());
        assert_eq!(parsed.values(), ds.values());
        assert_eq!(parsed.values()[[2, 1, 3]], 213.0);
    }

    #[test]
    fn test_versioned_preamble_skipped() {
        let mut buf = BytesMut::new();
        buf.put_slice(MAGIC);
        buf.put_u64_le(1);
        buf.put_u64_le(FILE_TYPE_FIELD);
        buf.put_u64_le(5);
        buf.put_slice(b"meta!");
        buf.put_slice(&encode_gkyl(&sample_dataset()));

        let parsed = parse_gkyl(&buf).unwrap();
        assert_eq!(parsed.total_coeffs(), 4);
        assert_eq!(parsed.grid().num_cells(), &[3, 2]);
    }

    #[test]
    fn test_f32_data() {
        let mut buf = legacy_header_f32(&[2], 2);
        for v in [1.5f32, -2.0, 0.25, 8.0] {
            buf.put_f32_le(v);
        }
        let parsed = parse_gkyl(&buf).unwrap();
        assert_eq!(parsed.values().shape(), &[2, 2]);
        assert_eq!(parsed.values()[[1, 0]], 0.25);
    }

    #[test]
    fn test_truncated_data() {
        let bytes = encode_gkyl(&sample_dataset());
        let cut = &bytes[..bytes.len() - 3];
        assert!(matches!(
            parse_gkyl(cut),
            Err(GkylError::Truncated { section: "data", .. })
        ));
        assert!(matches!(
            parse_gkyl(&bytes[..12]),
            Err(GkylError::Truncated { .. })
        ));
    }

    #[test]
    fn test_header_errors() {
        let mut bytes = encode_gkyl(&sample_dataset());
        bytes[0] = 7;
        assert!(matches!(
            parse_gkyl(&bytes),
            Err(GkylError::UnsupportedRealType(7))
        ));

        let mut buf = BytesMut::new();
        buf.put_slice(MAGIC);
        buf.put_u64_le(1);
        buf.put_u64_le(3);
        assert!(matches!(
            parse_gkyl(&buf),
            Err(GkylError::UnsupportedFileType(3))
        ));

        // size field disagrees with the cell counts
        let mut buf = legacy_header_f32(&[2], 1);
        let len = buf.len();
        buf[len - 8..].copy_from_slice(&5u64.to_le_bytes());
        assert!(matches!(parse_gkyl(&buf), Err(GkylError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_grid_reported_as_dataset_error() {
        let mut buf = BytesMut::new();
        buf.put_u64_le(REAL_TYPE_F64);
        buf.put_u64_le(1);
        buf.put_u64_le(1);
        buf.put_f64_le(1.0);
        buf.put_f64_le(0.0);
        buf.put_u64_le(8);
        buf.put_u64_le(1);
        buf.put_f64_le(0.0);
        assert!(matches!(
            parse_gkyl(&buf),
            Err(GkylError::Dataset(InterpError::InvalidGrid(_)))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field_0.gkyl");
        write_gkyl(&path, &sample_dataset()).unwrap();
        let loaded = read_gkyl(&path).unwrap();
        assert_eq!(loaded.values(), sample_dataset().values());

        assert!(matches!(
            read_gkyl(dir.path().join("missing.gkyl")),
            Err(GkylError::Io(_))
        ));
    }
}
