//! JSON persistence of a basis.
//!
//! `{"metadata": {"size": n}, "basis": [{"A": [...], "widths": [...], "norm": x}]}`
//! with matrices flattened row-major.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::basis::{Basis, CorrelatedGaussian};
use crate::error::{Result, SvmError};

#[derive(Serialize, Deserialize, Debug)]
struct Metadata {
    size: usize,
}

#[derive(Serialize, Deserialize, Debug)]
struct Entry {
    #[serde(rename = "A")]
    a: Vec<f64>,
    widths: Vec<f64>,
    norm: f64,
}

#[derive(Serialize, Deserialize, Debug)]
struct BasisFile {
    metadata: Metadata,
    basis: Vec<Entry>,
}

fn flatten(m: &DMatrix<f64>) -> Vec<f64> {
    m.row_iter().flat_map(|row| row.iter().copied().collect::<Vec<_>>()).collect()
}

fn square(values: &[f64], what: &str, index: usize) -> Result<DMatrix<f64>> {
    let side = (values.len() as f64).sqrt().round() as usize;
    if side * side != values.len() {
        return Err(SvmError::BasisFormat(format!(
            "entry {}: {} has {} values, not a square matrix",
            index,
            what,
            values.len()
        )));
    }
    Ok(DMatrix::from_row_slice(side, side, values))
}

pub fn write_basis_to<W: Write>(writer: W, basis: &[CorrelatedGaussian]) -> Result<()> {
    let file = BasisFile {
        metadata: Metadata { size: basis.len() },
        basis: basis
            .iter()
            .map(|f| Entry {
                a: flatten(f.correlation()),
                widths: flatten(f.widths()),
                norm: f.norm(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &file)?;
    Ok(())
}

pub fn read_basis_from<R: Read>(reader: R) -> Result<Basis> {
    let file: BasisFile = serde_json::from_reader(reader)?;
    file.basis
        .iter()
        .enumerate()
        .map(|(k, entry)| {
            let a = square(&entry.a, "A", k)?;
            let widths = square(&entry.widths, "widths", k)?;
            if widths.nrows() != a.nrows() + 1 {
                return Err(SvmError::BasisFormat(format!(
                    "entry {}: widths side {} does not match A side {} + 1",
                    k,
                    widths.nrows(),
                    a.nrows()
                )));
            }
            Ok(CorrelatedGaussian::from_parts(widths, a, entry.norm))
        })
        .collect()
}

pub fn write_basis<P: AsRef<Path>>(path: P, basis: &[CorrelatedGaussian]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_basis_to(&mut writer, basis)?;
    writer.flush()?;
    Ok(())
}

/// Read a basis; a file that cannot be opened yields an empty basis.
pub fn read_basis<P: AsRef<Path>>(path: P) -> Result<Basis> {
    let file = match File::open(path.as_ref()) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = %path.as_ref().display(), error = %e, "no basis file, starting empty");
            return Ok(Basis::new());
        }
    };
    read_basis_from(BufReader::new(file))
}
