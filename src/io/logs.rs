//! Plain-text convergence and angle-sweep logs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use num_complex::Complex64;

use crate::error::{Result, SvmError};
use crate::solver::SolverResults;

/// One line per accepted function: `index<TAB>re im`, indices absolute in a
/// basis of `basis_len` functions whose last `convergence.len()` were accepted.
pub fn write_convergence<W: Write>(mut writer: W, basis_len: usize, convergence: &[Complex64]) -> Result<()> {
    let offset = basis_len.checked_sub(convergence.len()).ok_or_else(|| {
        SvmError::InvalidConfig(format!(
            "{} convergence entries for a basis of {} functions",
            convergence.len(),
            basis_len
        ))
    })?;
    for (i, e) in convergence.iter().enumerate() {
        writeln!(writer, "{}\t{} {}", i + offset, e.re, e.im)?;
    }
    Ok(())
}

/// One line per angle: `theta` then `<TAB>re im` for each eigenvalue.
pub fn write_sweep<W: Write>(mut writer: W, sweep: &[(f64, SolverResults)]) -> Result<()> {
    for (theta, results) in sweep {
        write!(writer, "{}", theta)?;
        for e in &results.eigenvalues {
            write!(writer, "\t{} {}", e.re, e.im)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn save_convergence<P: AsRef<Path>>(path: P, basis_len: usize, convergence: &[Complex64]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_convergence(&mut writer, basis_len, convergence)?;
    writer.flush()?;
    Ok(())
}

pub fn save_sweep<P: AsRef<Path>>(path: P, sweep: &[(f64, SolverResults)]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_sweep(&mut writer, sweep)?;
    writer.flush()?;
    Ok(())
}
