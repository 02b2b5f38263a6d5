//! Generalized eigenproblems H ψ = E O ψ with a real symmetric positive-definite O.
//!
//! Both modes reduce the pencil with the Cholesky factor O = L Lᵀ to the
//! standard problem M y = E y, M = L⁻¹ H L⁻ᴴ, ψ = L⁻ᴴ y.

use nalgebra::{DMatrix, DVector, Schur, SymmetricEigen, SVD};
use num_complex::Complex64;

use crate::error::{Result, SvmError};

const EIGEN_EPS: f64 = f64::EPSILON;
const MAX_ITERATIONS: usize = 100_000;

fn fail(msg: &str) -> SvmError {
    SvmError::Diagonalization(msg.to_string())
}

/// Returns (M, L) with L the complexified Cholesky factor of O.
fn reduce(h: &DMatrix<Complex64>, o: &DMatrix<f64>) -> Result<(DMatrix<Complex64>, DMatrix<Complex64>)> {
    let chol = o
        .clone()
        .cholesky()
        .ok_or_else(|| fail("overlap matrix is not positive definite"))?;
    let l = chol.l().map(|x| Complex64::new(x, 0.0));

    // X = L⁻¹ H, then M = (L⁻¹ Xᴴ)ᴴ = L⁻¹ H L⁻ᴴ
    let x = l
        .solve_lower_triangular(h)
        .ok_or_else(|| fail("singular Cholesky factor"))?;
    let m = l
        .solve_lower_triangular(&x.adjoint())
        .ok_or_else(|| fail("singular Cholesky factor"))?
        .adjoint();
    Ok((m, l))
}

/// Hermitian pencil: real eigenvalues (zero imaginary part) and O-orthonormal
/// eigenvectors, sorted ascending.
pub fn solve_hermitian(h: &DMatrix<Complex64>, o: &DMatrix<f64>) -> Result<(Vec<Complex64>, Vec<DVector<Complex64>>)> {
    if h.nrows() == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    let (m, l) = reduce(h, o)?;
    let m = (&m + m.adjoint()) * Complex64::new(0.5, 0.0);

    let eigen = SymmetricEigen::try_new(m, EIGEN_EPS, MAX_ITERATIONS)
        .ok_or_else(|| fail("Hermitian eigensolver did not converge"))?;
    let vectors = l
        .adjoint()
        .solve_upper_triangular(&eigen.eigenvectors)
        .ok_or_else(|| fail("singular Cholesky factor"))?;

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));

    let values = order.iter().map(|&k| Complex64::new(eigen.eigenvalues[k], 0.0)).collect();
    let vectors = order.iter().map(|&k| vectors.column(k).into_owned()).collect();
    Ok((values, vectors))
}

/// General complex pencil (complex-rotated Hamiltonian): eigenvalues only,
/// sorted ascending by real part.
pub fn solve_general(h: &DMatrix<Complex64>, o: &DMatrix<f64>) -> Result<Vec<Complex64>> {
    if h.nrows() == 0 {
        return Ok(Vec::new());
    }
    let (m, _) = reduce(h, o)?;
    let schur = Schur::try_new(m, EIGEN_EPS, MAX_ITERATIONS)
        .ok_or_else(|| fail("complex Schur decomposition did not converge"))?;
    let mut values: Vec<Complex64> = schur
        .eigenvalues()
        .ok_or_else(|| fail("Schur form is not triangular"))?
        .iter()
        .copied()
        .collect();
    values.sort_by(|a, b| a.re.total_cmp(&b.re));
    Ok(values)
}

/// Smallest singular value of a real matrix, `None` if the SVD does not converge.
pub fn smallest_singular_value(o: &DMatrix<f64>) -> Option<f64> {
    if o.nrows() == 0 {
        return None;
    }
    let svd = SVD::try_new(o.clone(), false, false, EIGEN_EPS, MAX_ITERATIONS)?;
    Some(svd.singular_values.min())
}
