//! Sparse-matrix primitives used to assemble every operator.
//!
//! All operators are [`CsrMatrix<f64>`]. Assembly routines go through
//! COO triplets and convert once, which sums duplicate entries and keeps
//! row-wise access cheap for the matrix products that follow.
//!
//! # Block assembly
//!
//! [`hstack`], [`vstack`], [`block_diag`] and [`bmat`] mirror the usual
//! block constructors. Zero blocks are passed explicitly as
//! [`spzeros`] of the right shape; every routine checks that adjacent
//! blocks agree and returns [`OperatorError::ShapeMismatch`] otherwise.

use crate::error::OperatorError;
use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// The sparse matrix type every operator is expressed in.
pub type SparseMatrix = CsrMatrix<f64>;

/// Build a CSR matrix from `(row, col, value)` triplets.
///
/// Exact zeros are skipped; duplicate coordinates are summed.
///
/// # Panics
///
/// Panics if a triplet lies outside `nrows x ncols`. Callers in this
/// workspace only generate in-bounds indices.
pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> SparseMatrix
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut coo = CooMatrix::new(nrows, ncols);
    for (row, col, val) in triplets {
        if val != 0.0 {
            coo.push(row, col, val);
        }
    }
    CsrMatrix::from(&coo)
}

/// Sparse identity of size `n`.
pub fn speye(n: usize) -> SparseMatrix {
    CsrMatrix::identity(n)
}

/// Sparse matrix of shape `nrows x ncols` with no stored entries.
pub fn spzeros(nrows: usize, ncols: usize) -> SparseMatrix {
    CsrMatrix::zeros(nrows, ncols)
}

/// Sparse diagonal matrix with `diag` on its main diagonal.
pub fn sdiag(diag: &[f64]) -> SparseMatrix {
    let n = diag.len();
    from_triplets(n, n, diag.iter().enumerate().map(|(i, &v)| (i, i, v)))
}

/// Sparse diagonal of the element-wise reciprocal of `diag`.
pub fn sdiag_inv(diag: &[f64]) -> SparseMatrix {
    let n = diag.len();
    from_triplets(n, n, diag.iter().enumerate().map(|(i, &v)| (i, i, 1.0 / v)))
}

/// Kronecker product `a ⊗ b`.
///
/// `b` varies fastest: entry `(i, j)` of `a` scales the block at rows
/// `i * b.nrows()..` and columns `j * b.ncols()..`.
pub fn kron(a: &SparseMatrix, b: &SparseMatrix) -> SparseMatrix {
    let (br, bc) = (b.nrows(), b.ncols());
    let mut coo = CooMatrix::new(a.nrows() * br, a.ncols() * bc);
    for (i, j, &va) in a.triplet_iter() {
        for (k, l, &vb) in b.triplet_iter() {
            let v = va * vb;
            if v != 0.0 {
                coo.push(i * br + k, j * bc + l, v);
            }
        }
    }
    CsrMatrix::from(&coo)
}

/// Three-factor Kronecker product `a ⊗ b ⊗ c`.
pub fn kron3(a: &SparseMatrix, b: &SparseMatrix, c: &SparseMatrix) -> SparseMatrix {
    kron(a, &kron(b, c))
}

/// Concatenate blocks side by side. All blocks must share a row count.
pub fn hstack(blocks: &[&SparseMatrix]) -> Result<SparseMatrix, OperatorError> {
    let nrows = blocks.first().map_or(0, |b| b.nrows());
    let mut ncols = 0;
    for b in blocks {
        check_extent("hstack", nrows, b.nrows())?;
        ncols += b.ncols();
    }
    let mut triplets = Vec::with_capacity(blocks.iter().map(|b| b.nnz()).sum());
    let mut col0 = 0;
    for b in blocks {
        triplets.extend(b.triplet_iter().map(|(i, j, &v)| (i, col0 + j, v)));
        col0 += b.ncols();
    }
    Ok(from_triplets(nrows, ncols, triplets))
}

/// Stack blocks vertically. All blocks must share a column count.
pub fn vstack(blocks: &[&SparseMatrix]) -> Result<SparseMatrix, OperatorError> {
    let ncols = blocks.first().map_or(0, |b| b.ncols());
    let mut nrows = 0;
    for b in blocks {
        check_extent("vstack", ncols, b.ncols())?;
        nrows += b.nrows();
    }
    let mut triplets = Vec::with_capacity(blocks.iter().map(|b| b.nnz()).sum());
    let mut row0 = 0;
    for b in blocks {
        triplets.extend(b.triplet_iter().map(|(i, j, &v)| (row0 + i, j, v)));
        row0 += b.nrows();
    }
    Ok(from_triplets(nrows, ncols, triplets))
}

/// Place blocks along the diagonal of an otherwise empty matrix.
pub fn block_diag(blocks: &[&SparseMatrix]) -> SparseMatrix {
    let nrows = blocks.iter().map(|b| b.nrows()).sum();
    let ncols = blocks.iter().map(|b| b.ncols()).sum();
    let mut triplets = Vec::with_capacity(blocks.iter().map(|b| b.nnz()).sum());
    let (mut row0, mut col0) = (0, 0);
    for b in blocks {
        triplets.extend(b.triplet_iter().map(|(i, j, &v)| (row0 + i, col0 + j, v)));
        row0 += b.nrows();
        col0 += b.ncols();
    }
    from_triplets(nrows, ncols, triplets)
}

/// Assemble a full block matrix from rows of blocks.
///
/// Every block row must have the same number of blocks; blocks in one
/// row share a row count and blocks in one column share a column count.
pub fn bmat(rows: &[&[&SparseMatrix]]) -> Result<SparseMatrix, OperatorError> {
    let ncols_blocks = rows.first().map_or(0, |r| r.len());
    let mut col_widths = Vec::with_capacity(ncols_blocks);
    if let Some(first) = rows.first() {
        col_widths.extend(first.iter().map(|b| b.ncols()));
    }
    let mut row_stacks = Vec::with_capacity(rows.len());
    for row in rows {
        check_extent("bmat", ncols_blocks, row.len())?;
        for (b, &w) in row.iter().zip(&col_widths) {
            check_extent("bmat", w, b.ncols())?;
        }
        row_stacks.push(hstack(row)?);
    }
    let refs: Vec<&SparseMatrix> = row_stacks.iter().collect();
    vstack(&refs)
}

/// Multiply every stored entry by `factor`.
pub fn scale(m: &SparseMatrix, factor: f64) -> SparseMatrix {
    let mut out = m.clone();
    for v in out.values_mut() {
        *v *= factor;
    }
    out
}

/// Keep only the rows of `m` whose flag in `keep` is set.
///
/// Applied to an identity this yields a selection (projection) matrix.
pub fn select_rows(m: &SparseMatrix, keep: &[bool]) -> Result<SparseMatrix, OperatorError> {
    check_extent("select_rows", m.nrows(), keep.len())?;
    let mut new_index = Vec::with_capacity(keep.len());
    let mut kept = 0;
    for &k in keep {
        new_index.push(kept);
        if k {
            kept += 1;
        }
    }
    let triplets = m
        .triplet_iter()
        .filter(|&(i, _, _)| keep[i])
        .map(|(i, j, &v)| (new_index[i], j, v));
    Ok(from_triplets(kept, m.ncols(), triplets))
}

/// Sparse matrix–vector product.
pub fn mul_vec(m: &SparseMatrix, x: &DVector<f64>) -> Result<DVector<f64>, OperatorError> {
    check_extent("mul_vec", m.ncols(), x.len())?;
    let mut y = DVector::zeros(m.nrows());
    for (i, j, &v) in m.triplet_iter() {
        y[i] += v * x[j];
    }
    Ok(y)
}

/// Sparse matrix product `a * b`.
pub fn matmul(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix, OperatorError> {
    check_extent("matmul", a.ncols(), b.nrows())?;
    Ok(a * b)
}

/// Sparse sum `a + b`.
pub fn add(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix, OperatorError> {
    check_extent("add (rows)", a.nrows(), b.nrows())?;
    check_extent("add (cols)", a.ncols(), b.ncols())?;
    Ok(a + b)
}

fn check_extent(context: &'static str, expected: usize, actual: usize) -> Result<(), OperatorError> {
    if expected != actual {
        return Err(OperatorError::ShapeMismatch {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}
