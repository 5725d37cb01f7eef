//! Field-wise LU factorisation of small coupled systems.
//!
//! Every coefficient `A[i][j]` of an `m x m` system is a field, so one
//! factorisation solves an independent system at every cell (or face)
//! without ever assembling a per-cell matrix. Elimination runs in index
//! order without pivoting, which is exact for the diagonally dominant drag
//! coupling matrices built by the momentum transfer system.

use pf_core::Real;
use pf_mesh::{Field, FieldValue};
use tracing::trace;

use crate::error::{SystemError, SystemResult};

/// In-place LU factors: unit lower multipliers below the diagonal, the
/// upper factor on and above it.
#[derive(Debug)]
pub struct FieldLu<L> {
    lu: Vec<Vec<Field<Real, L>>>,
}

impl<L> FieldLu<L> {
    /// Factorise the square coefficient array `a` (row-major, `a[i][j]`).
    pub fn factorize(mut a: Vec<Vec<Field<Real, L>>>) -> SystemResult<Self> {
        let m = a.len();
        if let Some(row) = a.iter().find(|row| row.len() != m) {
            return Err(SystemError::SizeMismatch {
                what: "coefficient columns",
                expected: m,
                actual: row.len(),
            });
        }

        for i in 0..m {
            check_pivot(&a[i][i], i)?;
            for j in (i + 1)..m {
                let l = &a[j][i] / &a[i][i];
                for k in (i + 1)..m {
                    let update = &l * &a[i][k];
                    a[j][k] -= &update;
                }
                a[j][i] = l;
            }
            trace!(pivot = i, rows = m - i - 1, "eliminated column");
        }
        Ok(Self { lu: a })
    }

    pub fn size(&self) -> usize {
        self.lu.len()
    }

    /// Solve for one right-hand side per row by forward then back
    /// substitution.
    pub fn solve<T: FieldValue>(&self, mut b: Vec<Field<T, L>>) -> SystemResult<Vec<Field<T, L>>> {
        let m = self.size();
        if b.len() != m {
            return Err(SystemError::SizeMismatch {
                what: "right-hand sides",
                expected: m,
                actual: b.len(),
            });
        }

        for i in 1..m {
            for j in 0..i {
                let update = &self.lu[i][j] * &b[j];
                b[i] -= &update;
            }
        }
        trace!(rows = m, "forward substitution done");

        for i in (0..m).rev() {
            for k in (i + 1)..m {
                let update = &self.lu[i][k] * &b[k];
                b[i] -= &update;
            }
            b[i] = &b[i] / &self.lu[i][i];
        }
        trace!(rows = m, "back substitution done");
        Ok(b)
    }
}

fn check_pivot<L>(pivot: &Field<Real, L>, row: usize) -> SystemResult<()> {
    match pivot.values().iter().position(|&p| p == 0.0 || !p.is_finite()) {
        Some(at) => Err(SystemError::Numeric {
            what: format!("zero or non-finite pivot in row {row} at location {at}"),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};
    use pf_mesh::{Vector, VolLocation, VolScalarField, VolVectorField};

    fn scalar(values: &[Real]) -> VolScalarField {
        VolScalarField::from_values("a", values.to_vec())
    }

    /// Coefficients for two cells with different 3x3 systems.
    fn two_cell_system() -> Vec<Vec<VolScalarField>> {
        let cell0 = [[4.0, -1.0, -2.0], [-0.5, 3.0, -1.0], [-1.0, -1.0, 5.0]];
        let cell1 = [[2.0, -0.5, 0.0], [-1.0, 6.0, -3.0], [0.0, -2.0, 2.5]];
        (0..3)
            .map(|i| (0..3).map(|j| scalar(&[cell0[i][j], cell1[i][j]])).collect())
            .collect()
    }

    #[test]
    fn matches_dense_solve_per_cell() {
        let rhs = [[1.0, 2.0], [-3.0, 0.5], [0.25, 4.0]];
        let b: Vec<VolScalarField> = rhs.iter().map(|r| scalar(r)).collect();
        let x = FieldLu::factorize(two_cell_system()).unwrap().solve(b).unwrap();

        let cells = [
            [[4.0, -1.0, -2.0], [-0.5, 3.0, -1.0], [-1.0, -1.0, 5.0]],
            [[2.0, -0.5, 0.0], [-1.0, 6.0, -3.0], [0.0, -2.0, 2.5]],
        ];
        for (c, coeffs) in cells.iter().enumerate() {
            let a = DMatrix::from_fn(3, 3, |i, j| coeffs[i][j]);
            let rhs = DVector::from_fn(3, |i, _| rhs[i][c]);
            let expected = a.lu().solve(&rhs).unwrap();
            for i in 0..3 {
                assert!((x[i].values()[c] - expected[i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn one_factorisation_serves_vector_right_hand_sides() {
        let lu = FieldLu::factorize(two_cell_system()).unwrap();
        let b: Vec<VolVectorField> = (0..3)
            .map(|i| {
                VolVectorField::from_values(
                    "U",
                    vec![Vector::new(i as Real, 1.0, -1.0), Vector::new(0.0, 2.0, i as Real)],
                )
            })
            .collect();
        let x = lu.solve(b).unwrap();

        let bx: Vec<VolScalarField> = (0..3)
            .map(|i| scalar(&[i as Real, 0.0]))
            .collect();
        let xs = lu.solve(bx).unwrap();
        for i in 0..3 {
            assert!((x[i].values()[0].x - xs[i].values()[0]).abs() < 1e-14);
            assert!((x[i].values()[1].x - xs[i].values()[1]).abs() < 1e-14);
        }
    }

    #[test]
    fn zero_pivot_is_reported() {
        let a = vec![
            vec![scalar(&[1.0, 0.0]), scalar(&[0.0, 0.0])],
            vec![scalar(&[0.0, 0.0]), scalar(&[1.0, 1.0])],
        ];
        let err = FieldLu::<VolLocation>::factorize(a).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn size_mismatch_is_reported() {
        let lu = FieldLu::factorize(two_cell_system()).unwrap();
        assert!(lu.solve(vec![scalar(&[1.0, 1.0])]).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn diagonally_dominant_systems_match_dense_lu(
                off in prop::collection::vec(0.0..5.0f64, 6),
                rhs in prop::collection::vec(-10.0..10.0f64, 3),
            ) {
                // Rows shaped like the drag coupling: 1 + sum on the
                // diagonal, the negated couplings off it.
                let mut dense = [[0.0; 3]; 3];
                let mut idx = 0;
                for (i, row) in dense.iter_mut().enumerate() {
                    row[i] = 1.0;
                    for j in 0..3 {
                        if j != i {
                            row[j] = -off[idx];
                            row[i] += off[idx];
                            idx += 1;
                        }
                    }
                }
                let a = (0..3)
                    .map(|i| (0..3).map(|j| scalar(&[dense[i][j]])).collect())
                    .collect();
                let b = rhs.iter().map(|&r| scalar(&[r])).collect();
                let x = FieldLu::factorize(a).unwrap().solve(b).unwrap();

                let expected = DMatrix::from_fn(3, 3, |i, j| dense[i][j])
                    .lu()
                    .solve(&DVector::from_column_slice(&rhs))
                    .unwrap();
                for i in 0..3 {
                    prop_assert!((x[i].values()[0] - expected[i]).abs() < 1e-9);
                }
            }
        }
    }
}
