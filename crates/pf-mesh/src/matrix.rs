//! Implicit/explicit source bundles returned by transfer assembly.
//!
//! An `FvMatrix` represents a cell source `S(psi) = su - sp * psi` for the
//! field named `psi`. Assembling it into a full equation and solving is the
//! job of the external linear solver.

use std::ops::AddAssign;

use pf_core::Real;

use crate::field::{Field, FieldValue, Vector, VolLocation, VolScalarField};

#[derive(Debug, Clone, PartialEq)]
pub struct FvMatrix<T> {
    psi: String,
    sp: Vec<Real>,
    su: Vec<T>,
}

pub type FvScalarMatrix = FvMatrix<Real>;
pub type FvVectorMatrix = FvMatrix<Vector>;

impl<T: FieldValue> FvMatrix<T> {
    /// An empty source for `psi` over `n` cells.
    pub fn new(psi: impl Into<String>, n: usize) -> Self {
        Self {
            psi: psi.into(),
            sp: vec![0.0; n],
            su: vec![T::zero(); n],
        }
    }

    pub fn psi(&self) -> &str {
        &self.psi
    }

    pub fn len(&self) -> usize {
        self.sp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sp.is_empty()
    }

    /// Implicit coefficient per cell (the source is `-sp * psi`).
    pub fn sp(&self) -> &[Real] {
        &self.sp
    }

    /// Explicit source per cell.
    pub fn su(&self) -> &[T] {
        &self.su
    }

    /// Add `-coeff * psi`.
    pub fn add_implicit(&mut self, coeff: &VolScalarField) {
        for (sp, &c) in self.sp.iter_mut().zip(coeff.values()) {
            *sp += c;
        }
    }

    /// Add an explicit source.
    pub fn add_explicit(&mut self, source: &Field<T, VolLocation>) {
        for (su, &s) in self.su.iter_mut().zip(source.values()) {
            *su += s;
        }
    }

    /// Evaluate `su - sp * psi` for a given field value.
    pub fn source(&self, psi: &Field<T, VolLocation>) -> Field<T, VolLocation> {
        let values = self
            .su
            .iter()
            .zip(&self.sp)
            .zip(psi.values())
            .map(|((&su, &sp), &p)| su - p * sp)
            .collect();
        Field::from_values(format!("S({})", self.psi), values)
    }
}

impl<T> AddAssign<&FvMatrix<T>> for FvMatrix<T>
where
    T: Copy + AddAssign,
{
    fn add_assign(&mut self, rhs: &FvMatrix<T>) {
        for (a, &b) in self.sp.iter_mut().zip(&rhs.sp) {
            *a += b;
        }
        for (a, &b) in self.su.iter_mut().zip(&rhs.su) {
            *a += b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::VolVectorField;

    #[test]
    fn implicit_and_explicit_parts_combine() {
        let mut m = FvScalarMatrix::new("T", 2);
        m.add_implicit(&VolScalarField::uniform("K", 2, 2.0));
        m.add_explicit(&VolScalarField::from_values("KT", vec![600.0, 700.0]));
        let s = m.source(&VolScalarField::from_values("T", vec![300.0, 350.0]));
        assert_eq!(s.values(), &[0.0, 0.0]);
    }

    #[test]
    fn vector_matrix_accumulates() {
        let mut a = FvVectorMatrix::new("U", 1);
        let mut b = FvVectorMatrix::new("U", 1);
        b.add_explicit(&VolVectorField::uniform("F", 1, Vector::new(1.0, 0.0, 0.0)));
        b.add_implicit(&VolScalarField::uniform("c", 1, 0.5));
        a += &b;
        a += &b;
        assert_eq!(a.su()[0], Vector::new(2.0, 0.0, 0.0));
        assert_eq!(a.sp()[0], 1.0);
    }
}
