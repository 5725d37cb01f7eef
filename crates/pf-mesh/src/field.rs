//! Cell-centred and face-centred geometric fields.
//!
//! A field is a named, flat list of values, one per cell (`VolLocation`) or
//! one per face (`SurfaceLocation`). The location is a type parameter so a
//! face field can never be multiplied into a cell field by accident.
//!
//! Elementwise kernels switch to rayon above `PAR_THRESHOLD` values.

use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use pf_core::Real;
use rayon::prelude::*;

/// Cartesian vector used for velocities, forces and face area vectors.
pub type Vector = nalgebra::Vector3<Real>;

/// Below this many values elementwise kernels run serially.
pub const PAR_THRESHOLD: usize = 4096;

/// Marker: values live at cell centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolLocation;

/// Marker: values live at face centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLocation;

/// Values a field can hold: scalars and vectors.
pub trait FieldValue:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Real, Output = Self>
    + Div<Real, Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    fn zero() -> Self;
}

impl FieldValue for Real {
    fn zero() -> Self {
        0.0
    }
}

impl FieldValue for Vector {
    fn zero() -> Self {
        Vector::zeros()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field<T, L> {
    name: String,
    values: Vec<T>,
    _location: PhantomData<L>,
}

pub type VolScalarField = Field<Real, VolLocation>;
pub type VolVectorField = Field<Vector, VolLocation>;
pub type SurfaceScalarField = Field<Real, SurfaceLocation>;
pub type SurfaceVectorField = Field<Vector, SurfaceLocation>;

impl<T, L> Field<T, L>
where
    T: Copy + Send + Sync,
{
    pub fn from_values(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            values,
            _location: PhantomData,
        }
    }

    pub fn uniform(name: impl Into<String>, len: usize, value: T) -> Self {
        Self::from_values(name, vec![value; len])
    }

    pub fn zeros(name: impl Into<String>, len: usize) -> Self
    where
        T: FieldValue,
    {
        Self::uniform(name, len, T::zero())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the same values under a new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn map<U, F>(&self, name: impl Into<String>, f: F) -> Field<U, L>
    where
        U: Copy + Send + Sync,
        F: Fn(T) -> U + Send + Sync,
    {
        let values = if self.values.len() >= PAR_THRESHOLD {
            self.values.par_iter().map(|&v| f(v)).collect()
        } else {
            self.values.iter().map(|&v| f(v)).collect()
        };
        Field::from_values(name, values)
    }

    /// Combine two fields of the same location value by value.
    ///
    /// # Panics
    /// If the fields differ in length.
    pub fn zip_map<U, V, F>(&self, other: &Field<U, L>, name: impl Into<String>, f: F) -> Field<V, L>
    where
        U: Copy + Send + Sync,
        V: Copy + Send + Sync,
        F: Fn(T, U) -> V + Send + Sync,
    {
        assert_eq!(
            self.len(),
            other.len(),
            "field size mismatch: {} vs {}",
            self.name,
            other.name
        );
        let values = if self.values.len() >= PAR_THRESHOLD {
            self.values
                .par_iter()
                .zip(other.values.par_iter())
                .map(|(&a, &b)| f(a, b))
                .collect()
        } else {
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect()
        };
        Field::from_values(name, values)
    }

    /// Update every value in place from the matching value of `other`.
    ///
    /// # Panics
    /// If the fields differ in length.
    pub fn zip_apply<U, F>(&mut self, other: &Field<U, L>, f: F)
    where
        U: Copy + Send + Sync,
        F: Fn(&mut T, U) + Send + Sync,
    {
        assert_eq!(
            self.len(),
            other.len(),
            "field size mismatch: {} vs {}",
            self.name,
            other.name
        );
        if self.values.len() >= PAR_THRESHOLD {
            self.values
                .par_iter_mut()
                .zip(other.values.par_iter())
                .for_each(|(a, &b)| f(a, b));
        } else {
            self.values
                .iter_mut()
                .zip(other.values.iter())
                .for_each(|(a, &b)| f(a, b));
        }
    }
}

impl<L> Field<Real, L> {
    pub fn min(&self) -> Real {
        self.values.iter().copied().fold(Real::INFINITY, Real::min)
    }

    pub fn max(&self) -> Real {
        self.values.iter().copied().fold(Real::NEG_INFINITY, Real::max)
    }

    /// Elementwise `max(self, floor)`.
    pub fn max_with(&self, floor: Real) -> Self {
        self.map(self.name.clone(), |v| v.max(floor))
    }
}

impl<L> Field<Vector, L> {
    /// Elementwise Euclidean magnitude.
    pub fn mag(&self) -> Field<Real, L> {
        self.map(format!("mag({})", self.name), |v| v.norm())
    }
}

impl<T, L> Add for &Field<T, L>
where
    T: Copy + Send + Sync + Add<Output = T>,
{
    type Output = Field<T, L>;

    fn add(self, rhs: Self) -> Field<T, L> {
        self.zip_map(rhs, format!("({} + {})", self.name, rhs.name), |a, b| a + b)
    }
}

impl<T, L> Sub for &Field<T, L>
where
    T: Copy + Send + Sync + Sub<Output = T>,
{
    type Output = Field<T, L>;

    fn sub(self, rhs: Self) -> Field<T, L> {
        self.zip_map(rhs, format!("({} - {})", self.name, rhs.name), |a, b| a - b)
    }
}

/// Scalar field times any field, broadcast per value.
impl<T, L> Mul<&Field<T, L>> for &Field<Real, L>
where
    T: Copy + Send + Sync + Mul<Real, Output = T>,
{
    type Output = Field<T, L>;

    fn mul(self, rhs: &Field<T, L>) -> Field<T, L> {
        self.zip_map(rhs, format!("({}*{})", self.name, rhs.name), |s, v| v * s)
    }
}

impl<T, L> Div<&Field<Real, L>> for &Field<T, L>
where
    T: Copy + Send + Sync + Div<Real, Output = T>,
{
    type Output = Field<T, L>;

    fn div(self, rhs: &Field<Real, L>) -> Field<T, L> {
        self.zip_map(rhs, format!("({}|{})", self.name, rhs.name), |v, s| v / s)
    }
}

impl<T, L> Mul<Real> for &Field<T, L>
where
    T: Copy + Send + Sync + Mul<Real, Output = T>,
{
    type Output = Field<T, L>;

    fn mul(self, rhs: Real) -> Field<T, L> {
        self.map(self.name.clone(), |v| v * rhs)
    }
}

impl<T, L> Neg for &Field<T, L>
where
    T: Copy + Send + Sync + Neg<Output = T>,
{
    type Output = Field<T, L>;

    fn neg(self) -> Field<T, L> {
        self.map(format!("-{}", self.name), |v| -v)
    }
}

impl<T, L> AddAssign<&Field<T, L>> for Field<T, L>
where
    T: Copy + Send + Sync + AddAssign,
{
    fn add_assign(&mut self, rhs: &Field<T, L>) {
        self.zip_apply(rhs, |a, b| *a += b);
    }
}

impl<T, L> SubAssign<&Field<T, L>> for Field<T, L>
where
    T: Copy + Send + Sync + SubAssign,
{
    fn sub_assign(&mut self, rhs: &Field<T, L>) {
        self.zip_apply(rhs, |a, b| *a -= b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_times_vector_broadcasts() {
        let s = VolScalarField::from_values("s", vec![2.0, 0.5]);
        let v = VolVectorField::from_values(
            "v",
            vec![Vector::new(1.0, 2.0, 3.0), Vector::new(4.0, 0.0, -2.0)],
        );
        let out = &s * &v;
        assert_eq!(out.values()[0], Vector::new(2.0, 4.0, 6.0));
        assert_eq!(out.values()[1], Vector::new(2.0, 0.0, -1.0));
    }

    #[test]
    fn add_sub_assign() {
        let mut a = SurfaceScalarField::uniform("a", 3, 1.0);
        let b = SurfaceScalarField::from_values("b", vec![1.0, 2.0, 3.0]);
        a += &b;
        assert_eq!(a.values(), &[2.0, 3.0, 4.0]);
        a -= &b;
        assert_eq!(a.values(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn min_max_and_floor() {
        let f = VolScalarField::from_values("f", vec![-1.0, 0.5, 3.0]);
        assert_eq!(f.min(), -1.0);
        assert_eq!(f.max(), 3.0);
        assert_eq!(f.max_with(0.0).values(), &[0.0, 0.5, 3.0]);
    }

    #[test]
    fn large_fields_take_parallel_path() {
        let n = PAR_THRESHOLD * 2;
        let a = VolScalarField::uniform("a", n, 3.0);
        let b = VolScalarField::uniform("b", n, 4.0);
        let c = &a * &b;
        assert!(c.values().iter().all(|&v| v == 12.0));
    }

    #[test]
    #[should_panic(expected = "field size mismatch")]
    fn mismatched_sizes_panic() {
        let a = VolScalarField::uniform("a", 2, 1.0);
        let b = VolScalarField::uniform("b", 3, 1.0);
        let _ = &a + &b;
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn product_matches_elementwise(
                pairs in prop::collection::vec((-1e3..1e3f64, -1e3..1e3f64), 1..64),
            ) {
                let (a, b): (Vec<Real>, Vec<Real>) = pairs.iter().copied().unzip();
                let fa = VolScalarField::from_values("a", a.clone());
                let fb = VolScalarField::from_values("b", b.clone());
                let c = &fa * &fb;
                for (i, v) in c.values().iter().enumerate() {
                    prop_assert_eq!(*v, a[i] * b[i]);
                }
            }

            #[test]
            fn add_then_sub_restores(values in prop::collection::vec(-1e3..1e3f64, 1..32)) {
                let original = SurfaceScalarField::from_values("a", values.clone());
                let other = SurfaceScalarField::uniform("b", values.len(), 0.5);
                let mut f = original.clone();
                f += &other;
                f -= &other;
                for (a, b) in f.values().iter().zip(original.values()) {
                    prop_assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0));
                }
            }
        }
    }
}
