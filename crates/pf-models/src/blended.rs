//! Composite of the two directional models of one phase pair.

use std::fmt;
use std::sync::Arc;

use pf_core::Real;
use pf_mesh::{Field, FieldValue, VolLocation, VolScalarField};
use pf_phases::{PairView, Phase, PhasePair, PhaseRegistry};

use crate::blending::BlendingMethod;
use crate::error::{ModelError, ModelResult};

/// Blends a `phase1 in phase2` model with a `phase2 in phase1` model.
///
/// Either side may be missing, in which case it contributes zero. Both
/// sides and both weights are evaluated in every cell regardless of the
/// weight values.
pub struct BlendedInterfacialModel<M: ?Sized> {
    pair: PhasePair,
    model_1_in_2: Option<Box<M>>,
    model_2_in_1: Option<Box<M>>,
    blending: Arc<dyn BlendingMethod>,
}

impl<M: ?Sized> BlendedInterfacialModel<M> {
    pub fn new(
        pair: PhasePair,
        model_1_in_2: Option<Box<M>>,
        model_2_in_1: Option<Box<M>>,
        blending: Arc<dyn BlendingMethod>,
    ) -> ModelResult<Self> {
        if model_1_in_2.is_none() && model_2_in_1.is_none() {
            return Err(ModelError::EmptyBlend {
                pair: pair.key().to_string(),
            });
        }
        Ok(Self {
            pair,
            model_1_in_2,
            model_2_in_1,
            blending,
        })
    }

    pub fn pair(&self) -> &PhasePair {
        &self.pair
    }

    pub fn model_1_in_2(&self) -> Option<&M> {
        self.model_1_in_2.as_deref()
    }

    pub fn model_2_in_1(&self) -> Option<&M> {
        self.model_2_in_1.as_deref()
    }

    pub fn blending(&self) -> &dyn BlendingMethod {
        self.blending.as_ref()
    }

    /// Weighted sum of a symmetric quantity such as a drag coefficient.
    pub fn evaluate<T, F>(&self, phases: &PhaseRegistry, eval: F) -> Field<T, VolLocation>
    where
        T: FieldValue,
        F: Fn(&M, &PairView<'_>) -> Field<T, VolLocation>,
    {
        self.blend(phases, 1.0, eval)
    }

    /// Weighted sum of a force on the dispersed phase, returned as the force
    /// on phase1. The `phase2 in phase1` contribution changes sign.
    pub fn evaluate_force<T, F>(&self, phases: &PhaseRegistry, eval: F) -> Field<T, VolLocation>
    where
        T: FieldValue,
        F: Fn(&M, &PairView<'_>) -> Field<T, VolLocation>,
    {
        self.blend(phases, -1.0, eval)
    }

    fn blend<T, F>(&self, phases: &PhaseRegistry, sign_2_in_1: Real, eval: F) -> Field<T, VolLocation>
    where
        T: FieldValue,
        F: Fn(&M, &PairView<'_>) -> Field<T, VolLocation>,
    {
        let phase1: &Phase = phases.phase(self.pair.phase1());
        let phase2: &Phase = phases.phase(self.pair.phase2());
        let n = phase1.alpha().len();

        let side = |model: Option<&M>, view: PairView<'_>| match model {
            Some(m) => eval(m, &view),
            None => Field::zeros("0", n),
        };
        let v12 = side(self.model_1_in_2(), PairView::new(phase1, phase2, true));
        let v21 = side(self.model_2_in_1(), PairView::new(phase2, phase1, true));
        let (f1, f2): (VolScalarField, VolScalarField) = self.blending.weights(phase1, phase2);

        let mut out = &f1 * &v12;
        let mut other = &f2 * &v21;
        if sign_2_in_1 < 0.0 {
            other = -&other;
        }
        out += &other;
        out.renamed(format!("blended{}", self.pair.key()))
    }
}

impl<M: ?Sized + fmt::Debug> fmt::Debug for BlendedInterfacialModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlendedInterfacialModel")
            .field("pair", &self.pair.key().to_string())
            .field("model_1_in_2", &self.model_1_in_2)
            .field("model_2_in_1", &self.model_2_in_1)
            .field("blending", &self.blending.type_name())
            .finish()
    }
}
