//! A single continuum phase.

use pf_core::{PhaseId, Real, ensure_positive};
use pf_mesh::{
    Mesh, SurfaceScalarField, Vector, VolScalarField, VolVectorField, fvc,
};

use crate::error::{PhaseError, PhaseResult};
use crate::thermo::PhaseThermo;

/// Everything needed to create a phase, before it is bound to a mesh.
pub struct PhaseSpec {
    name: String,
    thermo: Box<dyn PhaseThermo>,
    stationary: bool,
    anisothermal: bool,
    diameter: Real,
    residual_alpha: Real,
    species: Vec<String>,
    alpha: Real,
    velocity: Vector,
    temperature: Real,
}

impl PhaseSpec {
    pub fn new(name: impl Into<String>, thermo: impl PhaseThermo + 'static) -> Self {
        Self::with_thermo(name, Box::new(thermo))
    }

    pub fn with_thermo(name: impl Into<String>, thermo: Box<dyn PhaseThermo>) -> Self {
        Self {
            name: name.into(),
            thermo,
            stationary: false,
            anisothermal: false,
            diameter: 1e-3,
            residual_alpha: 1e-6,
            species: Vec::new(),
            alpha: 0.0,
            velocity: Vector::zeros(),
            temperature: 300.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mark the phase as stationary (packed bed, porous solid...).
    pub fn stationary(mut self, stationary: bool) -> Self {
        self.stationary = stationary;
        self
    }

    /// Solve an energy equation for this phase.
    pub fn anisothermal(mut self, anisothermal: bool) -> Self {
        self.anisothermal = anisothermal;
        self
    }

    /// Characteristic (Sauter) diameter [m].
    pub fn diameter(mut self, d: Real) -> Self {
        self.diameter = d;
        self
    }

    pub fn residual_alpha(mut self, residual: Real) -> Self {
        self.residual_alpha = residual;
        self
    }

    /// Species carried by the phase. A non-empty list makes it multi-component.
    pub fn species<S: Into<String>>(mut self, species: impl IntoIterator<Item = S>) -> Self {
        self.species = species.into_iter().map(Into::into).collect();
        self
    }

    /// Uniform initial volume fraction.
    pub fn alpha(mut self, alpha: Real) -> Self {
        self.alpha = alpha;
        self
    }

    /// Uniform initial velocity.
    pub fn velocity(mut self, u: Vector) -> Self {
        self.velocity = u;
        self
    }

    /// Uniform initial temperature [K].
    pub fn temperature(mut self, t: Real) -> Self {
        self.temperature = t;
        self
    }
}

/// One continuum constituent of the mixture.
///
/// Created once at system construction; field values are updated in place
/// every step by the correction calls of the owning system.
pub struct Phase {
    id: PhaseId,
    name: String,
    thermo: Box<dyn PhaseThermo>,
    stationary: bool,
    anisothermal: bool,
    diameter: Real,
    residual_alpha: Real,
    species: Vec<String>,

    alpha: VolScalarField,
    u: VolVectorField,
    u_old: VolVectorField,
    dudt: VolVectorField,
    phi: SurfaceScalarField,
    phi_old: SurfaceScalarField,
    t: VolScalarField,
    y: Vec<VolScalarField>,
}

impl Phase {
    pub fn new(id: PhaseId, spec: PhaseSpec, mesh: &dyn Mesh) -> PhaseResult<Self> {
        ensure_positive(spec.diameter, "phase diameter")?;
        ensure_positive(spec.residual_alpha, "residual alpha")?;
        ensure_positive(spec.temperature, "phase temperature")?;
        if !(0.0..=1.0).contains(&spec.alpha) {
            return Err(PhaseError::NonPhysical {
                what: "phase fraction outside [0, 1]",
            });
        }

        let n = mesh.n_cells();
        let velocity = if spec.stationary {
            Vector::zeros()
        } else {
            spec.velocity
        };
        let alpha = VolScalarField::uniform(format!("alpha.{}", spec.name), n, spec.alpha);
        let u = VolVectorField::uniform(format!("U.{}", spec.name), n, velocity);
        let phi = fvc::flux(mesh, &u).renamed(format!("phi.{}", spec.name));

        let y = match spec.species.len() {
            0 => Vec::new(),
            count => spec
                .species
                .iter()
                .map(|s| {
                    VolScalarField::uniform(format!("{}.{}", s, spec.name), n, 1.0 / count as Real)
                })
                .collect(),
        };

        Ok(Self {
            id,
            thermo: spec.thermo,
            stationary: spec.stationary,
            anisothermal: spec.anisothermal,
            diameter: spec.diameter,
            residual_alpha: spec.residual_alpha,
            alpha,
            u_old: u.clone(),
            dudt: VolVectorField::zeros(format!("DUDt.{}", spec.name), n),
            u,
            phi_old: phi.clone(),
            phi,
            t: VolScalarField::uniform(format!("T.{}", spec.name), n, spec.temperature),
            y,
            species: spec.species,
            name: spec.name,
        })
    }

    pub fn id(&self) -> PhaseId {
        self.id
    }

    /// Position in configuration order.
    pub fn index(&self) -> usize {
        self.id.slot()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_stationary(&self) -> bool {
        self.stationary
    }

    pub fn is_moving(&self) -> bool {
        !self.stationary
    }

    pub fn is_anisothermal(&self) -> bool {
        self.anisothermal
    }

    pub fn is_multi_component(&self) -> bool {
        !self.species.is_empty()
    }

    pub fn thermo(&self) -> &dyn PhaseThermo {
        self.thermo.as_ref()
    }

    pub fn diameter(&self) -> Real {
        self.diameter
    }

    pub fn set_diameter(&mut self, d: Real) -> PhaseResult<()> {
        self.diameter = ensure_positive(d, "phase diameter")?;
        Ok(())
    }

    /// Diameter as a cell field.
    pub fn d(&self) -> VolScalarField {
        VolScalarField::uniform(format!("d.{}", self.name), self.alpha.len(), self.diameter)
    }

    pub fn residual_alpha(&self) -> Real {
        self.residual_alpha
    }

    pub fn alpha(&self) -> &VolScalarField {
        &self.alpha
    }

    /// Replace the phase fraction values, checking the size.
    pub fn set_alpha(&mut self, values: Vec<Real>) -> PhaseResult<()> {
        if values.len() != self.alpha.len() {
            return Err(PhaseError::FieldSize {
                field: self.alpha.name().to_string(),
                expected: self.alpha.len(),
                actual: values.len(),
            });
        }
        self.alpha = VolScalarField::from_values(self.alpha.name().to_string(), values);
        Ok(())
    }

    pub fn u(&self) -> &VolVectorField {
        &self.u
    }

    pub fn u_mut(&mut self) -> &mut VolVectorField {
        &mut self.u
    }

    pub fn u_old(&self) -> &VolVectorField {
        &self.u_old
    }

    /// Material derivative of velocity from the last kinematics correction.
    pub fn dudt(&self) -> &VolVectorField {
        &self.dudt
    }

    pub fn phi(&self) -> &SurfaceScalarField {
        &self.phi
    }

    pub fn phi_mut(&mut self) -> &mut SurfaceScalarField {
        &mut self.phi
    }

    pub fn phi_old(&self) -> &SurfaceScalarField {
        &self.phi_old
    }

    pub fn t(&self) -> &VolScalarField {
        &self.t
    }

    pub fn t_mut(&mut self) -> &mut VolScalarField {
        &mut self.t
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Mass fraction field of a species, if carried.
    pub fn y(&self, specie: &str) -> Option<&VolScalarField> {
        let i = self.species.iter().position(|s| s == specie)?;
        self.y.get(i)
    }

    pub fn y_mut(&mut self, specie: &str) -> Option<&mut VolScalarField> {
        let i = self.species.iter().position(|s| s == specie)?;
        self.y.get_mut(i)
    }

    pub fn rho(&self) -> VolScalarField {
        self.thermo.rho(&self.t)
    }

    pub fn mu(&self) -> VolScalarField {
        self.thermo.mu(&self.t)
    }

    pub fn nu(&self) -> VolScalarField {
        self.thermo.nu(&self.t)
    }

    pub fn cp(&self) -> VolScalarField {
        self.thermo.cp(&self.t)
    }

    pub fn kappa(&self) -> VolScalarField {
        self.thermo.kappa(&self.t)
    }

    /// Start a new time step: the current velocity and flux become the old
    /// ones.
    pub fn store_old_time(&mut self) {
        self.u_old = self.u.clone();
        self.phi_old = self.phi.clone();
    }

    /// Update the velocity material derivative from the old/new velocity.
    pub fn correct_kinematics(&mut self, dt: Real) {
        if dt <= 0.0 || self.stationary {
            return;
        }
        self.dudt = (&(&self.u - &self.u_old) * (1.0 / dt)).renamed(format!("DUDt.{}", self.name));
    }
}

impl std::fmt::Debug for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Phase")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("thermo", &self.thermo.name())
            .field("stationary", &self.stationary)
            .field("anisothermal", &self.anisothermal)
            .field("species", &self.species)
            .finish()
    }
}
