//! The phase system: phases, pairs and every pair-keyed sub-model table.

use std::collections::BTreeMap;
use std::sync::Arc;

use pf_config::{PhaseDef, PhaseProperties, ValidationError, validate_properties};
use pf_core::{Real, ensure_positive};
use pf_mesh::{
    Field, FieldValue, Mesh, SurfaceScalarField, VolLocation, VolScalarField, VolVectorField, fvc,
};
use pf_models::{
    AspectRatio, AspectRatioModel, BlendedInterfacialModel, BlendedTable, BlendingMethod, Drag,
    DragModel, HeatTransfer, HeatTransferModel, Lift, LiftModel, LookupError, LookupKind,
    MassTransfer, MassTransferModel, ModelFamily, SubModelTable, SurfaceTension,
    SurfaceTensionModel, TwoSidedTable, VirtualMass, VirtualMassModel, WallDamping,
    WallDampingModel,
};
use pf_phases::{PairView, PhasePairKey, PhasePairRegistry, PhaseRegistry, PhaseResult};
use tracing::{debug, info};

use crate::error::SystemResult;
use crate::generation::{
    ModelEntry, blending_method, generate_blended_sub_models, generate_pairs_and_sub_models,
    generate_two_sided_sub_models,
};

/// Categories whose models are blended between the two directions.
pub const BLENDED_CATEGORIES: [&str; 5] = [
    Drag::CATEGORY,
    VirtualMass::CATEGORY,
    Lift::CATEGORY,
    HeatTransfer::CATEGORY,
    MassTransfer::CATEGORY,
];

/// Directional lookup of one model family.
///
/// Plain families answer from their own table. Blended families answer
/// with the direction of the blended entry that `key` names, so
/// `(air in water)` gives the air-in-water correlation.
pub trait HasSubModels<F: ModelFamily> {
    fn sub_model(&self, key: &PhasePairKey) -> Result<&F::Model, LookupError>;
}

/// Access to the blended table of one model family.
pub trait HasBlendedSubModels<F: ModelFamily> {
    fn blended_sub_models(&self) -> &BlendedTable<F::Model>;
}

/// Phases, their pairs and the sub-models acting between them.
///
/// Built once from a validated phase-properties document. The tables are
/// read-only afterwards; only phase fields and the mixture flux change from
/// step to step.
pub struct PhaseSystem {
    mesh: Arc<dyn Mesh>,
    pub(crate) phases: PhaseRegistry,
    pairs: PhasePairRegistry,
    blending: BTreeMap<&'static str, Arc<dyn BlendingMethod>>,

    drag: BlendedTable<dyn DragModel>,
    virtual_mass: BlendedTable<dyn VirtualMassModel>,
    lift: BlendedTable<dyn LiftModel>,
    heat_transfer: BlendedTable<dyn HeatTransferModel>,
    heat_transfer_sides: TwoSidedTable<dyn HeatTransferModel>,
    mass_transfer: BlendedTable<dyn MassTransferModel>,
    surface_tension: SubModelTable<dyn SurfaceTensionModel>,
    aspect_ratio: SubModelTable<dyn AspectRatioModel>,
    wall_damping: SubModelTable<dyn WallDampingModel>,

    pub(crate) phi: SurfaceScalarField,
    delta_t: Real,
}

impl PhaseSystem {
    /// Validate the document, create the phases on `mesh` and build every
    /// pair and sub-model it names.
    pub fn new(props: &PhaseProperties, mesh: Arc<dyn Mesh>) -> SystemResult<Self> {
        validate_properties(props)?;

        let specs = props
            .phases
            .iter()
            .map(PhaseDef::to_spec)
            .collect::<PhaseResult<Vec<_>>>()?;
        let phases = PhaseRegistry::new(specs, mesh.as_ref())?;
        let mut pairs = PhasePairRegistry::new();

        let entries = |category: &str| {
            ModelEntry::from_defs(category, props.category(category).unwrap_or_default())
        };

        let mut blending = BTreeMap::new();
        for category in BLENDED_CATEGORIES {
            if props.category(category).is_some_and(|defs| !defs.is_empty())
                && let Some(method) = blending_method(props, category)?
            {
                blending.insert(category, method);
            }
        }
        let method = |category: &str| blending.get(category).cloned();

        let drag = generate_blended_sub_models::<Drag>(
            &mut pairs,
            &phases,
            &entries(Drag::CATEGORY)?,
            method(Drag::CATEGORY),
        )?;
        let virtual_mass = generate_blended_sub_models::<VirtualMass>(
            &mut pairs,
            &phases,
            &entries(VirtualMass::CATEGORY)?,
            method(VirtualMass::CATEGORY),
        )?;
        let lift = generate_blended_sub_models::<Lift>(
            &mut pairs,
            &phases,
            &entries(Lift::CATEGORY)?,
            method(Lift::CATEGORY),
        )?;

        let (sided, unsided): (Vec<_>, Vec<_>) = entries(HeatTransfer::CATEGORY)?
            .into_iter()
            .partition(|e| e.side.is_some());
        let heat_transfer = generate_blended_sub_models::<HeatTransfer>(
            &mut pairs,
            &phases,
            &unsided,
            method(HeatTransfer::CATEGORY),
        )?;
        let heat_transfer_sides =
            generate_two_sided_sub_models::<HeatTransfer>(&mut pairs, &phases, &sided)?;

        let mass_transfer = generate_blended_sub_models::<MassTransfer>(
            &mut pairs,
            &phases,
            &entries(MassTransfer::CATEGORY)?,
            method(MassTransfer::CATEGORY),
        )?;
        let surface_tension = generate_pairs_and_sub_models::<SurfaceTension>(
            &mut pairs,
            &phases,
            &entries(SurfaceTension::CATEGORY)?,
        )?;
        let aspect_ratio = generate_pairs_and_sub_models::<AspectRatio>(
            &mut pairs,
            &phases,
            &entries(AspectRatio::CATEGORY)?,
        )?;
        let wall_damping = generate_pairs_and_sub_models::<WallDamping>(
            &mut pairs,
            &phases,
            &entries(WallDamping::CATEGORY)?,
        )?;

        let phi = SurfaceScalarField::zeros("phi", mesh.n_faces());
        let mut system = Self {
            mesh,
            phases,
            pairs,
            blending,
            drag,
            virtual_mass,
            lift,
            heat_transfer,
            heat_transfer_sides,
            mass_transfer,
            surface_tension,
            aspect_ratio,
            wall_damping,
            phi,
            delta_t: 1.0,
        };
        system.phi = system.calc_phi();

        info!(
            phases = system.phases.len(),
            pairs = system.pairs.len(),
            cells = system.n_cells(),
            "phase system constructed"
        );
        Ok(system)
    }

    pub fn mesh(&self) -> &dyn Mesh {
        self.mesh.as_ref()
    }

    pub fn n_cells(&self) -> usize {
        self.mesh.n_cells()
    }

    pub fn phases(&self) -> &PhaseRegistry {
        &self.phases
    }

    pub fn phases_mut(&mut self) -> &mut PhaseRegistry {
        &mut self.phases
    }

    pub fn pairs(&self) -> &PhasePairRegistry {
        &self.pairs
    }

    /// Mixture volumetric flux, as of the last `correct`.
    pub fn phi(&self) -> &SurfaceScalarField {
        &self.phi
    }

    pub fn delta_t(&self) -> Real {
        self.delta_t
    }

    pub fn set_delta_t(&mut self, dt: Real) -> SystemResult<()> {
        self.delta_t = ensure_positive(dt, "time step")?;
        Ok(())
    }

    /// Begin a time step: every phase's velocity becomes its old velocity.
    pub fn store_old_time(&mut self) {
        for phase in self.phases.phases_mut() {
            phase.store_old_time();
        }
    }

    /// The blending method used by a category, if it has one.
    pub fn blending(&self, category: &str) -> Option<&dyn BlendingMethod> {
        self.blending.get(category).map(|m| m.as_ref())
    }

    pub fn drag(&self) -> &BlendedTable<dyn DragModel> {
        &self.drag
    }

    pub fn virtual_mass(&self) -> &BlendedTable<dyn VirtualMassModel> {
        &self.virtual_mass
    }

    pub fn lift(&self) -> &BlendedTable<dyn LiftModel> {
        &self.lift
    }

    pub fn heat_transfer(&self) -> &BlendedTable<dyn HeatTransferModel> {
        &self.heat_transfer
    }

    /// Heat transfer models given per side of the interface.
    pub fn heat_transfer_sides(&self) -> &TwoSidedTable<dyn HeatTransferModel> {
        &self.heat_transfer_sides
    }

    pub fn mass_transfer(&self) -> &BlendedTable<dyn MassTransferModel> {
        &self.mass_transfer
    }

    pub fn surface_tension(&self) -> &SubModelTable<dyn SurfaceTensionModel> {
        &self.surface_tension
    }

    pub fn aspect_ratio(&self) -> &SubModelTable<dyn AspectRatioModel> {
        &self.aspect_ratio
    }

    pub fn wall_damping(&self) -> &SubModelTable<dyn WallDampingModel> {
        &self.wall_damping
    }

    /// Resolve a generated key to a view over its two phases.
    pub fn view(&self, key: &PhasePairKey) -> SystemResult<PairView<'_>> {
        Ok(self.pairs.resolve(key)?.view(&self.phases))
    }

    pub fn found_sub_model<F: ModelFamily>(&self, key: &PhasePairKey) -> bool
    where
        Self: HasSubModels<F>,
    {
        <Self as HasSubModels<F>>::sub_model(self, key).is_ok()
    }

    pub fn lookup_sub_model<F: ModelFamily>(&self, key: &PhasePairKey) -> Result<&F::Model, LookupError>
    where
        Self: HasSubModels<F>,
    {
        <Self as HasSubModels<F>>::sub_model(self, key)
    }

    /// Look up the model of `dispersed` in `continuous`.
    pub fn lookup_sub_model_by_names<F: ModelFamily>(
        &self,
        dispersed: &str,
        continuous: &str,
    ) -> Result<&F::Model, LookupError>
    where
        Self: HasSubModels<F>,
    {
        self.lookup_sub_model::<F>(&PhasePairKey::ordered(dispersed, continuous))
    }

    pub fn found_sub_model_by_names<F: ModelFamily>(&self, dispersed: &str, continuous: &str) -> bool
    where
        Self: HasSubModels<F>,
    {
        self.found_sub_model::<F>(&PhasePairKey::ordered(dispersed, continuous))
    }

    /// Blended models are stored under the unordered key; any key of the
    /// same two phases finds them.
    pub fn found_blended_sub_model<F: ModelFamily>(&self, key: &PhasePairKey) -> bool
    where
        Self: HasBlendedSubModels<F>,
    {
        <Self as HasBlendedSubModels<F>>::blended_sub_models(self).found(&key.to_unordered())
    }

    pub fn lookup_blended_sub_model<F: ModelFamily>(
        &self,
        key: &PhasePairKey,
    ) -> Result<&BlendedInterfacialModel<F::Model>, LookupError>
    where
        Self: HasBlendedSubModels<F>,
    {
        <Self as HasBlendedSubModels<F>>::blended_sub_models(self)
            .get(&key.to_unordered())
            .ok_or_else(|| LookupError {
                category: F::CATEGORY,
                key: key.to_string(),
                kind: LookupKind::Blended,
            })
    }

    /// The wall damping acting on the dispersed phase of `view`: the
    /// ordered entry if there is one, else the unordered entry.
    pub fn wall_damping_for(&self, view: &PairView<'_>) -> Option<&dyn WallDampingModel> {
        let ordered = PhasePairKey::ordered(view.dispersed().name(), view.continuous().name());
        self.wall_damping
            .get(&ordered)
            .or_else(|| self.wall_damping.get(&ordered.to_unordered()))
            .map(|m| m.as_ref())
    }

    /// Sum of the moving phase fractions.
    pub fn sum_alpha_moving(&self) -> VolScalarField {
        let mut sum = VolScalarField::zeros("sumAlphaMoving", self.n_cells());
        for phase in self.phases.moving_phases().iter() {
            sum += phase.alpha();
        }
        sum
    }

    /// Fraction-weighted average over the moving phases, normalised by the
    /// moving fraction when stationary phases are present.
    fn moving_average<T, F>(&self, name: &str, value: F) -> Field<T, VolLocation>
    where
        T: FieldValue,
        F: Fn(&pf_phases::Phase) -> Field<T, VolLocation>,
    {
        let mut sum = Field::zeros(name, self.n_cells());
        for phase in self.phases.moving_phases().iter() {
            sum += &(phase.alpha() * &value(phase));
        }
        if !self.phases.stationary_phases().is_empty() {
            sum = &sum / &self.sum_alpha_moving().max_with(Real::EPSILON);
        }
        sum.renamed(name)
    }

    /// Mixture density.
    pub fn rho(&self) -> VolScalarField {
        self.moving_average("rho", |p| p.rho())
    }

    /// Mixture velocity.
    pub fn u(&self) -> VolVectorField {
        self.moving_average("U", |p| p.u().clone())
    }

    /// Mixture flux: face fraction times phase flux, summed over moving phases.
    pub fn calc_phi(&self) -> SurfaceScalarField {
        let mut phi = SurfaceScalarField::zeros("phi", self.mesh.n_faces());
        for phase in self.phases.moving_phases().iter() {
            let alpha_f = fvc::interpolate(self.mesh(), phase.alpha());
            phi += &(&alpha_f * phase.phi());
        }
        phi
    }

    /// Aspect ratio of the pair, 1 where no model is registered.
    pub fn e(&self, key: &PhasePairKey) -> SystemResult<VolScalarField> {
        match self.aspect_ratio.get(key) {
            Some(model) => Ok(model.e(&self.view(key)?)),
            None => Ok(VolScalarField::uniform(format!("E{key}"), self.n_cells(), 1.0)),
        }
    }

    /// Surface tension of the pair, 0 where no model is registered.
    pub fn sigma(&self, key: &PhasePairKey) -> SystemResult<VolScalarField> {
        let unordered = key.to_unordered();
        let found = self
            .surface_tension
            .get(key)
            .map(|m| (m, key))
            .or_else(|| self.surface_tension.get(&unordered).map(|m| (m, &unordered)));
        match found {
            Some((model, key)) => Ok(model.sigma(&self.view(key)?)),
            None => Ok(VolScalarField::zeros(format!("sigma{key}"), self.n_cells())),
        }
    }

    /// Interfacial mass transfer rate of a pair. Phases here never change
    /// into one another, so this is zero.
    pub fn dmdtf(&self, key: &PhasePairKey) -> VolScalarField {
        VolScalarField::zeros(format!("dmdtf{key}"), self.n_cells())
    }

    /// Net mass transfer rate into each phase.
    pub fn dmdts(&self) -> Vec<VolScalarField> {
        self.fill_fields("dmdt", Vec::new())
    }

    /// Complete a phase-indexed list, replacing gaps with zero fields.
    pub fn fill_fields<T: FieldValue>(
        &self,
        name: &str,
        mut fields: Vec<Option<Field<T, VolLocation>>>,
    ) -> Vec<Field<T, VolLocation>> {
        let n = self.n_cells();
        fields.resize_with(self.phases.len(), || None);
        fields
            .into_iter()
            .zip(self.phases.phases())
            .map(|(field, phase)| {
                field.unwrap_or_else(|| Field::zeros(format!("{name}.{}", phase.name()), n))
            })
            .collect()
    }

    /// Whether the phase pressures are solved implicitly.
    pub fn implicit_phase_pressure(&self) -> bool {
        false
    }

    /// Re-apply the tunables of a changed document without rebuilding the
    /// tables. The phase list itself must not change.
    pub fn read(&mut self, props: &PhaseProperties) -> SystemResult<()> {
        validate_properties(props)?;
        let current: Vec<String> = self
            .phases
            .phases()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        if props.phase_names() != current {
            return Err(ValidationError::InvalidValue {
                field: "phases".to_string(),
                value: props.phase_names().join(", "),
                reason: format!("phase list cannot change on re-read, expected {}", current.join(", ")),
            }
            .into());
        }
        for (phase, def) in self.phases.phases_mut().iter_mut().zip(&props.phases) {
            if phase.diameter() != def.diameter {
                debug!(phase = phase.name(), diameter = def.diameter, "diameter updated");
                phase.set_diameter(def.diameter)?;
            }
        }
        Ok(())
    }
}

/// One direction of a blended entry. An unordered key takes phase1 as
/// dispersed.
fn directional_sub_model<'a, M: ?Sized>(
    table: &'a BlendedTable<M>,
    key: &PhasePairKey,
) -> Result<&'a M, LookupError> {
    let missing = || LookupError {
        category: table.category(),
        key: key.to_string(),
        kind: LookupKind::Plain,
    };
    let unordered = key.to_unordered();
    let blended = table.get(&unordered).ok_or_else(missing)?;
    let model = if key.first() == unordered.first() {
        blended.model_1_in_2()
    } else {
        blended.model_2_in_1()
    };
    model.ok_or_else(missing)
}

macro_rules! plain_tables {
    ($($family:ty => $field:ident),* $(,)?) => {
        $(
            impl HasSubModels<$family> for PhaseSystem {
                fn sub_model(
                    &self,
                    key: &PhasePairKey,
                ) -> Result<&<$family as ModelFamily>::Model, LookupError> {
                    self.$field.lookup(key).map(|m| m.as_ref())
                }
            }
        )*
    };
}

macro_rules! blended_tables {
    ($($family:ty => $field:ident),* $(,)?) => {
        $(
            impl HasBlendedSubModels<$family> for PhaseSystem {
                fn blended_sub_models(&self) -> &BlendedTable<<$family as ModelFamily>::Model> {
                    &self.$field
                }
            }

            impl HasSubModels<$family> for PhaseSystem {
                fn sub_model(
                    &self,
                    key: &PhasePairKey,
                ) -> Result<&<$family as ModelFamily>::Model, LookupError> {
                    directional_sub_model(&self.$field, key)
                }
            }
        )*
    };
}

plain_tables! {
    SurfaceTension => surface_tension,
    AspectRatio => aspect_ratio,
    WallDamping => wall_damping,
}

blended_tables! {
    Drag => drag,
    VirtualMass => virtual_mass,
    Lift => lift,
    HeatTransfer => heat_transfer,
    MassTransfer => mass_transfer,
}

impl std::fmt::Debug for PhaseSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseSystem")
            .field("phases", &self.phases.len())
            .field("pairs", &self.pairs.keys())
            .field("drag", &self.drag)
            .field("virtual_mass", &self.virtual_mass)
            .field("lift", &self.lift)
            .field("heat_transfer", &self.heat_transfer)
            .field("heat_transfer_sides", &self.heat_transfer_sides)
            .field("mass_transfer", &self.mass_transfer)
            .field("surface_tension", &self.surface_tension)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("wall_damping", &self.wall_damping)
            .finish()
    }
}
