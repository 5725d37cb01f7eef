//! Building pairs and sub-model tables from pair-keyed parameter blocks.

use std::collections::BTreeMap;
use std::sync::Arc;

use pf_config::{ModelDef, PhaseProperties};
use pf_models::{
    BlendedInterfacialModel, BlendedTable, BlendingMethod, Dict, ModelError, ModelFamily,
    SubModelTable, TwoSided, TwoSidedTable, blending,
};
use pf_phases::{PhasePairKey, PhasePairRegistry, PhaseRegistry};
use tracing::debug;

use crate::error::SystemResult;

/// One pair-keyed parameter block of a model category.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub key: PhasePairKey,
    /// Phase whose side of the interface the block describes.
    pub side: Option<String>,
    pub dict: Dict,
}

impl ModelEntry {
    pub fn new(key: PhasePairKey, dict: Dict) -> Self {
        Self {
            key,
            side: None,
            dict,
        }
    }

    pub fn on_side(mut self, phase: impl Into<String>) -> Self {
        self.side = Some(phase.into());
        self
    }

    /// Parse the document entries of one category.
    pub fn from_defs(category: &str, defs: &[ModelDef]) -> SystemResult<Vec<ModelEntry>> {
        defs.iter()
            .map(|def| {
                let key = def.key()?;
                let name = match &def.side {
                    Some(side) => format!("{category}.{key}.{side}"),
                    None => format!("{category}.{key}"),
                };
                Ok(ModelEntry {
                    dict: Dict::new(name, def.params.clone()),
                    side: def.side.clone(),
                    key,
                })
            })
            .collect()
    }
}

/// Create every pair the entries refer to.
pub fn generate_pairs(
    pairs: &mut PhasePairRegistry,
    phases: &PhaseRegistry,
    entries: &[ModelEntry],
) -> SystemResult<()> {
    pairs.generate_pairs(entries.iter().map(|e| &e.key), phases)?;
    Ok(())
}

/// Construct one model per entry and insert it under the entry's key.
pub fn create_sub_models<F: ModelFamily>(
    entries: &[ModelEntry],
    table: &mut SubModelTable<F::Model>,
) -> SystemResult<()> {
    for entry in entries {
        let model = F::create(&entry.dict, &entry.key)?;
        debug!(category = F::CATEGORY, pair = %entry.key, model = ?model, "sub-model created");
        table.insert(entry.key.clone(), model);
    }
    Ok(())
}

/// Pairs and a plain table in one pass.
pub fn generate_pairs_and_sub_models<F: ModelFamily>(
    pairs: &mut PhasePairRegistry,
    phases: &PhaseRegistry,
    entries: &[ModelEntry],
) -> SystemResult<SubModelTable<F::Model>> {
    generate_pairs(pairs, phases, entries)?;
    let mut table = SubModelTable::new(F::CATEGORY);
    create_sub_models::<F>(entries, &mut table)?;
    Ok(table)
}

#[derive(Default)]
struct Directions<'a> {
    one_in_two: Option<&'a ModelEntry>,
    two_in_one: Option<&'a ModelEntry>,
    either: Option<&'a ModelEntry>,
}

/// Group `a in b`, `b in a` and `a and b` blocks of the same phases into
/// one blended model per unordered pair.
///
/// An `a and b` block fills whichever direction has no block of its own.
/// A blending method is required as soon as the category has an entry.
pub fn generate_blended_sub_models<F: ModelFamily>(
    pairs: &mut PhasePairRegistry,
    phases: &PhaseRegistry,
    entries: &[ModelEntry],
    blending: Option<Arc<dyn BlendingMethod>>,
) -> SystemResult<BlendedTable<F::Model>> {
    let mut table = BlendedTable::new_blended(F::CATEGORY);
    if entries.is_empty() {
        return Ok(table);
    }
    let blending = blending.ok_or_else(|| ModelError::MissingParameter {
        dict: "blending".to_string(),
        key: F::CATEGORY.to_string(),
    })?;
    generate_pairs(pairs, phases, entries)?;

    let mut groups: BTreeMap<PhasePairKey, Directions<'_>> = BTreeMap::new();
    for entry in entries {
        let unordered = entry.key.to_unordered();
        let group = groups.entry(unordered.clone()).or_default();
        match entry.key.dispersed() {
            Some(d) if d == unordered.first() => group.one_in_two = Some(entry),
            Some(_) => group.two_in_one = Some(entry),
            None => group.either = Some(entry),
        }
    }

    for (key, group) in groups {
        let pair = pairs.resolve(&key)?.pair().clone();
        let create = |entry: Option<&ModelEntry>, ordered: PhasePairKey| -> SystemResult<_> {
            match entry.or(group.either) {
                Some(entry) => Ok(Some(F::create(&entry.dict, &ordered)?)),
                None => Ok(None),
            }
        };
        let model_1_in_2 = create(group.one_in_two, PhasePairKey::ordered(key.first(), key.second()))?;
        let model_2_in_1 = create(group.two_in_one, PhasePairKey::ordered(key.second(), key.first()))?;
        debug!(
            category = F::CATEGORY,
            pair = %key,
            model_1_in_2 = ?model_1_in_2,
            model_2_in_1 = ?model_2_in_1,
            blending = blending.type_name(),
            "blended sub-model created"
        );
        let blended =
            BlendedInterfacialModel::new(pair, model_1_in_2, model_2_in_1, Arc::clone(&blending))?;
        table.insert(key, blended);
    }
    Ok(table)
}

/// One model per side of each unordered pair, from blocks carrying `side`.
pub fn generate_two_sided_sub_models<F: ModelFamily>(
    pairs: &mut PhasePairRegistry,
    phases: &PhaseRegistry,
    entries: &[ModelEntry],
) -> SystemResult<TwoSidedTable<F::Model>> {
    generate_pairs(pairs, phases, entries)?;

    let mut sides: BTreeMap<PhasePairKey, TwoSided<F::Model>> = BTreeMap::new();
    for entry in entries {
        let Some(side) = entry.side.as_deref() else {
            return Err(ModelError::MissingParameter {
                dict: entry.dict.name().to_string(),
                key: "side".to_string(),
            }
            .into());
        };
        let unordered = entry.key.to_unordered();
        let model = F::create(&entry.dict, &entry.key)?;
        debug!(category = F::CATEGORY, pair = %unordered, side, model = ?model, "sided sub-model created");

        let slot = sides
            .entry(unordered.clone())
            .or_insert_with(|| TwoSided::new(None, None));
        if side == unordered.first() {
            slot.first = Some(model);
        } else if side == unordered.second() {
            slot.second = Some(model);
        } else {
            return Err(entry.dict.bad("side", format!("'{side}' is not a phase of {unordered}")).into());
        }
    }

    let mut table = TwoSidedTable::new_two_sided(F::CATEGORY);
    for (key, models) in sides {
        table.insert(key, models);
    }
    Ok(table)
}

/// The blending method configured for a category, if any.
pub fn blending_method(
    props: &PhaseProperties,
    category: &str,
) -> SystemResult<Option<Arc<dyn BlendingMethod>>> {
    let Some(block) = props.blending_for(category) else {
        return Ok(None);
    };
    let dict = Dict::new(format!("blending.{category}"), block.clone());
    let method = blending::factory().create(&dict, &props.phase_names())?;
    debug!(category, method = method.type_name(), "blending method created");
    Ok(Some(Arc::from(method)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_mesh::generation::wall_bounded_column;
    use pf_models::{Drag, HeatTransfer, NoBlending, WallDamping};
    use pf_phases::{ConstantThermo, PhaseSpec};

    fn phases() -> PhaseRegistry {
        let mesh = wall_bounded_column(4, 1.0, 0.1).unwrap();
        PhaseRegistry::new(
            vec![
                PhaseSpec::new("air", ConstantThermo::air()).alpha(0.3),
                PhaseSpec::new("water", ConstantThermo::water()).alpha(0.7),
            ],
            &mesh,
        )
        .unwrap()
    }

    fn entry(key: &str, ty: &str) -> ModelEntry {
        ModelEntry::new(key.parse().unwrap(), Dict::default().with("type", ty))
    }

    fn none_blending() -> Arc<dyn BlendingMethod> {
        Arc::new(NoBlending::new("water"))
    }

    #[test]
    fn plain_generation_creates_pairs_and_models() {
        let phases = phases();
        let mut pairs = PhasePairRegistry::new();
        let entries = vec![entry("air in water", "linear")];
        let table =
            generate_pairs_and_sub_models::<WallDamping>(&mut pairs, &phases, &entries).unwrap();

        assert_eq!(pairs.len(), 1);
        assert!(table.found(&"air in water".parse().unwrap()));
        assert!(!table.found(&"water in air".parse().unwrap()));
    }

    #[test]
    fn symmetric_block_fills_missing_direction() {
        let phases = phases();
        let mut pairs = PhasePairRegistry::new();
        let entries = vec![
            entry("air in water", "SchillerNaumann"),
            entry("air and water", "Stokes"),
        ];
        let table = generate_blended_sub_models::<Drag>(
            &mut pairs,
            &phases,
            &entries,
            Some(none_blending()),
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        let blended = table.lookup(&PhasePairKey::unordered("water", "air")).unwrap();
        assert_eq!(blended.model_1_in_2().unwrap().type_name(), "SchillerNaumann");
        assert_eq!(blended.model_2_in_1().unwrap().type_name(), "Stokes");
    }

    #[test]
    fn reverse_direction_only() {
        let phases = phases();
        let mut pairs = PhasePairRegistry::new();
        let entries = vec![entry("water in air", "Stokes")];
        let table = generate_blended_sub_models::<Drag>(
            &mut pairs,
            &phases,
            &entries,
            Some(none_blending()),
        )
        .unwrap();

        let blended = table.lookup(&PhasePairKey::unordered("air", "water")).unwrap();
        assert!(blended.model_1_in_2().is_none());
        assert!(blended.model_2_in_1().is_some());
    }

    #[test]
    fn blended_entries_need_a_blending_method() {
        let phases = phases();
        let mut pairs = PhasePairRegistry::new();
        let entries = vec![entry("air in water", "SchillerNaumann")];
        let err = generate_blended_sub_models::<Drag>(&mut pairs, &phases, &entries, None)
            .unwrap_err();
        assert!(err.to_string().contains("drag"));
    }

    #[test]
    fn two_sided_generation_places_models_by_side() {
        let phases = phases();
        let mut pairs = PhasePairRegistry::new();
        let entries = vec![
            entry("air and water", "spherical").on_side("air"),
            entry("air and water", "RanzMarshall").on_side("water"),
        ];
        let table =
            generate_two_sided_sub_models::<HeatTransfer>(&mut pairs, &phases, &entries).unwrap();

        let key = PhasePairKey::unordered("air", "water");
        let sides = table.lookup(&key).unwrap();
        assert_eq!(sides.side(&key, "air").unwrap().type_name(), "spherical");
        assert_eq!(sides.side(&key, "water").unwrap().type_name(), "RanzMarshall");
    }

    #[test]
    fn unknown_type_reports_known_names() {
        let phases = phases();
        let mut pairs = PhasePairRegistry::new();
        let entries = vec![entry("air in water", "Bogus")];
        let err = generate_pairs_and_sub_models::<WallDamping>(&mut pairs, &phases, &entries)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Bogus"));
        assert!(msg.contains("cosine, linear, none, sine"));
    }
}
