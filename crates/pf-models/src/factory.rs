//! Name-keyed constructor tables for the model families.

use std::collections::HashMap;
use std::fmt;

use pf_phases::PhasePairKey;
use tracing::debug;

use crate::dict::Dict;
use crate::error::{ModelError, ModelResult};

/// Builds one model from its parameter block and a construction context.
pub type Constructor<M, C> = fn(&Dict, &C) -> ModelResult<Box<M>>;

/// Maps model type names to constructors.
///
/// Each family owns one process-wide factory, filled once on first use and
/// read-only afterwards.
pub struct Factory<M: ?Sized, C: ?Sized = PhasePairKey> {
    family: &'static str,
    constructors: HashMap<&'static str, Constructor<M, C>>,
}

impl<M: ?Sized, C: ?Sized> Factory<M, C> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            constructors: HashMap::new(),
        }
    }

    pub fn with(mut self, name: &'static str, constructor: Constructor<M, C>) -> Self {
        self.constructors.insert(name, constructor);
        self
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Construct the model named by the block's `type` entry.
    pub fn create(&self, dict: &Dict, context: &C) -> ModelResult<Box<M>> {
        let name = dict.type_name()?;
        let constructor =
            self.constructors
                .get(name.as_str())
                .ok_or_else(|| ModelError::UnknownModelType {
                    family: self.family,
                    name: name.clone(),
                    known: self.names(),
                })?;
        debug!(family = self.family, model = %name, dict = dict.name(), "constructing model");
        constructor(dict, context)
    }
}

impl<M: ?Sized, C: ?Sized> fmt::Debug for Factory<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("family", &self.family)
            .field("types", &self.names())
            .finish()
    }
}

/// A category of pair-keyed interfacial models.
pub trait ModelFamily {
    /// Name of the configuration category, e.g. `drag`.
    const CATEGORY: &'static str;

    type Model: ?Sized + fmt::Debug + Send + Sync + 'static;

    fn factory() -> &'static Factory<Self::Model>;

    /// Construct a model for `key` from its parameter block.
    fn create(dict: &Dict, key: &PhasePairKey) -> ModelResult<Box<Self::Model>> {
        Self::factory().create(dict, key)
    }
}
