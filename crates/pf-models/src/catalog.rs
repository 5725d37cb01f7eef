//! Registered model type names by configuration category.

use crate::factory::ModelFamily;
use crate::{
    AspectRatio, Drag, HeatTransfer, Lift, MassTransfer, SurfaceTension, VirtualMass, WallDamping,
    blending,
};

/// Type names registered for a category, or `None` for an unknown category.
pub fn model_types(category: &str) -> Option<Vec<&'static str>> {
    let names = match category {
        Drag::CATEGORY => Drag::factory().names(),
        VirtualMass::CATEGORY => VirtualMass::factory().names(),
        Lift::CATEGORY => Lift::factory().names(),
        HeatTransfer::CATEGORY => HeatTransfer::factory().names(),
        MassTransfer::CATEGORY => MassTransfer::factory().names(),
        SurfaceTension::CATEGORY => SurfaceTension::factory().names(),
        AspectRatio::CATEGORY => AspectRatio::factory().names(),
        WallDamping::CATEGORY => WallDamping::factory().names(),
        _ => return None,
    };
    Some(names)
}

/// Type names of the blending methods.
pub fn blending_types() -> Vec<&'static str> {
    blending::factory().names()
}
