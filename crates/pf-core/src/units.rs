//! SI property types of the phase thermo inputs.

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, MassDensity as UomMassDensity,
    SpecificHeatCapacity as UomSpecificHeatCapacity,
    ThermalConductivity as UomThermalConductivity,
};

pub type Density = UomMassDensity;
pub type DynVisc = UomDynamicViscosity;
pub type SpecHeatCapacity = UomSpecificHeatCapacity;
pub type ThermalConductivity = UomThermalConductivity;

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pas(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn jpkgk(v: f64) -> SpecHeatCapacity {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecHeatCapacity::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn wpmk(v: f64) -> ThermalConductivity {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermalConductivity::new::<watt_per_meter_kelvin>(v)
}

pub mod constants {
    /// Standard gravity [m/s²], used by the Eötvös number.
    pub const G0_MPS2: f64 = 9.806_65;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn si_values_are_stored_raw() {
        assert_eq!(kgpm3(997.0).value, 997.0);
        assert_eq!(pas(8.9e-4).value, 8.9e-4);
        assert_eq!(jpkgk(4180.0).value, 4180.0);
        assert_eq!(wpmk(0.6).value, 0.6);
    }
}
