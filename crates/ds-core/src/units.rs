// ds-core/src/units.rs

use uom::si::f64::{
    AvailableEnergy as UomAvailableEnergy, MassDensity as UomMassDensity,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type SpecEnthalpy = UomAvailableEnergy;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

/// Thermochemical calorie in joules.
pub const CAL_J: f64 = 4.184;

#[inline]
pub fn atm(v: f64) -> Pressure {
    use uom::si::pressure::atmosphere;
    Pressure::new::<atmosphere>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

/// Specific enthalpy from the report's cal/g.
#[inline]
pub fn cal_per_g(v: f64) -> SpecEnthalpy {
    use uom::si::available_energy::joule_per_kilogram;
    SpecEnthalpy::new::<joule_per_kilogram>(v * CAL_J * 1000.0)
}

/// Density from a specific volume in cc/g.
#[inline]
pub fn density_from_cc_per_g(v: f64) -> Density {
    use uom::si::mass_density::gram_per_cubic_centimeter;
    Density::new::<gram_per_cubic_centimeter>(1.0 / v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = atm(1.0);
        let _t = k(300.0);
        let _v = mps(1800.0);
    }

    #[test]
    fn report_units_convert_to_si() {
        assert!((atm(1.0).value - 101_325.0).abs() < 1e-6);
        assert!((cal_per_g(1.0).value - 4184.0).abs() < 1e-9);
        // 0.5 cc/g is 2 g/cc, i.e. 2000 kg/m3
        assert!((density_from_cc_per_g(0.5).value - 2000.0).abs() < 1e-9);
    }
}
