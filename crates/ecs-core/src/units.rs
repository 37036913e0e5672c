// ecs-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Mass as UomMass, MassRate as UomMassRate,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime, Velocity as UomVelocity, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Mass = UomMass;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;

/// Pascals per pound-force per square inch.
pub const PA_PER_PSI: f64 = 6_894.757_293_168_361;
/// Pascals per millimetre of mercury.
pub const PA_PER_MMHG: f64 = 133.322_387_415;
/// Kilograms per avoirdupois pound.
pub const KG_PER_LB: f64 = 0.453_592_37;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn psi(v: f64) -> Pressure {
    pa(v * PA_PER_PSI)
}

#[inline]
pub fn mmhg(v: f64) -> Pressure {
    pa(v * PA_PER_MMHG)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn lbph(v: f64) -> MassRate {
    kgps(v * KG_PER_LB / 3600.0)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn to_psi(p: Pressure) -> f64 {
    p.value / PA_PER_PSI
}

#[inline]
pub fn to_mmhg(p: Pressure) -> f64 {
    p.value / PA_PER_MMHG
}

#[inline]
pub fn to_lbph(f: MassRate) -> f64 {
    f.value * 3600.0 / KG_PER_LB
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    /// Specific gas constant of oxygen, J/(kg·K).
    pub const R_O2: f64 = 259.84;

    #[inline]
    pub fn g0() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G0_MPS2)
    }
}
