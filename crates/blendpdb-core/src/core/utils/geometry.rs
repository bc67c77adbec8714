use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

/// Avogadro constant (mol^-1) is `AVOGADRO_SIGNIFICAND * 10^AVOGADRO_EXPONENT`.
pub const AVOGADRO_SIGNIFICAND: Decimal = dec!(6.02);
pub const AVOGADRO_EXPONENT: u32 = 23;

// 1 m^3 = 10^30 A^3
const CUBIC_ANGSTROM_EXPONENT: u32 = 30;

/// Volume in cubic Angstrom occupied by `count` molecules of a substance with
/// the given molar concentration (mol/m^3).
///
/// 10^30 is outside the decimal range, so the Avogadro exponent is folded into
/// the unit conversion before dividing.
pub fn molecular_volume(count: u64, coefficient: Decimal) -> Option<Decimal> {
    if coefficient <= Decimal::ZERO {
        return None;
    }
    let scale = Decimal::from(10u64.pow(CUBIC_ANGSTROM_EXPONENT - AVOGADRO_EXPONENT));
    Decimal::from(count)
        .checked_div(coefficient)?
        .checked_mul(scale)?
        .checked_div(AVOGADRO_SIGNIFICAND)
}

pub fn cube_edge(volume: Decimal) -> Option<f64> {
    volume.to_f64().map(f64::cbrt)
}

/// Smallest cube holding a set of molecule populations, in Angstrom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxEstimate {
    pub volume: Decimal,
    pub edge: f64,
}

impl BoxEstimate {
    /// Sums the volume of each `(count, coefficient)` population.
    pub fn from_populations(populations: &[(u64, Decimal)]) -> Option<Self> {
        let mut volume = Decimal::ZERO;
        for &(count, coefficient) in populations {
            volume = volume.checked_add(molecular_volume(count, coefficient)?)?;
        }
        let edge = cube_edge(volume)?;
        Some(Self { volume, edge })
    }

    pub fn half_edge(&self) -> f64 {
        self.edge / 2.0
    }
}
