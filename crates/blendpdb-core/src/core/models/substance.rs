use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// g/cm^3 -> g/m^3
const CM3_PER_M3: Decimal = dec!(1000000);

/// A pure substance that can be blended into a binary mixture.
///
/// Density and molecular weight are fixed at construction. The molar
/// concentration coefficient derived from them is computed on first use and
/// cached for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct Substance {
    name: String,
    longname: String,
    density: Decimal,          // g/cm^3
    molecular_weight: Decimal, // g/mol
    pdb: PathBuf,              // Template structure of a single molecule
    coefficient: OnceLock<Option<Decimal>>,
}

impl Substance {
    pub fn new(
        name: impl Into<String>,
        longname: impl Into<String>,
        density: Decimal,
        molecular_weight: Decimal,
        pdb: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            longname: longname.into(),
            density,
            molecular_weight,
            pdb: pdb.into(),
            coefficient: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn longname(&self) -> &str {
        &self.longname
    }

    pub fn density(&self) -> Decimal {
        self.density
    }

    pub fn molecular_weight(&self) -> Decimal {
        self.molecular_weight
    }

    pub fn pdb(&self) -> &Path {
        &self.pdb
    }

    /// Molar concentration of the pure substance in mol/m^3.
    ///
    /// Returns `None` when the value is undefined, i.e. the molecular weight
    /// is zero or the quotient leaves the decimal range.
    pub fn coefficient(&self) -> Option<Decimal> {
        *self.coefficient.get_or_init(|| {
            self.density
                .checked_mul(CM3_PER_M3)?
                .checked_div(self.molecular_weight)
        })
    }
}
