use crate::core::models::substance::Substance;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use thiserror::Error;

// name, longname, density (g/cm^3), molecular weight (g/mol), template
const DEFAULT_SUBSTANCES: &[(&str, &str, Decimal, Decimal, &str)] = &[
    ("WAT", "Water", dec!(1.0), dec!(18.01), "water.pdb"),
    ("TFE", "2,2,2-Trifluoroethanol", dec!(1.393), dec!(100.04), "tfe.pdb"),
];

#[derive(Debug, Clone, Default)]
pub struct SubstanceRegistry {
    registry: BTreeMap<String, Substance>,
}

impl SubstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for &(name, longname, density, molecular_weight, pdb) in DEFAULT_SUBSTANCES {
            registry.register(Substance::new(
                name,
                longname,
                density,
                molecular_weight,
                pdb,
            ));
        }
        registry
    }

    /// Registers a substance under its own name, returning the entry it replaced.
    pub fn register(&mut self, substance: Substance) -> Option<Substance> {
        self.registry.insert(substance.name().to_string(), substance)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Substance> {
        self.registry.remove(name)
    }

    pub fn find(&self, name: &str) -> Result<&Substance, RegistryError> {
        self.registry
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Substance> {
        self.registry.values()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Substance name '{0}' is not registered")]
    NotRegistered(String),
}
