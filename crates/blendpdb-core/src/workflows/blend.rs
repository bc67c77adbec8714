use crate::core::models::substance::Substance;
use crate::core::registry::SubstanceRegistry;
use crate::core::utils::geometry::BoxEstimate;
use crate::engine::config::SolverConfig;
use crate::engine::solver::{self, MixtureCounts};
use crate::workflows::error::WorkflowError;
use rust_decimal::Decimal;
use std::fmt;
use tracing::{info, instrument};

/// Everything the packer needs to build the mixture.
#[derive(Debug, Clone)]
pub struct BlendPlan {
    pub substance_a: Substance,
    pub substance_b: Substance,
    pub percentage: Decimal,
    pub counts: MixtureCounts,
    pub bounding_box: BoxEstimate,
}

impl BlendPlan {
    /// `<percentage>p_<substance b>.pdb`, e.g. `20p_tfe.pdb`.
    pub fn default_output_name(&self) -> String {
        format!(
            "{}p_{}.pdb",
            self.percentage,
            self.substance_b.name().to_lowercase()
        )
    }
}

impl fmt::Display for BlendPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}% (v/v) of {} with {}",
            self.percentage,
            self.substance_b.longname(),
            self.substance_a.longname()
        )?;
        writeln!(
            f,
            "{}: {} molecules ({})",
            self.substance_a.name(),
            self.counts.count_a,
            self.substance_a.longname()
        )?;
        writeln!(
            f,
            "{}: {} molecules ({})",
            self.substance_b.name(),
            self.counts.count_b,
            self.substance_b.longname()
        )?;
        write!(
            f,
            "BOX: {:.6} A (Estimated minimum bounding box edge)",
            self.bounding_box.edge
        )
    }
}

/// Plans `percentage` (v/v) of `name_b` blended with `name_a`.
#[instrument(skip_all, name = "blend_workflow", fields(a = name_a, b = name_b, percentage = %percentage))]
pub fn run(
    registry: &SubstanceRegistry,
    name_a: &str,
    name_b: &str,
    percentage: Decimal,
    config: &SolverConfig,
) -> Result<BlendPlan, WorkflowError> {
    let substance_a = registry.find(name_a)?;
    let substance_b = registry.find(name_b)?;

    let counts = solver::solve_with_config(substance_a, substance_b, percentage, config)?;

    let populations = [
        (counts.count_a, population_coefficient(substance_a)?),
        (counts.count_b, population_coefficient(substance_b)?),
    ];
    let bounding_box = BoxEstimate::from_populations(&populations).ok_or_else(|| {
        WorkflowError::Geometry(format!(
            "volume of {} {} and {} {} molecules is not representable",
            counts.count_a,
            substance_a.name(),
            counts.count_b,
            substance_b.name()
        ))
    })?;
    info!(edge = bounding_box.edge, "Estimated minimum bounding box.");

    Ok(BlendPlan {
        substance_a: substance_a.clone(),
        substance_b: substance_b.clone(),
        percentage,
        counts,
        bounding_box,
    })
}

fn population_coefficient(substance: &Substance) -> Result<Decimal, WorkflowError> {
    substance.coefficient().ok_or_else(|| {
        WorkflowError::Geometry(format!(
            "substance '{}' has no molar concentration",
            substance.name()
        ))
    })
}
