use crate::core::registry::RegistryError;
use crate::engine::error::SolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Molecule count solver failed: {0}")]
    Solve(#[from] SolveError),

    #[error("Cannot estimate bounding box: {0}")]
    Geometry(String),
}
