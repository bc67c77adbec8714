//! Data models shared by the solver and the workflows.
//!
//! Currently this is the [`substance::Substance`] description: the physical
//! properties of one pure component of a mixture, plus the template structure
//! the packer replicates for it.

pub mod substance;
