//! # Core Module
//!
//! Stateless building blocks shared by the solver and the workflows.
//!
//! - **Substances** ([`models`]) - Physical description of a pure component and its
//!   derived molar concentration.
//! - **Registry** ([`registry`]) - Explicit, owned lookup table of known substances.
//! - **Structure I/O** ([`io`]) - Streaming separator insertion for packed PDB files.
//! - **Geometry** ([`utils`]) - Volume and bounding-cube estimates for molecule populations.

pub mod io;
pub mod models;
pub mod registry;
pub mod utils;
