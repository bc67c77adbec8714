//! # blendpdb Core Library
//!
//! Builds the inputs for solvating a binary mixture with an external
//! molecular packer, and normalizes the packer's PDB output.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Substance models, the substance registry,
//!   streaming PDB separator insertion and bounding-box geometry.
//!
//! - **[`engine`]: The Solver.** Converts a target volume percentage into
//!   integer molecule counts using fixed-precision decimal arithmetic, plus the
//!   configuration and error types around it.
//!
//! - **[`workflows`]: The Public API.** Chains registry lookup, solving and
//!   geometry into a [`workflows::blend::BlendPlan`], and annotates packed
//!   structure files end to end.

pub mod core;
pub mod engine;
pub mod workflows;
