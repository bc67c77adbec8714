//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::core`] models and the
//! [`crate::engine`] solver together.
//!
//! - **Blend Workflow** ([`blend`]) - Looks up two substances, solves their
//!   molecule counts and estimates the cube the packer should fill.
//! - **Annotate Workflow** ([`annotate`]) - Streams a packed structure file to
//!   its destination with `TER` records restored between residues.
//!
//! Rendering the packer input and running the packer are left to the caller.

pub mod annotate;
pub mod blend;
pub mod error;
