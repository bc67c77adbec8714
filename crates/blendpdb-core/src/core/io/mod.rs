//! Structure file input/output.
//!
//! The packer writes PDB files as a flat list of atom records. [`pdb`] reads
//! such files line by line, without building a molecular model, and restores
//! the `TER` separators between residues that downstream tools rely on.

pub mod pdb;
