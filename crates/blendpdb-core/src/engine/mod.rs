//! # Engine Module
//!
//! The numerical core of blendpdb: turning a requested volume fraction of a
//! binary mixture into integer molecule counts.
//!
//! ## Overview
//!
//! Molecule counts must be integers, so the requested percentage can only be
//! met approximately. The [`solver`] scans candidate counts of the more
//! concentrated substance until the matching count of the other substance is
//! close enough to an integer and the mixture is large enough.
//!
//! All arithmetic runs on fixed 28-digit decimals so that the comparison
//! against the rounding tolerance does not drift over long searches.
//!
//! ## Key Components
//!
//! - [`solver`] - The molecule count search and its request/result types
//! - [`config`] - Solver and annotation settings, with TOML loading
//! - [`error`] - Failure modes of the search

pub mod config;
pub mod error;
pub mod solver;
