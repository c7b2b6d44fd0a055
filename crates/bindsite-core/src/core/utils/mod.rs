//! Stateless helpers shared by the models, I/O, and engine layers.
//!
//! - [`geometry`] - point distances and simple reductions over positions
//! - [`identifiers`] - static chemistry tables for residue components

pub mod geometry;
pub mod identifiers;
