//! # Bindsite Core Library
//!
//! Detects ligands in biomolecular structures and selects the polymer residues
//! that surround them.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Residue`, `Atom`),
//!   PDB/mmCIF I/O, and residue chemistry tables.
//!
//! - **[`engine`]: The Logic Core.** Grid-accelerated single-linkage clustering of
//!   non-polymer atoms into ligands, and the proximity filter that turns ligands into
//!   binding-site residues.
//!
//! - **[`workflows`]: The Public API.** Complete procedures producing serializable
//!   reports (structure info, binding-site report) and the chain filter.

pub mod core;
pub mod engine;
pub mod workflows;
