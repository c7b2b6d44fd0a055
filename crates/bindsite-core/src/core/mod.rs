//! # Core Module
//!
//! Stateless building blocks shared by the detection engine and the workflows.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and whole structures
//! - **File I/O** ([`io`]) - PDB and mmCIF readers/writers with gzip support
//! - **Utilities** ([`utils`]) - Distance helpers and residue/element identifier tables

pub mod io;
pub mod models;
pub mod utils;
