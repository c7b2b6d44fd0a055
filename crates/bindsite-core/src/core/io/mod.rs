//! # Structure File I/O
//!
//! Readers and writers for macromolecular coordinate files.
//!
//! - [`pdb`] - Fixed-column PDB records (`ATOM`/`HETATM`)
//! - [`cif`] - mmCIF `_atom_site` loops and local QA metrics
//! - [`format`] - Format detection from file names and the [`format::load_structure`] entry point
//! - [`traits`] - The [`traits::StructureFile`] interface with transparent gzip support

pub mod cif;
pub mod format;
pub mod pdb;
pub mod traits;
