//! # Core Models Module
//!
//! Data structures representing a loaded biomolecular model.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with position and chemical identity
//! - [`residue`] - Residues, their polymer/non-polymer category, and unique keys
//! - [`chain`] - Ordered residue containers
//! - [`structure`] - The complete model owning chains, residues, and atoms
//! - [`builder`] - Incremental construction from parsed atom records
//! - [`ids`] - Slot-map identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use bindsite::core::models::{structure::Structure, atom::Atom, residue::ResidueCategory};
//!
//! let mut structure = Structure::new();
//! let chain_id = structure.add_chain("A");
//! let residue_id = structure.add_residue(chain_id, 1, None, "ALA", ResidueCategory::Polymer)?;
//!
//! let atom = Atom::new("CA", residue_id, Point3::new(0.0, 0.0, 0.0));
//! structure.add_atom_to_residue(residue_id, atom)?;
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
