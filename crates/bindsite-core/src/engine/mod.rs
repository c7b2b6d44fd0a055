//! # Engine Module
//!
//! Ligand detection and binding-site selection over a loaded
//! [`Structure`](crate::core::models::structure::Structure).
//!
//! ## Architecture
//!
//! - **Clustering** ([`clustering`]) - Grid-accelerated single-linkage clustering
//! - **Ligands** ([`ligands`]) - Eligible non-polymer atoms grouped by covalent contact
//! - **Binding Sites** ([`binding_site`]) - Polymer residues within contact distance of a ligand
//! - **Configuration** ([`config`]) - Detection thresholds and the ligand eligibility filter
//! - **Progress Monitoring** ([`progress`]) - Phase events consumed by front ends
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! All state is local to a single call; nothing here mutates the structure.

pub mod binding_site;
pub mod clustering;
pub mod config;
pub mod error;
pub mod ligands;
pub mod progress;
