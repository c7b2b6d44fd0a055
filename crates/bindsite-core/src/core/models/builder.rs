use super::atom::Atom;
use super::ids::{ChainId, ResidueId};
use super::residue::ResidueCategory;
use super::structure::Structure;
use crate::core::utils::identifiers;
use nalgebra::Point3;

/// A single atom line as read by a structure parser, before it is placed in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord<'a> {
    pub serial: usize,
    pub name: &'a str,
    pub element: &'a str,
    pub residue_name: &'a str,
    pub chain: &'a str,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub temperature_factor: f64,
    /// True for `HETATM` records.
    pub hetero: bool,
}

/// Decides the residue category from the record type and component code.
///
/// Water is never polymer. Otherwise `ATOM` records are polymer, and `HETATM`
/// records are polymer only for known chain-forming components such as `MSE`.
pub fn classify_residue(residue_name: &str, hetero: bool) -> ResidueCategory {
    if identifiers::is_water(residue_name) {
        ResidueCategory::NonPolymer
    } else if !hetero || identifiers::is_polymer_component(residue_name) {
        ResidueCategory::Polymer
    } else {
        ResidueCategory::NonPolymer
    }
}

#[derive(Default)]
pub struct StructureBuilder {
    structure: Structure,

    // --- Builder-specific state for efficient construction ---
    current_chain: Option<(String, ChainId)>,
    current_residue: Option<(isize, Option<char>, ResidueId)>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: &AtomRecord<'_>) -> &mut Self {
        let chain_id = self.chain_for(record.chain);
        let residue_id = self.residue_for(chain_id, record);

        let element = if record.element.trim().is_empty() {
            identifiers::element_from_atom_name(record.name)
        } else {
            record.element.trim().to_ascii_uppercase()
        };
        let atom = Atom {
            serial: record.serial,
            name: record.name.to_string(),
            element,
            residue_id,
            position: record.position,
            occupancy: record.occupancy,
            temperature_factor: record.temperature_factor,
        };
        self.structure.add_atom_to_residue(residue_id, atom);
        self
    }

    pub fn build(self) -> Structure {
        self.structure
    }

    fn chain_for(&mut self, label: &str) -> ChainId {
        match &self.current_chain {
            Some((current, id)) if current == label => *id,
            _ => {
                let id = self.structure.add_chain(label);
                self.current_chain = Some((label.to_string(), id));
                self.current_residue = None;
                id
            }
        }
    }

    fn residue_for(&mut self, chain_id: ChainId, record: &AtomRecord<'_>) -> ResidueId {
        if let Some((number, insertion_code, id)) = self.current_residue {
            if number == record.residue_number && insertion_code == record.insertion_code {
                return id;
            }
        }
        let category = classify_residue(record.residue_name, record.hetero);
        // The chain was created by `chain_for` just before, so insertion cannot fail.
        let id = self
            .structure
            .add_residue(
                chain_id,
                record.residue_number,
                record.insertion_code,
                record.residue_name,
                category,
            )
            .unwrap_or_default();
        self.current_residue = Some((record.residue_number, record.insertion_code, id));
        id
    }
}
