use super::ids::{AtomId, ChainId};
use crate::core::utils::identifiers;
use std::fmt;

/// Polymer vs non-polymer classification assigned by the structure provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResidueCategory {
    /// Chain-forming residue (amino acid, nucleotide, or a modified variant).
    Polymer,
    /// Small molecule, ion, or solvent.
    #[default]
    NonPolymer,
}

/// Unique residue identifier within a structure: chain label, sequence number,
/// and optional insertion code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub chain: String,
    pub number: isize,
    pub insertion_code: Option<char>,
}

impl ResidueKey {
    pub fn new(chain: &str, number: isize, insertion_code: Option<char>) -> Self {
        Self {
            chain: chain.to_string(),
            number,
            insertion_code,
        }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.chain, self.number)?;
        if let Some(code) = self.insertion_code {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                  // Residue sequence number from source file
    pub insertion_code: Option<char>,   // PDB insertion code, if any
    pub name: String,                   // Chemical component code (e.g., "ALA", "HEM")
    pub category: ResidueCategory,      // Polymer or non-polymer
    pub chain_id: ChainId,              // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,      // Atoms owned by this residue, in file order
}

impl Residue {
    pub(crate) fn new(
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        category: ResidueCategory,
        chain_id: ChainId,
    ) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            category,
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_id: AtomId) {
        self.atoms.push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn is_polymer(&self) -> bool {
        self.category == ResidueCategory::Polymer
    }

    pub fn is_water(&self) -> bool {
        identifiers::is_water(&self.name)
    }

    pub fn is_amino_acid(&self) -> bool {
        self.is_polymer() && identifiers::is_amino_acid(&self.name)
    }

    /// One-letter code of a polymer residue; `None` for ligands and unknown components.
    pub fn one_letter_code(&self) -> Option<char> {
        if !self.is_polymer() {
            return None;
        }
        identifiers::one_letter_code(&self.name)
    }
}
