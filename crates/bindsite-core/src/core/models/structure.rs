use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueCategory, ResidueKey};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents a complete biomolecular model: chains, residues, and atoms.
///
/// The structure owns every component for the lifetime of a command. Algorithms
/// in the [`engine`](crate::engine) borrow it and never mutate positions.
/// Iteration through [`chains_iter`](Self::chains_iter) follows the order in
/// which chains were first encountered in the source file.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues using a slot map for efficient ID management.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains using a slot map for efficient ID management.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in first-seen order.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding chains by their label.
    chain_label_map: HashMap<String, ChainId>,
    /// Lookup map for finding residues by chain, sequence number, and insertion code.
    residue_id_map: HashMap<(ChainId, isize, Option<char>), ResidueId>,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in the structure.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The residue ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Residue)` if the residue exists, otherwise `None`.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in first-seen order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ChainId, &Chain)` pairs.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Finds a chain ID by its label.
    pub fn find_chain(&self, label: &str) -> Option<ChainId> {
        self.chain_label_map.get(label).copied()
    }

    /// Finds a residue ID by its full key.
    ///
    /// # Arguments
    ///
    /// * `key` - Chain label, sequence number, and insertion code of the residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue(&self, key: &ResidueKey) -> Option<ResidueId> {
        let chain_id = self.find_chain(&key.chain)?;
        self.residue_id_map
            .get(&(chain_id, key.number, key.insertion_code))
            .copied()
    }

    /// Builds the unique key of a residue.
    pub fn residue_key(&self, id: ResidueId) -> Option<ResidueKey> {
        let residue = self.residues.get(id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some(ResidueKey::new(
            &chain.label,
            residue.number,
            residue.insertion_code,
        ))
    }

    /// Adds a new chain to the structure or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given label already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, label: &str) -> ChainId {
        if let Some(&id) = self.chain_label_map.get(label) {
            return id;
        }
        let id = self.chains.insert(Chain::new(label));
        self.chain_label_map.insert(label.to_string(), id);
        self.chain_order.push(id);
        id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// This method is idempotent; if a residue with the same sequence number and
    /// insertion code already exists in the chain, its ID is returned unchanged
    /// (the name and category of the first occurrence are kept).
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        category: ResidueCategory,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number, insertion_code);

        if let Some(&residue_id) = self.residue_id_map.get(&key) {
            return Some(residue_id);
        }

        let residue = Residue::new(number, insertion_code, name, category, chain_id);
        let residue_id = self.residues.insert(residue);
        self.residue_id_map.insert(key, residue_id);
        chain.residues.push(residue_id);
        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom's `residue_id` is overwritten so the back-reference always matches
    /// the owning residue.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let atom_id = self.atoms.insert(atom);
        residue.add_atom(atom_id);
        Some(atom_id)
    }

    /// Returns the atoms of every residue matching `predicate`, in chain/residue/file order.
    pub fn select_atoms<F>(&self, mut predicate: F) -> Vec<AtomId>
    where
        F: FnMut(&Residue) -> bool,
    {
        self.chains_iter()
            .flat_map(|(_, chain)| chain.residues().iter())
            .filter_map(|&residue_id| self.residues.get(residue_id))
            .filter(|residue| predicate(residue))
            .flat_map(|residue| residue.atoms().iter().copied())
            .collect()
    }

    pub fn polymer_atoms(&self) -> Vec<AtomId> {
        self.select_atoms(Residue::is_polymer)
    }

    pub fn non_polymer_atoms(&self) -> Vec<AtomId> {
        self.select_atoms(|residue| !residue.is_polymer())
    }

    /// Polymer residues of a chain, in chain order.
    pub fn polymer_residues(&self, chain_id: ChainId) -> Vec<ResidueId> {
        self.chains
            .get(chain_id)
            .map(|chain| {
                chain
                    .residues()
                    .iter()
                    .copied()
                    .filter(|&id| self.residues.get(id).is_some_and(Residue::is_polymer))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// One-letter sequence of the chain's polymer residues; unknown components are skipped.
    pub fn chain_sequence(&self, chain_id: ChainId) -> Option<String> {
        let chain = self.chains.get(chain_id)?;
        Some(
            chain
                .residues()
                .iter()
                .filter_map(|&id| self.residues.get(id))
                .filter_map(Residue::one_letter_code)
                .collect(),
        )
    }

    /// Copies the listed chains (with all their residues and atoms) into a new structure.
    ///
    /// Chains keep their original relative order; unknown labels are ignored.
    pub fn extract_chains(&self, labels: &[String]) -> Structure {
        let mut result = Structure::new();
        for (_, chain) in self.chains_iter() {
            if !labels.iter().any(|label| label == &chain.label) {
                continue;
            }
            let new_chain_id = result.add_chain(&chain.label);
            for residue in chain.residues().iter().filter_map(|&id| self.residues.get(id)) {
                let Some(new_residue_id) = result.add_residue(
                    new_chain_id,
                    residue.number,
                    residue.insertion_code,
                    &residue.name,
                    residue.category,
                ) else {
                    continue;
                };
                for atom in residue.atoms().iter().filter_map(|&id| self.atoms.get(id)) {
                    result.add_atom_to_residue(new_residue_id, atom.clone());
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn build_sample() -> Structure {
        let mut structure = Structure::new();
        let chain_a = structure.add_chain("A");
        let ala = structure
            .add_residue(chain_a, 1, None, "ALA", ResidueCategory::Polymer)
            .unwrap();
        let gly = structure
            .add_residue(chain_a, 2, None, "GLY", ResidueCategory::Polymer)
            .unwrap();
        let hem = structure
            .add_residue(chain_a, 101, None, "HEM", ResidueCategory::NonPolymer)
            .unwrap();
        for (residue_id, name, x) in [(ala, "CA", 0.0), (gly, "CA", 3.8), (hem, "FE", 10.0)] {
            structure.add_atom_to_residue(
                residue_id,
                Atom::new(name, ResidueId::default(), Point3::new(x, 0.0, 0.0)),
            );
        }
        let chain_b = structure.add_chain("B");
        let hoh = structure
            .add_residue(chain_b, 1, None, "HOH", ResidueCategory::NonPolymer)
            .unwrap();
        structure.add_atom_to_residue(hoh, Atom::new("O", ResidueId::default(), Point3::origin()));
        structure
    }

    #[test]
    fn add_chain_is_idempotent() {
        let mut structure = Structure::new();
        let first = structure.add_chain("A");
        let second = structure.add_chain("A");
        assert_eq!(first, second);
        assert_eq!(structure.chains_iter().count(), 1);
    }

    #[test]
    fn add_residue_is_idempotent_and_respects_insertion_codes() {
        let mut structure = Structure::new();
        let chain = structure.add_chain("A");
        let r1 = structure.add_residue(chain, 10, None, "SER", ResidueCategory::Polymer);
        let r2 = structure.add_residue(chain, 10, None, "SER", ResidueCategory::Polymer);
        let r3 = structure.add_residue(chain, 10, Some('A'), "THR", ResidueCategory::Polymer);
        assert_eq!(r1, r2);
        assert_ne!(r1, r3);
        assert_eq!(structure.chain(chain).unwrap().residues().len(), 2);
    }

    #[test]
    fn add_residue_fails_for_unknown_chain() {
        let mut structure = Structure::new();
        let chain = structure.add_chain("A");
        let mut other = Structure::new();
        other.add_chain("X");
        let foreign = other.add_chain("Y");
        assert!(
            structure
                .add_residue(foreign, 1, None, "ALA", ResidueCategory::Polymer)
                .is_none()
        );
        assert!(
            structure
                .add_residue(chain, 1, None, "ALA", ResidueCategory::Polymer)
                .is_some()
        );
    }

    #[test]
    fn add_atom_sets_back_reference() {
        let structure = build_sample();
        for (atom_id, atom) in structure.atoms_iter() {
            let residue = structure.residue(atom.residue_id).unwrap();
            assert!(residue.atoms().contains(&atom_id));
        }
    }

    #[test]
    fn polymer_and_non_polymer_atoms_partition_the_structure() {
        let structure = build_sample();
        let polymer = structure.polymer_atoms();
        let non_polymer = structure.non_polymer_atoms();
        assert_eq!(polymer.len(), 2);
        assert_eq!(non_polymer.len(), 2);
        assert_eq!(polymer.len() + non_polymer.len(), structure.atom_count());
    }

    #[test]
    fn find_residue_and_residue_key_are_inverse() {
        let structure = build_sample();
        let key = ResidueKey::new("A", 101, None);
        let residue_id = structure.find_residue(&key).unwrap();
        assert_eq!(structure.residue(residue_id).unwrap().name, "HEM");
        assert_eq!(structure.residue_key(residue_id), Some(key));
        assert!(structure.find_residue(&ResidueKey::new("C", 1, None)).is_none());
    }

    #[test]
    fn chains_iterate_in_first_seen_order() {
        let mut structure = Structure::new();
        structure.add_chain("Z");
        structure.add_chain("A");
        structure.add_chain("Z");
        let labels: Vec<_> = structure
            .chains_iter()
            .map(|(_, c)| c.label.clone())
            .collect();
        assert_eq!(labels, vec!["Z", "A"]);
    }

    #[test]
    fn chain_sequence_skips_non_polymer_residues() {
        let structure = build_sample();
        let chain_a = structure.find_chain("A").unwrap();
        assert_eq!(structure.chain_sequence(chain_a).as_deref(), Some("AG"));
        assert_eq!(structure.polymer_residues(chain_a).len(), 2);
    }

    #[test]
    fn extract_chains_copies_only_selected_chains() {
        let structure = build_sample();
        let extracted = structure.extract_chains(&["B".to_string(), "Q".to_string()]);
        assert_eq!(extracted.chains_iter().count(), 1);
        assert_eq!(extracted.atom_count(), 1);
        assert!(extracted.find_residue(&ResidueKey::new("B", 1, None)).is_some());
        assert!(extracted.find_chain("A").is_none());
    }

    #[test]
    fn empty_structure_has_no_atoms() {
        let structure = Structure::new();
        assert!(structure.is_empty());
        assert!(structure.polymer_atoms().is_empty());
        assert!(structure.non_polymer_atoms().is_empty());
    }
}
