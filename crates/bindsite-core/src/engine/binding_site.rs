use super::ligands::Ligand;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::residue::ResidueKey;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::squared_euclidean_distance;
use std::collections::HashSet;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Deduplicated set of polymer residues near one or more ligands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSite {
    residues: HashSet<ResidueId>,
}

impl BindingSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, residue_id: ResidueId) -> bool {
        self.residues.contains(&residue_id)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ResidueId> + '_ {
        self.residues.iter().copied()
    }

    pub fn union_with(&mut self, other: BindingSite) {
        self.residues.extend(other.residues);
    }

    /// Residue keys sorted by chain, number and insertion code.
    pub fn sorted_keys(&self, structure: &Structure) -> Vec<ResidueKey> {
        let mut keys: Vec<ResidueKey> = self
            .residues
            .iter()
            .filter_map(|&id| structure.residue_key(id))
            .collect();
        keys.sort();
        keys
    }
}

impl FromIterator<ResidueId> for BindingSite {
    fn from_iter<I: IntoIterator<Item = ResidueId>>(iter: I) -> Self {
        Self {
            residues: iter.into_iter().collect(),
        }
    }
}

/// Residues owning any of `polymer_atoms` within `distance` Å (inclusive) of a ligand atom.
pub fn select_binding_site(
    structure: &Structure,
    polymer_atoms: &[AtomId],
    ligand: &Ligand,
    distance: f64,
) -> BindingSite {
    let cutoff = distance * distance;
    let ligand_positions: Vec<_> = ligand
        .atoms()
        .iter()
        .filter_map(|&id| structure.atom(id))
        .map(|atom| atom.position)
        .collect();

    polymer_atoms
        .iter()
        .filter_map(|&id| structure.atom(id))
        .filter(|atom| {
            ligand_positions
                .iter()
                .any(|position| squared_euclidean_distance(&atom.position, position) <= cutoff)
        })
        .map(|atom| atom.residue_id)
        .collect()
}

/// Union of the binding sites of every ligand.
///
/// Emits one [`Progress::TaskIncrement`] per processed ligand.
pub fn select_binding_sites(
    structure: &Structure,
    ligands: &[Ligand],
    distance: f64,
    reporter: &ProgressReporter,
) -> BindingSite {
    let polymer_atoms = structure.polymer_atoms();
    let select = |ligand: &Ligand| {
        let site = select_binding_site(structure, &polymer_atoms, ligand, distance);
        reporter.report(Progress::TaskIncrement);
        site
    };

    #[cfg(feature = "parallel")]
    let per_ligand: Vec<BindingSite> = ligands.par_iter().map(select).collect();

    #[cfg(not(feature = "parallel"))]
    let per_ligand: Vec<BindingSite> = ligands.iter().map(select).collect();

    let mut union = BindingSite::new();
    for (ligand, site) in ligands.iter().zip(per_ligand) {
        debug!("Ligand {} contacts {} residues.", ligand.name(), site.len());
        union.union_with(site);
    }
    union
}
