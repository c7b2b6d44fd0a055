//! # Workflows Module
//!
//! End-to-end procedures built on the [`engine`](crate::engine) and [`core`](crate::core)
//! layers. Each workflow takes an already loaded structure and returns a serializable report,
//! leaving file handling to the caller.
//!
//! - **Structure Info** ([`info`]) - Indices, sequence, binding positions, residue scores
//! - **Binding Site** ([`binding_site`]) - Sequence with binding-site positions
//! - **Chain Filter** ([`filter`]) - Extraction of selected chains into a new structure

pub mod binding_site;
pub mod filter;
pub mod info;

use crate::core::models::ids::ResidueId;
use crate::core::models::residue::ResidueKey;
use crate::core::models::structure::Structure;
use crate::engine::binding_site::{BindingSite, select_binding_sites};
use crate::engine::config::DetectionConfig;
use crate::engine::error::EngineError;
use crate::engine::ligands::detect_ligands;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::collections::HashSet;

/// A chain's slice `[start, end]` of the flat per-residue lists in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// A chain that contributes residues to a report.
pub(crate) struct PolymerChain {
    pub name: String,
    pub residues: Vec<ResidueId>,
}

/// Chains holding at least one polymer residue, in structure order.
///
/// Chains are named by their display label (blank becomes `A`); a label seen
/// twice is only reported the first time.
pub(crate) fn polymer_chains(structure: &Structure) -> Vec<PolymerChain> {
    let mut visited = HashSet::new();
    let mut chains = Vec::new();
    for (chain_id, chain) in structure.chains_iter() {
        let residues = structure.polymer_residues(chain_id);
        if residues.is_empty() {
            continue;
        }
        let name = chain.display_label().to_string();
        if !visited.insert(name.clone()) {
            continue;
        }
        chains.push(PolymerChain { name, residues });
    }
    chains
}

/// Index string of a residue under its reported chain name, e.g. `A_12` or `A_12B`.
pub(crate) fn residue_index(
    chain_name: &str,
    structure: &Structure,
    residue_id: ResidueId,
) -> Option<String> {
    let residue = structure.residue(residue_id)?;
    Some(ResidueKey::new(chain_name, residue.number, residue.insertion_code).to_string())
}

/// Detects ligands and returns the union of their binding sites.
pub fn locate_binding_site(
    structure: &Structure,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<BindingSite, EngineError> {
    let ligands = reporter.phase(
        "Detecting ligands",
        || detect_ligands(structure, config),
        |result| match result {
            Ok(ligands) => format!("{} ligands", ligands.len()),
            Err(_) => "failed".to_string(),
        },
    )?;

    reporter.report(Progress::PhaseStart {
        name: "Selecting binding site",
    });
    reporter.report(Progress::TaskStart {
        total: ligands.len() as u64,
    });
    let site = select_binding_sites(structure, &ligands, config.binding_site_distance, reporter);
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish {
        detail: format!("{} residues", site.len()),
    });
    Ok(site)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Region;
    use crate::core::io::pdb::PdbFile;
    use crate::core::io::traits::StructureFile;
    use crate::core::models::structure::Structure;
    use std::io::Cursor;

    pub fn region(name: &str, start: usize, end: usize) -> Region {
        Region {
            name: name.to_string(),
            start,
            end,
        }
    }

    /// Two protein chains, a ligand bound to chain A, a distant ion, and waters.
    pub const COMPLEX_PDB: &str = "\
ATOM      1  CA  ALA A   1       0.000   0.000   0.000  1.00 10.00           C
ATOM      2  CA  GLY A   2       3.800   0.000   0.000  1.00 10.00           C
ATOM      3  CA  SER A   2A      7.600   0.000   0.000  1.00 10.00           C
ATOM      4  CA  UNK A   3      11.400   0.000   0.000  1.00 10.00           C
ATOM      5  CA  LYS B  10      40.000   0.000   0.000  1.00 10.00           C
ATOM      6  CA  GLU B  11      43.800   0.000   0.000  1.00 10.00           C
HETATM    7  C1  LIG A 401       3.800   3.500   0.000  1.00 20.00           C
HETATM    8  C2  LIG A 401       5.200   3.000   0.000  1.00 20.00           C
HETATM    9 ZN    ZN B 501      80.000   0.000   0.000  1.00 20.00          ZN
HETATM   10  O   HOH A 601      11.400   2.000   0.000  1.00 20.00           O
HETATM   11  O   HOH C 701       0.000  20.000   0.000  1.00 20.00           O
END
";

    pub fn complex() -> Structure {
        PdbFile::read_from(&mut Cursor::new(COMPLEX_PDB)).unwrap().0
    }
}
