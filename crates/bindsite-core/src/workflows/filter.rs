use crate::core::models::structure::Structure;
use tracing::{info, instrument, warn};

/// Copies the chains named in `chains` into a new structure.
///
/// An empty list keeps every chain. Blank entries are ignored and labels that
/// match no chain are logged.
#[instrument(skip_all, name = "filter_workflow", fields(chains = ?chains))]
pub fn run(structure: &Structure, chains: &[String]) -> Structure {
    let wanted: Vec<String> = chains
        .iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();

    if wanted.is_empty() {
        info!("No chain filter given; keeping all chains.");
        let all: Vec<String> = structure
            .chains_iter()
            .map(|(_, chain)| chain.label.clone())
            .collect();
        return structure.extract_chains(&all);
    }

    for label in &wanted {
        if structure.find_chain(label).is_none() {
            warn!("Chain '{}' not found in structure.", label);
        }
    }

    let filtered = structure.extract_chains(&wanted);
    info!(
        "Kept {} of {} chains ({} atoms).",
        filtered.chains_iter().count(),
        structure.chains_iter().count(),
        filtered.atom_count()
    );
    filtered
}

/// One-letter sequence of the named chain's polymer residues.
///
/// Residues without a one-letter code are skipped; `None` when the chain does not exist.
pub fn chain_sequence(structure: &Structure, chain: &str) -> Option<String> {
    structure
        .find_chain(chain)
        .and_then(|chain_id| structure.chain_sequence(chain_id))
}
