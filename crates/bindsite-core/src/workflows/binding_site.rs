use super::{Region, locate_binding_site, polymer_chains, residue_index};
use crate::core::models::structure::Structure;
use crate::engine::config::DetectionConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Sequence view with binding-site positions, consumed by sequence viewers.
///
/// Residues without a one-letter code are left out of every list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSiteReport {
    pub seq: Vec<String>,
    pub indices: Vec<String>,
    pub binding_sites: Vec<usize>,
    pub regions: Vec<Region>,
}

#[instrument(skip_all, name = "binding_site_workflow")]
pub fn run(
    structure: &Structure,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<BindingSiteReport, EngineError> {
    let binding_site = locate_binding_site(structure, config, reporter)?;

    let mut report = BindingSiteReport::default();
    for chain in polymer_chains(structure) {
        let start = report.indices.len();
        for &residue_id in &chain.residues {
            let Some(code) = structure.residue(residue_id).and_then(|r| r.one_letter_code()) else {
                continue;
            };
            let Some(index) = residue_index(&chain.name, structure, residue_id) else {
                continue;
            };
            report.seq.push(code.to_string());
            report.indices.push(index);
            if binding_site.contains(residue_id) {
                report.binding_sites.push(report.indices.len() - 1);
            }
        }
        if report.indices.len() == start {
            debug!("Chain {} has no residues with a one-letter code.", chain.name);
            continue;
        }
        report.regions.push(Region {
            name: chain.name,
            start,
            end: report.indices.len() - 1,
        });
    }

    info!(
        "Binding-site report: {} residues, {} in binding sites.",
        report.indices.len(),
        report.binding_sites.len()
    );
    Ok(report)
}
