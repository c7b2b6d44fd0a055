use super::{Region, locate_binding_site, polymer_chains, residue_index};
use crate::core::io::cif::ResidueMetrics;
use crate::core::models::structure::Structure;
use crate::engine::config::DetectionConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Score name under which local QA metrics (pLDDT) are reported.
pub const PLDDT_SCORE: &str = "plddt";

/// Per-residue overview of a structure's polymer chains.
///
/// All lists are flat and aligned by residue; `regions` maps chains onto them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureInfo {
    pub indices: Vec<String>,
    pub sequence: Vec<String>,
    /// Positions in `indices` of residues in the binding site.
    pub binding: Vec<usize>,
    pub regions: Vec<Region>,
    pub scores: BTreeMap<String, Vec<f64>>,
}

#[instrument(skip_all, name = "structure_info_workflow")]
pub fn run(
    structure: &Structure,
    qa_metrics: Option<&ResidueMetrics>,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<StructureInfo, EngineError> {
    let binding_site = locate_binding_site(structure, config, reporter)?;

    let mut result = StructureInfo::default();
    for chain in polymer_chains(structure) {
        let start = result.indices.len();
        for &residue_id in &chain.residues {
            let (Some(residue), Some(index)) = (
                structure.residue(residue_id),
                residue_index(&chain.name, structure, residue_id),
            ) else {
                continue;
            };
            result.indices.push(index);
            result
                .sequence
                .push(residue.one_letter_code().unwrap_or('X').to_string());
            if binding_site.contains(residue_id) {
                result.binding.push(result.indices.len() - 1);
            }
        }
        result.regions.push(Region {
            name: chain.name,
            start,
            end: result.indices.len() - 1,
        });
    }

    if let Some(metrics) = qa_metrics {
        let values = residue_scores(&result.indices, metrics, PLDDT_SCORE, 0.0);
        result.scores.insert(PLDDT_SCORE.to_string(), values);
    }

    info!(
        "Structure info: {} residues in {} regions, {} binding.",
        result.indices.len(),
        result.regions.len(),
        result.binding.len()
    );
    Ok(result)
}

/// Looks up a value per residue index, substituting `default` for missing entries.
fn residue_scores(
    indices: &[String],
    metrics: &ResidueMetrics,
    name: &str,
    default: f64,
) -> Vec<f64> {
    let mut reported_missing = false;
    indices
        .iter()
        .map(|index| match metrics.get(index) {
            Some(&value) => value,
            None => {
                if !reported_missing {
                    info!("Missing '{}' value for residue {}; using {}.", name, index, default);
                    reported_missing = true;
                }
                default
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::test_support::{complex, region};

    fn info(metrics: Option<&ResidueMetrics>) -> StructureInfo {
        run(&complex(), metrics, &DetectionConfig::default(), &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn reports_indices_sequence_and_regions() {
        let result = info(None);
        assert_eq!(result.indices, vec!["A_1", "A_2", "A_2A", "A_3", "B_10", "B_11"]);
        assert_eq!(result.sequence, vec!["A", "G", "S", "X", "K", "E"]);
        assert_eq!(result.regions, vec![region("A", 0, 3), region("B", 4, 5)]);
        assert_eq!(result.binding, vec![1, 2]);
        assert!(result.scores.is_empty());
    }

    #[test]
    fn metrics_fill_plddt_scores_with_default_for_missing() {
        let metrics: ResidueMetrics = [("A_1".to_string(), 91.5), ("B_11".to_string(), 60.0)]
            .into_iter()
            .collect();
        let result = info(Some(&metrics));
        assert_eq!(
            result.scores.get(PLDDT_SCORE).unwrap(),
            &vec![91.5, 0.0, 0.0, 0.0, 0.0, 60.0]
        );
    }

    #[test]
    fn empty_structure_gives_empty_report() {
        let result = run(
            &Structure::new(),
            None,
            &DetectionConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(result, StructureInfo::default());
    }

    #[test]
    fn serializes_with_expected_keys() {
        let json = serde_json::to_value(info(None)).unwrap();
        for key in ["indices", "sequence", "binding", "regions", "scores"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["regions"][1]["name"], "B");
    }
}
