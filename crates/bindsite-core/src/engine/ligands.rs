use super::clustering::ClusterMerger;
use super::config::{DetectionConfig, LigandFilter};
use super::error::EngineError;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use tracing::{debug, info};

/// A group of covalently connected non-polymer atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ligand {
    atoms: Vec<AtomId>,
    name: String,
}

impl Ligand {
    fn from_atoms(structure: &Structure, atoms: Vec<AtomId>) -> Self {
        let mut components: Vec<&str> = Vec::new();
        for residue in atoms
            .iter()
            .filter_map(|&id| structure.atom(id))
            .filter_map(|atom| structure.residue(atom.residue_id))
        {
            let code = residue.name.trim();
            if !components.contains(&code) {
                components.push(code);
            }
        }
        let name = components.join("+");
        Self { atoms, name }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Component codes of the member residues in first-seen order, joined by `+`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn residues(&self, structure: &Structure) -> Vec<ResidueId> {
        let mut residues = Vec::new();
        for atom in self.atoms.iter().filter_map(|&id| structure.atom(id)) {
            if !residues.contains(&atom.residue_id) {
                residues.push(atom.residue_id);
            }
        }
        residues
    }
}

/// Atoms of residues accepted by `filter`, in structure order.
pub fn ligand_atoms(structure: &Structure, filter: &LigandFilter) -> Vec<AtomId> {
    structure.select_atoms(|residue| filter.accepts(residue))
}

/// Clusters the given atoms into ligands; the atoms are used as given.
pub fn detect_ligands_in_atoms(
    structure: &Structure,
    atoms: &[AtomId],
    config: &DetectionConfig,
) -> Result<Vec<Ligand>, EngineError> {
    let criterion = config.ligand_criterion()?;
    let clustering = ClusterMerger::run(atoms, &criterion, config.metric, |&id| {
        structure
            .atom(id)
            .map(|atom| atom.position)
            .unwrap_or_else(|| Point3::new(f64::NAN, f64::NAN, f64::NAN))
    })?;

    let total = clustering.clusters.len();
    let ligands: Vec<Ligand> = clustering
        .clusters
        .into_iter()
        .filter(|cluster| cluster.len() >= config.ligand_filter.min_atoms)
        .map(|cluster| Ligand::from_atoms(structure, cluster.into_iter().copied().collect()))
        .collect();

    if ligands.len() < total {
        debug!(
            "Dropped {} clusters smaller than {} atoms.",
            total - ligands.len(),
            config.ligand_filter.min_atoms
        );
    }
    Ok(ligands)
}

/// Finds ligands among the structure's non-polymer atoms.
pub fn detect_ligands(
    structure: &Structure,
    config: &DetectionConfig,
) -> Result<Vec<Ligand>, EngineError> {
    let atoms = ligand_atoms(structure, &config.ligand_filter);
    let ligands = detect_ligands_in_atoms(structure, &atoms, config)?;
    info!(
        "Detected {} ligands from {} candidate atoms.",
        ligands.len(),
        atoms.len()
    );
    Ok(ligands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::{AtomRecord, StructureBuilder};
    use crate::engine::config::DetectionConfigBuilder;

    fn add(
        builder: &mut StructureBuilder,
        chain: &str,
        number: isize,
        residue: &str,
        hetero: bool,
        x: f64,
    ) {
        builder.add_record(&AtomRecord {
            serial: 0,
            name: "C1",
            element: "C",
            residue_name: residue,
            chain,
            residue_number: number,
            insertion_code: None,
            position: Point3::new(x, 0.0, 0.0),
            occupancy: 1.0,
            temperature_factor: 0.0,
            hetero,
        });
    }

    fn sample() -> Structure {
        let mut builder = StructureBuilder::new();
        add(&mut builder, "A", 1, "ALA", false, 0.0);
        // NAG-NAG glycan, bonded across residues.
        add(&mut builder, "A", 401, "NAG", true, 10.0);
        add(&mut builder, "A", 401, "NAG", true, 11.4);
        add(&mut builder, "A", 402, "NAG", true, 12.8);
        // Isolated ion and water.
        add(&mut builder, "A", 501, "ZN", true, 30.0);
        add(&mut builder, "A", 601, "HOH", true, 14.0);
        add(&mut builder, "A", 701, "SO4", true, 50.0);
        builder.build()
    }

    #[test]
    fn bonded_residues_form_one_ligand() {
        let structure = sample();
        let ligands = detect_ligands(&structure, &DetectionConfig::default()).unwrap();
        let names: Vec<_> = ligands.iter().map(Ligand::name).collect();
        assert_eq!(names, vec!["NAG", "ZN", "SO4"]);
        assert_eq!(ligands[0].len(), 3);
        assert_eq!(ligands[0].residues(&structure).len(), 2);
    }

    #[test]
    fn water_and_polymer_atoms_are_not_candidates() {
        let structure = sample();
        let atoms = ligand_atoms(&structure, &LigandFilter::default());
        assert_eq!(atoms.len(), 5);
        for id in atoms {
            let residue_id = structure.atom(id).unwrap().residue_id;
            let residue = structure.residue(residue_id).unwrap();
            assert!(!residue.is_polymer());
            assert!(!residue.is_water());
        }
    }

    #[test]
    fn keeping_water_joins_it_to_nearby_ligand() {
        let structure = sample();
        let config = DetectionConfigBuilder::new()
            .exclude_water(false)
            .build()
            .unwrap();
        let ligands = detect_ligands(&structure, &config).unwrap();
        assert_eq!(ligands[0].name(), "NAG+HOH");
    }

    #[test]
    fn excluded_components_and_small_clusters_are_dropped() {
        let structure = sample();
        let config = DetectionConfigBuilder::new()
            .exclude_component("SO4")
            .min_atoms(2)
            .build()
            .unwrap();
        let ligands = detect_ligands(&structure, &config).unwrap();
        assert_eq!(ligands.len(), 1);
        assert_eq!(ligands[0].name(), "NAG");
    }

    #[test]
    fn structure_without_ligands_yields_empty_list() {
        let mut builder = StructureBuilder::new();
        add(&mut builder, "A", 1, "ALA", false, 0.0);
        let structure = builder.build();
        let config = DetectionConfig::default();
        assert!(detect_ligands(&structure, &config).unwrap().is_empty());
        assert!(detect_ligands(&Structure::new(), &config).unwrap().is_empty());
    }

    #[test]
    fn non_finite_ligand_coordinates_are_rejected() {
        let mut builder = StructureBuilder::new();
        add(&mut builder, "A", 401, "LIG", true, f64::NAN);
        let structure = builder.build();
        let err = detect_ligands(&structure, &DetectionConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::Clustering { .. }));
    }
}
