use super::clustering::{ClusterMetric, ClusteringError, MergeCriterion};
use crate::core::models::residue::Residue;
use std::collections::HashSet;
use thiserror::Error;

pub const DEFAULT_BOND_LENGTH: f64 = 1.7;
pub const DEFAULT_BINDING_SITE_DISTANCE: f64 = 4.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{parameter}' must be a positive finite distance (got {value})")]
    InvalidDistance { parameter: &'static str, value: f64 },

    #[error("Minimum ligand size must be at least one atom")]
    ZeroMinAtoms,
}

/// Decides which non-polymer residues contribute atoms to ligand detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandFilter {
    pub exclude_water: bool,
    /// Component codes never treated as ligands (e.g. `SO4`), upper-case.
    pub excluded_components: HashSet<String>,
    /// Clusters with fewer atoms are dropped after clustering.
    pub min_atoms: usize,
}

impl Default for LigandFilter {
    fn default() -> Self {
        Self {
            exclude_water: true,
            excluded_components: HashSet::new(),
            min_atoms: 1,
        }
    }
}

impl LigandFilter {
    pub fn accepts(&self, residue: &Residue) -> bool {
        if residue.is_polymer() {
            return false;
        }
        if self.exclude_water && residue.is_water() {
            return false;
        }
        !self
            .excluded_components
            .contains(&residue.name.trim().to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Maximum covalent bond length (Å) joining two ligand atoms.
    pub bond_length: f64,
    /// Polymer atoms within this distance (Å) of a ligand atom form the binding site.
    pub binding_site_distance: f64,
    pub ligand_filter: LigandFilter,
    pub metric: ClusterMetric,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            bond_length: DEFAULT_BOND_LENGTH,
            binding_site_distance: DEFAULT_BINDING_SITE_DISTANCE,
            ligand_filter: LigandFilter::default(),
            metric: ClusterMetric::MinDistanceOrThreshold,
        }
    }
}

impl DetectionConfig {
    /// Squared-distance criterion used to join ligand atoms.
    pub fn ligand_criterion(&self) -> Result<MergeCriterion, ClusteringError> {
        MergeCriterion::squared(self.bond_length)
    }
}

#[derive(Default)]
pub struct DetectionConfigBuilder {
    bond_length: Option<f64>,
    binding_site_distance: Option<f64>,
    exclude_water: Option<bool>,
    excluded_components: Vec<String>,
    min_atoms: Option<usize>,
    metric: Option<ClusterMetric>,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_length(mut self, angstroms: f64) -> Self {
        self.bond_length = Some(angstroms);
        self
    }
    pub fn binding_site_distance(mut self, angstroms: f64) -> Self {
        self.binding_site_distance = Some(angstroms);
        self
    }
    pub fn exclude_water(mut self, exclude: bool) -> Self {
        self.exclude_water = Some(exclude);
        self
    }
    pub fn exclude_component(mut self, code: &str) -> Self {
        self.excluded_components.push(code.to_string());
        self
    }
    pub fn min_atoms(mut self, atoms: usize) -> Self {
        self.min_atoms = Some(atoms);
        self
    }
    pub fn metric(mut self, metric: ClusterMetric) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn build(self) -> Result<DetectionConfig, ConfigError> {
        let defaults = DetectionConfig::default();
        let bond_length = validate_distance("bond_length", self.bond_length, defaults.bond_length)?;
        let binding_site_distance = validate_distance(
            "binding_site_distance",
            self.binding_site_distance,
            defaults.binding_site_distance,
        )?;

        let min_atoms = self.min_atoms.unwrap_or(defaults.ligand_filter.min_atoms);
        if min_atoms == 0 {
            return Err(ConfigError::ZeroMinAtoms);
        }

        Ok(DetectionConfig {
            bond_length,
            binding_site_distance,
            ligand_filter: LigandFilter {
                exclude_water: self
                    .exclude_water
                    .unwrap_or(defaults.ligand_filter.exclude_water),
                excluded_components: self
                    .excluded_components
                    .iter()
                    .map(|code| code.trim().to_ascii_uppercase())
                    .filter(|code| !code.is_empty())
                    .collect(),
                min_atoms,
            },
            metric: self.metric.unwrap_or(defaults.metric),
        })
    }
}

fn validate_distance(
    parameter: &'static str,
    value: Option<f64>,
    default: f64,
) -> Result<f64, ConfigError> {
    let value = value.unwrap_or(default);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidDistance { parameter, value })
    }
}
