use crate::cli::DetectionArgs;
use crate::error::{CliError, Result};
use bindsite::engine::clustering::ClusterMetric;
use bindsite::engine::config::{DetectionConfig, DetectionConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialMetric {
    MinDistance,
    MinDistanceOrThreshold,
}

impl From<PartialMetric> for ClusterMetric {
    fn from(p: PartialMetric) -> Self {
        match p {
            PartialMetric::MinDistance => ClusterMetric::MinDistance,
            PartialMetric::MinDistanceOrThreshold => ClusterMetric::MinDistanceOrThreshold,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialLigandConfig {
    #[serde(rename = "bond-length")]
    bond_length: Option<f64>,
    #[serde(rename = "exclude-water")]
    exclude_water: Option<bool>,
    #[serde(rename = "excluded-components")]
    excluded_components: Option<Vec<String>>,
    #[serde(rename = "min-atoms")]
    min_atoms: Option<usize>,
    metric: Option<PartialMetric>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBindingSiteConfig {
    distance: Option<f64>,
}

/// Detection settings as read from a TOML file; every field is optional.
///
/// ```toml
/// [ligand]
/// bond-length = 1.7
/// exclude-water = true
/// excluded-components = ["SO4", "GOL"]
/// min-atoms = 1
/// metric = "min-distance-or-threshold"
///
/// [binding-site]
/// distance = 4.0
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDetectionConfig {
    ligand: Option<PartialLigandConfig>,
    #[serde(rename = "binding-site")]
    binding_site: Option<PartialBindingSiteConfig>,
}

impl PartialDetectionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads the file named by `--config`, if any, and applies the CLI overrides.
    pub fn resolve(args: &DetectionArgs) -> Result<DetectionConfig> {
        let partial = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        partial.merge_with_cli(args)
    }

    /// Precedence: `--set` values, then dedicated flags, then the file, then defaults.
    pub fn merge_with_cli(mut self, args: &DetectionArgs) -> Result<DetectionConfig> {
        self.apply_set_values(&args.set_values)?;

        let ligand = self.ligand.take().unwrap_or_default();
        let binding_site = self.binding_site.take().unwrap_or_default();

        let mut builder = DetectionConfigBuilder::new();
        if let Some(length) = args.bond_length.or(ligand.bond_length) {
            builder = builder.bond_length(length);
        }
        if let Some(distance) = args.binding_distance.or(binding_site.distance) {
            builder = builder.binding_site_distance(distance);
        }
        if args.keep_water {
            builder = builder.exclude_water(false);
        } else if let Some(exclude) = ligand.exclude_water {
            builder = builder.exclude_water(exclude);
        }
        for code in ligand.excluded_components.unwrap_or_default() {
            builder = builder.exclude_component(&code);
        }
        if let Some(min_atoms) = ligand.min_atoms {
            builder = builder.min_atoms(min_atoms);
        }
        if let Some(metric) = ligand.metric {
            builder = builder.metric(metric.into());
        }

        let config = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        debug!("Resolved detection configuration: {:?}", config);
        Ok(config)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let invalid = |kind: &str| {
                CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
            };

            match key {
                "ligand.bond-length" => {
                    self.ligand.get_or_insert_with(Default::default).bond_length =
                        Some(value_str.parse().map_err(|_| invalid("float"))?);
                }
                "ligand.exclude-water" => {
                    self.ligand.get_or_insert_with(Default::default).exclude_water =
                        Some(value_str.parse().map_err(|_| invalid("boolean"))?);
                }
                "ligand.min-atoms" => {
                    self.ligand.get_or_insert_with(Default::default).min_atoms =
                        Some(value_str.parse().map_err(|_| invalid("integer"))?);
                }
                "ligand.excluded-components" => {
                    self.ligand
                        .get_or_insert_with(Default::default)
                        .excluded_components = Some(
                        value_str
                            .split(',')
                            .map(|code| code.trim().to_string())
                            .filter(|code| !code.is_empty())
                            .collect(),
                    );
                }
                "binding-site.distance" => {
                    self.binding_site
                        .get_or_insert_with(Default::default)
                        .distance = Some(value_str.parse().map_err(|_| invalid("float"))?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
