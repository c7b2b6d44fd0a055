use thiserror::Error;

use super::clustering::ClusteringError;
use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Ligand clustering failed: {source}")]
    Clustering {
        #[from]
        source: ClusteringError,
    },

    #[error("Invalid detection configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
