//! Grid-accelerated single-linkage clustering of 3D elements.
//!
//! Elements are wrapped into singleton clusters, hashed into a sparse grid of
//! cubic cells twice the merge cutoff wide, and merged whenever the distance
//! between two clusters passes the [`distance::MergeCriterion`]. The result is
//! the connected components of the "within cutoff" graph over the elements.

pub mod distance;
pub mod grid;
pub mod merger;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ClusteringError {
    #[error("Element {index} has a non-finite anchor coordinate ({x}, {y}, {z})")]
    NonFiniteCoordinate {
        index: usize,
        x: f64,
        y: f64,
        z: f64,
    },

    #[error(
        "Element {index} at ({x}, {y}, {z}) is beyond the grid range at resolution {resolution}"
    )]
    CoordinateOutOfRange {
        index: usize,
        x: f64,
        y: f64,
        z: f64,
        resolution: f64,
    },

    #[error("Merge threshold must be a positive finite number (got {0})")]
    InvalidThreshold(f64),
}

pub use distance::{ClusterMetric, DistanceUnit, MergeCriterion};
pub use merger::{ClusterMerger, Clustering, MergeStats};
