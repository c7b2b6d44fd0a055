use super::ClusteringError;
use crate::core::utils::geometry::{euclidean_distance, squared_euclidean_distance};
use nalgebra::Point3;

/// Minimum element distance over all cross pairs of two clusters.
///
/// Scans every pair. Returns `f64::INFINITY` when either side is empty.
pub fn min_distance<T>(left: &[T], right: &[T], element_distance: impl Fn(&T, &T) -> f64) -> f64 {
    let mut best = f64::INFINITY;
    for a in left {
        for b in right {
            let d = element_distance(a, b);
            if d < best {
                best = d;
            }
        }
    }
    best
}

/// Like [`min_distance`], but stops at the first pair closer than `threshold`
/// and returns that pair's distance.
pub fn min_distance_or_threshold<T>(
    left: &[T],
    right: &[T],
    element_distance: impl Fn(&T, &T) -> f64,
    threshold: f64,
) -> f64 {
    let mut best = f64::INFINITY;
    for a in left {
        for b in right {
            let d = element_distance(a, b);
            if d < threshold {
                return d;
            }
            if d < best {
                best = d;
            }
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceUnit {
    #[default]
    Euclidean,
    /// Distances and cutoff are both squared, avoiding a `sqrt` per pair.
    SquaredEuclidean,
}

/// How cluster-to-cluster distance is reduced from element distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterMetric {
    MinDistance,
    #[default]
    MinDistanceOrThreshold,
}

impl ClusterMetric {
    pub fn evaluate<T>(
        self,
        left: &[T],
        right: &[T],
        element_distance: impl Fn(&T, &T) -> f64,
        cutoff: f64,
    ) -> f64 {
        match self {
            Self::MinDistance => min_distance(left, right, element_distance),
            Self::MinDistanceOrThreshold => {
                min_distance_or_threshold(left, right, element_distance, cutoff)
            }
        }
    }
}

/// Inclusive "close enough to merge" predicate.
///
/// The linear cutoff is stored once; the squared form is derived on demand so
/// a squared distance is always compared against a squared cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCriterion {
    linear: f64,
    unit: DistanceUnit,
}

impl MergeCriterion {
    pub fn new(linear: f64, unit: DistanceUnit) -> Result<Self, ClusteringError> {
        if !linear.is_finite() || linear <= 0.0 {
            return Err(ClusteringError::InvalidThreshold(linear));
        }
        Ok(Self { linear, unit })
    }

    pub fn euclidean(linear: f64) -> Result<Self, ClusteringError> {
        Self::new(linear, DistanceUnit::Euclidean)
    }

    pub fn squared(linear: f64) -> Result<Self, ClusteringError> {
        Self::new(linear, DistanceUnit::SquaredEuclidean)
    }

    pub fn linear(&self) -> f64 {
        self.linear
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// The cutoff in this criterion's unit (`d` or `d²`).
    pub fn cutoff(&self) -> f64 {
        match self.unit {
            DistanceUnit::Euclidean => self.linear,
            DistanceUnit::SquaredEuclidean => self.linear * self.linear,
        }
    }

    pub fn point_distance(&self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        match self.unit {
            DistanceUnit::Euclidean => euclidean_distance(a, b),
            DistanceUnit::SquaredEuclidean => squared_euclidean_distance(a, b),
        }
    }

    #[inline]
    pub fn accepts(&self, distance: f64) -> bool {
        distance <= self.cutoff()
    }

    /// Grid cell edge length, always derived from the linear cutoff.
    pub fn grid_resolution(&self) -> f64 {
        2.0 * self.linear
    }
}
