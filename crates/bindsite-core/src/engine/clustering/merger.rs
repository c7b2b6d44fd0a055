use super::ClusteringError;
use super::distance::{ClusterMetric, MergeCriterion};
use super::grid::{CellKey, GridIndex};
use crate::core::utils::geometry::is_finite_point;
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub elements: usize,
    pub cells: usize,
    /// Cluster-distance evaluations performed.
    pub comparisons: usize,
    pub merges: usize,
}

/// Final partition of the input elements.
#[derive(Debug, Clone)]
pub struct Clustering<'a, T> {
    /// One entry per cluster, members in input order, clusters ordered by first member.
    pub clusters: Vec<Vec<&'a T>>,
    pub stats: MergeStats,
}

/// Disjoint-set forest over wrapped elements.
///
/// Every root owns the member list of its cluster; non-root member lists are
/// empty. Anchors are captured once at wrap time.
pub struct ClusterMerger<'a, T> {
    elements: &'a [T],
    anchors: Vec<Point3<f64>>,
    parent: Vec<usize>,
    members: Vec<Vec<usize>>,
    stats: MergeStats,
}

impl<'a, T> ClusterMerger<'a, T> {
    /// Creates one singleton cluster per element.
    pub fn wrap(
        elements: &'a [T],
        anchor_fn: impl Fn(&T) -> Point3<f64>,
    ) -> Result<Self, ClusteringError> {
        let anchors = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let anchor = anchor_fn(element);
                if is_finite_point(&anchor) {
                    Ok(anchor)
                } else {
                    Err(ClusteringError::NonFiniteCoordinate {
                        index,
                        x: anchor.x,
                        y: anchor.y,
                        z: anchor.z,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            elements,
            anchors,
            parent: (0..elements.len()).collect(),
            members: (0..elements.len()).map(|i| vec![i]).collect(),
            stats: MergeStats {
                elements: elements.len(),
                ..MergeStats::default()
            },
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn anchor(&self, index: usize) -> Option<&Point3<f64>> {
        self.anchors.get(index)
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// Root of the cluster containing `index`, compressing the path on the way.
    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = index;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges the clusters of `a` and `b` when their distance passes `criterion`.
    ///
    /// Returns true when a merge happened; already-joined elements are a no-op.
    pub fn try_merge(
        &mut self,
        a: usize,
        b: usize,
        criterion: &MergeCriterion,
        metric: ClusterMetric,
    ) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.stats.comparisons += 1;

        let anchors = &self.anchors;
        let distance = metric.evaluate(
            &self.members[ra],
            &self.members[rb],
            |&i, &j| criterion.point_distance(&anchors[i], &anchors[j]),
            criterion.cutoff(),
        );
        if !criterion.accepts(distance) {
            return false;
        }

        let (large, small) = if self.members[ra].len() >= self.members[rb].len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        let moved = std::mem::take(&mut self.members[small]);
        self.members[large].extend(moved);
        self.parent[small] = large;
        self.stats.merges += 1;
        trace!("Merged cluster {} into {} (distance {:.3}).", small, large, distance);
        true
    }

    /// Rejects anchors whose cell coordinates cannot be represented at `resolution`.
    fn check_grid_range(&self, resolution: f64) -> Result<(), ClusteringError> {
        match self
            .anchors
            .iter()
            .position(|anchor| CellKey::try_of(anchor, resolution).is_none())
        {
            Some(index) => {
                let anchor = self.anchors[index];
                Err(ClusteringError::CoordinateOutOfRange {
                    index,
                    x: anchor.x,
                    y: anchor.y,
                    z: anchor.z,
                    resolution,
                })
            }
            None => Ok(()),
        }
    }

    /// Scans the grid once, trying every element against every element of
    /// adjacent cells whose cluster differs.
    fn merge_neighbors(
        &mut self,
        grid: &GridIndex,
        criterion: &MergeCriterion,
        metric: ClusterMetric,
    ) {
        let mut tried: HashSet<usize> = HashSet::new();
        for key in grid.cells() {
            let Some(left_entries) = grid.get(&key) else {
                continue;
            };
            for (_, right_entries) in grid.neighbors(key) {
                for &left in left_entries {
                    tried.clear();
                    for &right in right_entries {
                        let right_root = self.find(right);
                        if right_root == self.find(left) || tried.contains(&right_root) {
                            continue;
                        }
                        if !self.try_merge(left, right, criterion, metric) {
                            tried.insert(right_root);
                        }
                    }
                }
            }
        }
    }

    /// Surviving clusters, members in input order, ordered by first member.
    pub fn clusters(&mut self) -> Vec<Vec<&'a T>> {
        let mut roots: Vec<usize> = (0..self.elements.len())
            .filter(|&i| self.find(i) == i)
            .collect();
        for &root in &roots {
            self.members[root].sort_unstable();
        }
        roots.sort_unstable_by_key(|&root| self.members[root][0]);
        let elements = self.elements;
        roots
            .into_iter()
            .map(|root| self.members[root].iter().map(|&i| &elements[i]).collect())
            .collect()
    }

    /// Clusters `elements` by single linkage under `criterion`.
    pub fn run(
        elements: &'a [T],
        criterion: &MergeCriterion,
        metric: ClusterMetric,
        anchor_fn: impl Fn(&T) -> Point3<f64>,
    ) -> Result<Clustering<'a, T>, ClusteringError> {
        let mut merger = Self::wrap(elements, anchor_fn)?;
        if merger.is_empty() {
            return Ok(Clustering {
                clusters: Vec::new(),
                stats: merger.stats,
            });
        }

        let resolution = criterion.grid_resolution();
        merger.check_grid_range(resolution)?;
        let grid = GridIndex::build(merger.anchors.iter().enumerate(), resolution);
        merger.stats.cells = grid.len();
        merger.merge_neighbors(&grid, criterion, metric);

        let clusters = merger.clusters();
        debug!(
            "Clustered {} elements in {} cells into {} clusters ({} comparisons, {} merges).",
            merger.stats.elements,
            merger.stats.cells,
            clusters.len(),
            merger.stats.comparisons,
            merger.stats.merges
        );
        Ok(Clustering {
            clusters,
            stats: merger.stats,
        })
    }
}
