use nalgebra::Point3;
use std::collections::HashMap;

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Largest cell coordinate magnitude; keeps every neighbor offset within `i64`.
const MAX_CELL_COORDINATE: f64 = (1u64 << 62) as f64;

impl CellKey {
    /// Cell containing `point`. The point must satisfy [`CellKey::try_of`].
    pub fn of(point: &Point3<f64>, resolution: f64) -> Self {
        Self {
            x: (point.x / resolution).floor() as i64,
            y: (point.y / resolution).floor() as i64,
            z: (point.z / resolution).floor() as i64,
        }
    }

    /// Cell containing `point`, or `None` when a coordinate is not finite or
    /// falls outside the addressable grid.
    pub fn try_of(point: &Point3<f64>, resolution: f64) -> Option<Self> {
        let in_range = |axis: f64| {
            let cell = (axis / resolution).floor();
            cell.is_finite() && cell.abs() < MAX_CELL_COORDINATE
        };
        (in_range(point.x) && in_range(point.y) && in_range(point.z))
            .then(|| Self::of(point, resolution))
    }

    /// The 27 keys at Chebyshev distance at most 1, self included.
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).map(move |dz| CellKey {
                    x: self.x + dx,
                    y: self.y + dy,
                    z: self.z + dz,
                })
            })
        })
    }
}

/// Sparse spatial hash of element indices. Only populated cells are stored.
#[derive(Debug, Clone)]
pub struct GridIndex {
    resolution: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    /// Buckets each `(index, anchor)` pair into the cell containing the anchor.
    pub fn build<'a>(
        anchors: impl IntoIterator<Item = (usize, &'a Point3<f64>)>,
        resolution: f64,
    ) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (index, anchor) in anchors {
            cells
                .entry(CellKey::of(anchor, resolution))
                .or_default()
                .push(index);
        }
        Self { resolution, cells }
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, key: &CellKey) -> Option<&[usize]> {
        self.cells.get(key).map(Vec::as_slice)
    }

    /// Populated cells sorted by key.
    pub fn cells(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.cells.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Populated cells adjacent to `key` (self included), found by probing.
    pub fn neighbors(&self, key: CellKey) -> impl Iterator<Item = (CellKey, &[usize])> + '_ {
        key.neighborhood().filter_map(move |candidate| {
            self.get(&candidate).map(|entries| (candidate, entries))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_uses_floor_for_negative_coordinates() {
        let key = CellKey::of(&Point3::new(-0.1, 0.0, 3.9), 2.0);
        assert_eq!(key, CellKey { x: -1, y: 0, z: 1 });
        let key = CellKey::of(&Point3::new(-2.0, -4.1, 4.0), 2.0);
        assert_eq!(key, CellKey { x: -1, y: -3, z: 2 });
    }

    #[test]
    fn try_of_rejects_cells_beyond_the_addressable_range() {
        assert_eq!(
            CellKey::try_of(&Point3::new(1.0, -3.0, 5.0), 2.0),
            Some(CellKey { x: 0, y: -2, z: 2 })
        );
        assert!(CellKey::try_of(&Point3::new(1e30, 0.0, 0.0), 3.4).is_none());
        assert!(CellKey::try_of(&Point3::new(0.0, -1e30, 0.0), 3.4).is_none());
        assert!(CellKey::try_of(&Point3::new(0.0, 0.0, f64::INFINITY), 3.4).is_none());
        assert!(CellKey::try_of(&Point3::new(1e12, 1e12, -1e12), 3.4).is_some());
    }

    #[test]
    fn neighborhood_has_27_distinct_keys() {
        let keys: Vec<_> = CellKey { x: 0, y: 0, z: 0 }.neighborhood().collect();
        assert_eq!(keys.len(), 27);
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 27);
    }

    #[test]
    fn build_only_stores_populated_cells() {
        let points = [
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(0.7, 0.1, 0.2),
            Point3::new(100.0, 0.0, 0.0),
        ];
        let grid = GridIndex::build(points.iter().enumerate(), 1.0);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get(&CellKey { x: 0, y: 0, z: 0 }), Some(&[0, 1][..]));
        assert_eq!(grid.get(&CellKey { x: 100, y: 0, z: 0 }), Some(&[2][..]));
    }

    #[test]
    fn neighbors_are_limited_to_adjacent_populated_cells() {
        let points = [
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(1.5, 1.5, 1.5),
            Point3::new(-0.5, 0.5, 0.5),
            Point3::new(2.5, 0.5, 0.5),
        ];
        let grid = GridIndex::build(points.iter().enumerate(), 1.0);
        let origin = CellKey { x: 0, y: 0, z: 0 };
        let mut found: Vec<usize> = grid
            .neighbors(origin)
            .flat_map(|(_, entries)| entries.iter().copied())
            .collect();
        found.sort();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn cells_are_sorted() {
        let points = [
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(-5.0, 0.0, 0.0),
            Point3::new(0.0, 5.0, 0.0),
        ];
        let grid = GridIndex::build(points.iter().enumerate(), 1.0);
        let cells = grid.cells();
        let mut sorted = cells.clone();
        sorted.sort();
        assert_eq!(cells, sorted);
        assert_eq!(cells[0].x, -5);
    }
}
