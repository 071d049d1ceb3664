#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for nearest-neighbour proximity queries.
//!
//! Builds an R-tree over a planar-projected point set and answers
//! "nearest indexed point to this query point" with the exact planar
//! Euclidean distance. Built once per domain computation; bulk load is
//! O(n log n) and each query is O(log n) on average, so thousands of
//! points and queries per run stay cheap.
//!
//! Coordinates must already be planar (metres). Angular-degree
//! coordinates would make the returned distances meaningless.

use rstar::RTree;
use rstar::primitives::GeomWithData;
use thiserror::Error;

/// Errors that can occur when building a proximity index.
#[derive(Debug, Error)]
pub enum ProximityError {
    /// A spatial index was requested over zero points.
    #[error("Cannot build a spatial index over zero points")]
    EmptyIndex,
}

/// An R-tree over planar points, each tagged with its position in the
/// source slice.
pub struct ProximityIndex {
    tree: RTree<GeomWithData<[f64; 2], usize>>,
}

impl ProximityIndex {
    /// Builds the index over a planar `[easting, northing]` point set.
    ///
    /// # Errors
    ///
    /// Returns [`ProximityError::EmptyIndex`] if `points` is empty.
    pub fn build(points: &[[f64; 2]]) -> Result<Self, ProximityError> {
        if points.is_empty() {
            return Err(ProximityError::EmptyIndex);
        }

        let entries: Vec<GeomWithData<[f64; 2], usize>> = points
            .iter()
            .enumerate()
            .map(|(id, p)| GeomWithData::new(*p, id))
            .collect();

        Ok(Self {
            tree: RTree::bulk_load(entries),
        })
    }

    /// Returns `(point_id, distance_m)` for the indexed point nearest to
    /// `query`.
    ///
    /// The distance is the exact minimum planar Euclidean distance from
    /// the query to the point set. When several points are equidistant,
    /// any one of their ids may be returned.
    ///
    /// # Panics
    ///
    /// Never panics: construction guarantees at least one point.
    #[must_use]
    pub fn nearest(&self, query: [f64; 2]) -> (usize, f64) {
        let (entry, distance_2) = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&query)
            .next()
            .expect("index is never empty");
        (entry.data, distance_2.sqrt())
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty (never true after construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_nearest(points: &[[f64; 2]], query: [f64; 2]) -> f64 {
        points
            .iter()
            .map(|p| (p[0] - query[0]).hypot(p[1] - query[1]))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn empty_index_is_an_error() {
        assert!(matches!(
            ProximityIndex::build(&[]),
            Err(ProximityError::EmptyIndex)
        ));
    }

    #[test]
    fn single_point_distance_is_exact() {
        let index = ProximityIndex::build(&[[100.0, 200.0]]).unwrap();
        let (id, dist) = index.nearest([100.0, 200.0]);
        assert_eq!(id, 0);
        assert!((dist - 0.0).abs() < f64::EPSILON);

        let (_, dist) = index.nearest([103.0, 204.0]);
        assert!((dist - 5.0).abs() < 1e-12);
    }

    #[test]
    fn matches_brute_force_on_synthetic_grid() {
        // Deterministic scattered set: no RNG so the cross-check is
        // reproducible.
        let points: Vec<[f64; 2]> = (0..200)
            .map(|i| {
                let x = f64::from(i % 17) * 37.5 + f64::from(i) * 0.11;
                let y = f64::from(i % 23) * 29.25 - f64::from(i) * 0.07;
                [x, y]
            })
            .collect();
        let index = ProximityIndex::build(&points).unwrap();

        let queries = [
            [0.0, 0.0],
            [310.0, 125.0],
            [-50.0, 600.0],
            [123.456, -78.9],
            [700.0, 700.0],
        ];
        for query in queries {
            let (id, dist) = index.nearest(query);
            let expected = brute_force_nearest(&points, query);
            assert!(
                (dist - expected).abs() < 1e-9,
                "query {query:?}: got {dist}, expected {expected}"
            );
            let p = points[id];
            let direct = (p[0] - query[0]).hypot(p[1] - query[1]);
            assert!((direct - dist).abs() < 1e-9);
        }
    }

    #[test]
    fn equidistant_matches_return_true_minimum() {
        let points = [[0.0, 10.0], [0.0, -10.0], [10.0, 0.0], [-10.0, 0.0]];
        let index = ProximityIndex::build(&points).unwrap();
        let (_, dist) = index.nearest([0.0, 0.0]);
        assert!((dist - 10.0).abs() < 1e-12);
    }

    #[test]
    fn reports_size() {
        let index = ProximityIndex::build(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }
}
