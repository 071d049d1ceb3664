#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core data model types for the access map pipeline.
//!
//! Defines the neighbourhood and point-of-interest inputs, the per-domain
//! score layer entries, and the merged composite entries, plus the
//! normalization helpers that give those records their identity (the
//! neighbourhood join key and the coordinate dedup key).

use geo::{MultiPolygon, Point};

/// A residential neighbourhood read from the polygon source.
///
/// The boundary and representative point stay in geographic (WGS84)
/// coordinates; distance work projects the representative point on the fly.
/// Created once per run and never mutated.
#[derive(Debug, Clone)]
pub struct Neighbourhood {
    /// Name as given by the source, used for display and output.
    pub name: String,
    /// Polygon boundary in geographic coordinates.
    pub boundary: MultiPolygon<f64>,
    /// A point guaranteed to lie inside the boundary.
    pub representative: Point<f64>,
}

impl Neighbourhood {
    /// Returns the normalized join key for this neighbourhood.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// A single categorized point of interest (transit stop, food retailer,
/// essential service).
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    /// Source identifier (e.g., `"node/12345"`), when known.
    pub source_id: Option<String>,
    /// Category label (e.g., `"supermarket"`, `"hospital"`), when known.
    pub category: Option<String>,
    /// Point location in geographic coordinates.
    pub point: Point<f64>,
}

/// One neighbourhood's result for one score domain.
///
/// `distance_m` is `f64::INFINITY` when no point of interest exists; the
/// score transform maps that to 0.0 and serialization emits a null
/// distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerEntry {
    /// Planar distance to the nearest point of interest, in metres.
    pub distance_m: f64,
    /// Bounded score in `[0.0, 100.0]`.
    pub score: f64,
}

/// One domain's (possibly absent) contribution to a composite entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainScore {
    /// Domain display label (e.g., `"Transit"`).
    pub domain: String,
    /// The layer entry, absent when the neighbourhood is missing from
    /// that domain's layer.
    pub entry: Option<LayerEntry>,
}

/// The merged, multi-domain result for one neighbourhood.
///
/// `equity_score` is absent (never zero) when no domain has an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeEntry {
    /// Normalized neighbourhood name (the join key).
    pub name: String,
    /// Per-domain contributions, in first-listed domain order.
    pub domains: Vec<DomainScore>,
    /// Weighted composite score, absent when all domains are absent.
    pub equity_score: Option<f64>,
    /// Label of the lowest-scoring present domain, `"Unknown"` when none.
    pub limiting_factor: String,
}

/// Normalizes a neighbourhood name into its join key.
///
/// Case-folds, collapses internal whitespace to single spaces, and trims.
/// Upstream sources do not agree on casing or spacing, so every join in
/// the pipeline goes through this.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coordinate precision for point deduplication: 6 decimal places,
/// roughly 0.11 m at the equator. Collisions are intentional and are
/// treated as the same physical location.
const DEDUP_SCALE: f64 = 1e6;

/// Returns the dedup identity for a geographic coordinate pair.
///
/// Two points with the same key are collapsed to one entry (first seen
/// wins).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn dedup_key(lng: f64, lat: f64) -> (i64, i64) {
    (
        (lng * DEDUP_SCALE).round() as i64,
        (lat * DEDUP_SCALE).round() as i64,
    )
}
