#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Distance-to-score normalization.
//!
//! Maps a raw planar distance in metres to a bounded score in
//! `[0.0, 100.0]` via a linear decay with a per-domain cutoff:
//!
//! ```text
//! score = round((1 - clamp(distance / cutoff, 0, 1)) * 100, 1)
//! ```
//!
//! The cutoff is a policy constant per domain (see the domain TOMLs),
//! never derived from data. Published scores are regression-tested, so
//! the transform must stay pure and reproducible.

/// Maps a distance in metres to a score in `[0.0, 100.0]`.
///
/// `distance_m <= 0` scores 100.0; `distance_m >= cutoff_m` (including
/// `f64::INFINITY`, the "no points of interest exist" case) scores 0.0.
/// Monotonically non-increasing in `distance_m`. `cutoff_m` must be
/// positive.
#[must_use]
pub fn score(distance_m: f64, cutoff_m: f64) -> f64 {
    let scaled = (distance_m / cutoff_m).clamp(0.0, 1.0);
    round1((1.0 - scaled) * 100.0)
}

/// Rounds to one decimal place, the numeric convention for both
/// published distances and scores.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
