#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Score layer storage and the multi-domain composite merge.
//!
//! One [`LayerStore`] holds one domain's `{distance, score}` results,
//! keyed by normalized neighbourhood name. [`merge`] joins multiple
//! stores with an explicit left-outer join anchored on the first-listed
//! domain, computes a weighted composite score, and derives the limiting
//! (lowest-scoring) domain per neighbourhood.
//!
//! The join key and join kind are explicit here rather than implicit in
//! any tabular structure: upstream sources do not agree on name casing
//! or spacing, so every lookup goes through
//! [`access_map_models::normalize_name`].

use std::collections::BTreeMap;

use access_map_models::{CompositeEntry, DomainScore, LayerEntry, normalize_name};

/// One domain's score layer: a named mapping from normalized
/// neighbourhood name to [`LayerEntry`].
///
/// A layer is produced wholesale by one proximity computation and never
/// mutated in place; a re-run replaces the whole store.
#[derive(Debug, Clone)]
pub struct LayerStore {
    domain: String,
    entries: BTreeMap<String, LayerEntry>,
}

impl LayerStore {
    /// Creates an empty layer for a domain display label (e.g.,
    /// `"Transit"`).
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Returns the domain display label.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Inserts an entry under the normalized form of `name`.
    pub fn insert(&mut self, name: &str, entry: LayerEntry) {
        self.entries.insert(normalize_name(name), entry);
    }

    /// Looks up an entry by already-normalized key.
    #[must_use]
    pub fn get(&self, normalized: &str) -> Option<&LayerEntry> {
        self.entries.get(normalized)
    }

    /// Iterates `(normalized_name, entry)` in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LayerEntry)> {
        self.entries.iter()
    }

    /// Number of neighbourhoods in this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layer holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Joins score layers into one composite entry per neighbourhood.
///
/// The join is a left-outer merge anchored on the first-listed layer:
/// that domain is the authoritative neighbourhood enumeration, and
/// neighbourhoods absent from other layers get absent (not zero)
/// entries for those domains. Neighbourhoods present only in non-anchor
/// layers are not emitted.
///
/// `weights` maps domain labels to relative weights; domains missing
/// from the map weigh 1.0, so an empty map means equal weights. For
/// each neighbourhood the weight sum is renormalized over the domains
/// actually present, so a neighbourhood missing one domain is scored
/// purely on the rest rather than being dragged toward zero.
#[must_use]
pub fn merge(layers: &[LayerStore], weights: &BTreeMap<String, f64>) -> Vec<CompositeEntry> {
    let Some(anchor) = layers.first() else {
        return Vec::new();
    };

    anchor
        .iter()
        .map(|(key, _)| {
            let domains: Vec<DomainScore> = layers
                .iter()
                .map(|layer| DomainScore {
                    domain: layer.domain.clone(),
                    entry: layer.get(key).copied(),
                })
                .collect();

            let contributions: Vec<(f64, Option<f64>)> = domains
                .iter()
                .map(|d| {
                    let weight = weights.get(&d.domain).copied().unwrap_or(1.0);
                    (weight, d.entry.map(|e| e.score))
                })
                .collect();
            let equity_score = composite_score(&contributions);

            let scores: Vec<(&str, Option<f64>)> = domains
                .iter()
                .map(|d| (d.domain.as_str(), d.entry.map(|e| e.score)))
                .collect();
            let limiting_factor = limiting_domain(&scores).to_string();

            CompositeEntry {
                name: key.clone(),
                domains,
                equity_score,
                limiting_factor,
            }
        })
        .collect()
}

/// Weighted mean over the present contributions, renormalized to the
/// weights of the domains actually present. `None` when nothing is
/// present — an unknown composite is propagated as missing, never as
/// zero.
#[must_use]
pub fn composite_score(contributions: &[(f64, Option<f64>)]) -> Option<f64> {
    let mut weight_sum = 0.0;
    let mut total = 0.0;
    for (weight, score) in contributions {
        if let Some(score) = score {
            weight_sum += weight;
            total += weight * score;
        }
    }
    (weight_sum > 0.0).then(|| access_map_scoring::round1(total / weight_sum))
}

/// Returns the label of the lowest-scoring present domain.
///
/// Ties break toward the first-listed domain. `"Unknown"` only when no
/// domain has a score.
#[must_use]
pub fn limiting_domain<'a>(scores: &[(&'a str, Option<f64>)]) -> &'a str {
    let mut best: Option<(&str, f64)> = None;
    for (domain, score) in scores {
        if let Some(score) = score {
            // Strict less-than keeps the first-listed domain on ties.
            if best.is_none_or(|(_, b)| *score < b) {
                best = Some((domain, *score));
            }
        }
    }
    best.map_or("Unknown", |(domain, _)| domain)
}
