#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Score domain definitions for the access map pipeline.
//!
//! Each domain (transit, food, essential services) is defined by a TOML
//! file embedded at compile time: its attribute prefix, its cutoff
//! distance (a policy constant, never derived from data), and the
//! Overpass query used to fetch its points of interest. Adding a new
//! domain is as simple as creating a new TOML file and adding it to the
//! registry list.

pub mod registry;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when parsing a domain definition.
#[derive(Debug, Error)]
pub enum DomainError {
    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A score domain definition, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainDefinition {
    /// Unique domain identifier (e.g., `"food"`), used in file names.
    pub id: String,
    /// Display label (e.g., `"Food"`), used as the limiting-factor tag.
    pub label: String,
    /// Output attribute prefix: the layer writes `{prefix}_score` and
    /// `{prefix}_dist_m`.
    pub prefix: String,
    /// Distance beyond which the score floors to zero, in metres.
    pub cutoff_m: f64,
    /// Overpass fetch configuration.
    pub overpass: OverpassConfig,
}

/// How to fetch a domain's points of interest from Overpass.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassConfig {
    /// Overpass QL query with a `{{bbox}}` placeholder for the region's
    /// `south,west,north,east` bounds.
    pub query: String,
    /// Tag keys to try, in order, when extracting each element's
    /// category label.
    pub category_tags: Vec<String>,
}

/// Parses a domain definition from TOML text.
///
/// # Errors
///
/// Returns [`DomainError::Toml`] if the text is not a valid definition.
pub fn parse_domain_toml(text: &str) -> Result<DomainDefinition, DomainError> {
    Ok(toml::from_str(text)?)
}
