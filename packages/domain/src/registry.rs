//! Domain registry — loads all domain definitions from embedded TOML
//! configs.
//!
//! Each `.toml` file in `packages/domain/domains/` is baked into the
//! binary at compile time via [`include_str!`].

use crate::{DomainDefinition, parse_domain_toml};

/// TOML configs embedded at compile time, in merge precedence order:
/// the first-listed domain anchors the composite merge and wins
/// limiting-factor ties.
const DOMAIN_TOMLS: &[(&str, &str)] = &[
    ("transit", include_str!("../domains/transit.toml")),
    ("food", include_str!("../domains/food.toml")),
    (
        "essential_services",
        include_str!("../domains/essential_services.toml"),
    ),
];

/// Returns all configured domain definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn all_domains() -> Vec<DomainDefinition> {
    DOMAIN_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_domain_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a single domain by its `id`.
#[must_use]
pub fn find_domain(id: &str) -> Option<DomainDefinition> {
    all_domains().into_iter().find(|d| d.id == id)
}
