#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI entry point for the access map toolchain.
//!
//! Drives the accessibility pipeline: fetch points of interest per
//! domain, score each domain against the neighbourhood polygons, and
//! merge the layers into the composite equity output. All paths and
//! parameters are explicit flags with Toronto-shaped defaults; nothing
//! reads from implicit working-directory state beyond those defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use access_map_domain::DomainDefinition;
use access_map_domain::registry::{all_domains, find_domain};
use access_map_fetch::Bbox;
use access_map_pipeline::PipelineConfig;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "access_map", about = "Neighbourhood accessibility scoring toolchain")]
struct Cli {
    /// Neighbourhood polygon GeoJSON source
    #[arg(long, default_value = "data/neighbourhoods.geojson")]
    neighbourhoods: PathBuf,

    /// Directory for fetched point sets
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Primary output directory
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Publication directory receiving unchanged copies of every output
    #[arg(long, default_value = "web/public")]
    publish_dir: PathBuf,

    /// Overpass interpreter endpoint
    #[arg(long, default_value = access_map_fetch::DEFAULT_ENDPOINT)]
    overpass_endpoint: String,

    /// Fetch bounding box as south,west,north,east (default: Toronto)
    #[arg(long, default_value = "43.55,-79.65,43.86,-79.10")]
    bbox: String,

    /// Merge weight override, repeatable (e.g. --weight Transit=2)
    #[arg(long = "weight", value_name = "DOMAIN=W")]
    weights: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch points of interest for one domain, or all
    Fetch {
        /// Domain id (e.g. `food`); all domains when omitted
        domain: Option<String>,
    },
    /// Score one domain, or all, against the neighbourhood polygons
    Score {
        /// Domain id (e.g. `food`); all domains when omitted
        domain: Option<String>,
    },
    /// Merge all domain layers into the composite equity output
    Merge,
    /// Fetch, score, and merge everything
    All,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = PipelineConfig {
        neighbourhoods_path: cli.neighbourhoods.clone(),
        data_dir: cli.data_dir.clone(),
        output_dir: cli.output_dir.clone(),
        publish_dir: cli.publish_dir.clone(),
        overpass_endpoint: cli.overpass_endpoint.clone(),
        bbox: parse_bbox(&cli.bbox)?,
        weights: parse_weights(&cli.weights)?,
    };

    match &cli.command {
        Commands::Fetch { domain } => {
            for domain in select_domains(domain.as_deref())? {
                access_map_pipeline::acquire::fetch_domain(&config, &domain).await?;
            }
        }
        Commands::Score { domain } => {
            for domain in select_domains(domain.as_deref())? {
                access_map_pipeline::score::score_domain(&config, &domain)?;
            }
        }
        Commands::Merge => {
            access_map_pipeline::merge::merge_domains(&config, &all_domains())?;
        }
        Commands::All => {
            let domains = all_domains();
            for domain in &domains {
                access_map_pipeline::acquire::fetch_domain(&config, domain).await?;
            }
            for domain in &domains {
                access_map_pipeline::score::score_domain(&config, domain)?;
            }
            access_map_pipeline::merge::merge_domains(&config, &domains)?;
            log::info!("Full pipeline complete");
        }
    }

    Ok(())
}

/// Resolves a domain id to its definition, or all domains when absent.
fn select_domains(id: Option<&str>) -> Result<Vec<DomainDefinition>, String> {
    match id {
        None => Ok(all_domains()),
        Some(id) => find_domain(id).map(|d| vec![d]).ok_or_else(|| {
            let known: Vec<String> = all_domains().into_iter().map(|d| d.id).collect();
            format!("Unknown domain \"{id}\" (known: {})", known.join(", "))
        }),
    }
}

/// Parses a `south,west,north,east` bounding box flag.
fn parse_bbox(text: &str) -> Result<Bbox, String> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid bbox \"{text}\": {e}"))?;
    let [south, west, north, east] = parts[..] else {
        return Err(format!(
            "Invalid bbox \"{text}\": expected south,west,north,east"
        ));
    };
    Ok(Bbox {
        south,
        west,
        north,
        east,
    })
}

/// Parses repeated `DOMAIN=WEIGHT` overrides into the weights map.
fn parse_weights(entries: &[String]) -> Result<BTreeMap<String, f64>, String> {
    let mut weights = BTreeMap::new();
    for entry in entries {
        let Some((domain, weight)) = entry.split_once('=') else {
            return Err(format!("Invalid weight \"{entry}\": expected DOMAIN=W"));
        };
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|e| format!("Invalid weight \"{entry}\": {e}"))?;
        weights.insert(domain.trim().to_string(), weight);
    }
    Ok(weights)
}
