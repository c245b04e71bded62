//! bandung — shortest driving route across a truncated Bandung road graph.
//!
//! Loads a road graph, cuts it down to the configured bounding box, snaps
//! the start and end coordinates to their nearest intersections, runs
//! Dijkstra on edge length, and writes the route plus the background
//! network as CSV or GeoJSON.
//!
//! ```text
//! cargo run -p bandung -- --config demos/bandung/config.json --format geojson
//! ```

mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use rr_output::{CsvWriter, GeoJsonWriter, RouteRenderer};
use rr_spatial::{DijkstraRouter, GraphStore, RoutePlanner, load_graph_csv};

use config::{OutputFormat, RouteConfig};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Node table (`id,lat,lon`).
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/nodes.csv"))]
    nodes: PathBuf,

    /// Directed edge table (`from,to,length_m,key,geometry`).
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/edges.csv"))]
    edges: PathBuf,

    /// OSM PBF extract; replaces `--nodes`/`--edges`.
    #[cfg(feature = "osm")]
    #[arg(long)]
    pbf: Option<PathBuf>,

    /// JSON route config; built-in Margaasih → UNIKOM request when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the config's `output_dir`.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Overrides the config's `format`.
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let mut cfg = match &cli.config {
        Some(path) => RouteConfig::load(path)?,
        None => RouteConfig::default(),
    };
    if let Some(dir) = cli.output_dir.clone() {
        cfg.output_dir = dir;
    }
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    debug!(?cfg, "resolved config");

    println!("=== bandung — {} → {} ===", cfg.start.name, cfg.end.name);

    // 1. Load the full graph.
    let t0 = Instant::now();
    let store = load_store(&cli)?;
    println!(
        "Full graph:      {} nodes, {} edges ({:.3} s)",
        store.node_count(),
        store.edge_count(),
        t0.elapsed().as_secs_f64()
    );

    // 2. Truncate and index.
    let bbox = cfg.bbox()?;
    let router = match cfg.deadline() {
        Some(d) => DijkstraRouter::new().with_deadline(d),
        None => DijkstraRouter::new(),
    };
    let planner = RoutePlanner::with_router(store, bbox, router)
        .with_context(|| format!("no nodes inside {bbox}"))?;
    println!("Truncated nodes: {}", planner.region().node_count());
    println!("Truncated edges: {}", planner.region().edge_count());

    // 3. Snap and route.
    let t1 = Instant::now();
    let planned = planner
        .plan(cfg.start.pos(), cfg.end.pos())
        .context("routing failed")?;
    info!(elapsed_ms = t1.elapsed().as_millis() as u64, "planned route");

    println!();
    println!(
        "{:<8} {:<14} {:>10}  {}",
        "", "Node", "Snap (m)", "Place"
    );
    println!("{}", "-".repeat(60));
    println!(
        "{:<8} {:<14} {:>10.1}  {}",
        "start", planned.start.node, planned.start.offset_m, cfg.start.name
    );
    println!(
        "{:<8} {:<14} {:>10.1}  {}",
        "end", planned.end.node, planned.end.offset_m, cfg.end.name
    );
    println!();

    let summary = &planned.summary;
    println!("Route: {} nodes, {} edges", summary.nodes().len(), summary.edges().len());
    println!(
        "Total distance: {:.2} m ({:.2} km)",
        summary.total_distance_m(),
        summary.total_distance_km()
    );

    // 4. Write.
    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;
    let mut writer: Box<dyn RouteRenderer> = match cfg.format {
        OutputFormat::Csv => Box::new(CsvWriter::new(&cfg.output_dir)?),
        OutputFormat::Geojson => Box::new(GeoJsonWriter::new(&cfg.output_dir.join("route.geojson"))),
    };
    writer.write_network(planner.region())?;
    writer.write_route(summary, planner.region())?;
    writer.finish()?;
    println!("Output written to {}", cfg.output_dir.display());

    Ok(())
}

#[cfg(feature = "osm")]
fn load_store(cli: &Cli) -> Result<GraphStore> {
    match &cli.pbf {
        Some(path) => rr_spatial::osm::load_from_pbf(path)
            .with_context(|| format!("loading {}", path.display())),
        None => load_csv(cli),
    }
}

#[cfg(not(feature = "osm"))]
fn load_store(cli: &Cli) -> Result<GraphStore> {
    load_csv(cli)
}

fn load_csv(cli: &Cli) -> Result<GraphStore> {
    load_graph_csv(&cli.nodes, &cli.edges).with_context(|| {
        format!("loading {} / {}", cli.nodes.display(), cli.edges.display())
    })
}
