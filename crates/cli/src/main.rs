//! parcelgrid CLI - pack parcel features into equal-area display clusters

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use parcelgrid_algorithms::packing::{
    annotate, pack_groups, parcels_from_collection, partition, CircleSizing, CircleSizingParams,
    PackingOutcome, RandomShuffle, RingGrid, RingGridParams,
};
use parcelgrid_core::io::{read_geojson, write_geojson, GeoJsonOptions};
use parcelgrid_core::vector::FeatureCollection;
use parcelgrid_core::{Algorithm, GeoCoord, PlanarPoint, ProjectionBridge};

use config::{Overrides, PackingConfig};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "parcelgrid")]
#[command(author, version, about = "Pack parcels into equal-area display clusters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign every parcel two display coordinates inside its group's cluster
    Pack {
        /// Input GeoJSON FeatureCollection
        input: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        /// JSON run configuration (fields, output names, groups, seed)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Multiplier on every cluster radius
        #[arg(short, long)]
        scale_factor: Option<f64>,
        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,
        /// Attribute holding parcel area
        #[arg(long)]
        area_field: Option<String>,
        /// Attribute holding the group label
        #[arg(long)]
        group_field: Option<String>,
        /// Attribute holding the feature id when GeoJSON `id` is absent
        #[arg(long)]
        id_field: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Show parcel counts and areas per group without packing
    Info {
        /// Input GeoJSON FeatureCollection
        input: PathBuf,
        /// JSON run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Convert one coordinate through the CONUS Albers projection
    Project {
        /// Longitude (or easting with --inverse)
        #[arg(allow_hyphen_values = true)]
        x: f64,
        /// Latitude (or northing with --inverse)
        #[arg(allow_hyphen_values = true)]
        y: f64,
        /// Planar metres to longitude/latitude
        #[arg(short, long)]
        inverse: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_features(path: &Path) -> Result<FeatureCollection> {
    let pb = spinner("Reading features...");
    let fc = read_geojson(path).with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} features", fc.len());
    Ok(fc)
}

fn write_features(fc: &FeatureCollection, path: &Path, pretty: bool) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geojson(fc, path, Some(GeoJsonOptions { pretty }))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(path: &Path, outcome: &PackingOutcome, elapsed: std::time::Duration) {
    println!("Packed features saved to: {}", path.display());
    for g in &outcome.groups {
        if g.skipped {
            println!("  {:<12} {:>7} parcels  skipped", g.name, g.feature_count);
        } else {
            println!(
                "  {:<12} {:>7} parcels  radius {:>10.1} m  grid {:>7}  padded {}",
                g.name, g.feature_count, g.radius, g.grid_len, g.padded
            );
        }
    }
    if !outcome.unassigned.is_empty() {
        println!("  {} parcels matched no group", outcome.unassigned.len());
    }
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Pack ─────────────────────────────────────────────────────
        Commands::Pack {
            input,
            output,
            config,
            scale_factor,
            seed,
            area_field,
            group_field,
            id_field,
            pretty,
        } => {
            let config = PackingConfig::resolve(
                config.as_deref(),
                Overrides {
                    scale_factor,
                    seed,
                    area_field,
                    group_field,
                    id_field,
                    pretty,
                },
            )?;
            let mut fc = read_features(&input)?;
            let parcels = parcels_from_collection(&fc, &config.fields)
                .context("Failed to read parcel attributes")?;

            let bridge = ProjectionBridge::conus_albers();
            let mut shuffler = match config.seed {
                Some(seed) => RandomShuffle::seeded(seed),
                None => RandomShuffle::from_entropy(),
            };

            let start = Instant::now();
            let outcome = pack_groups(&parcels, &config.packing, &bridge, &mut shuffler)
                .context("Failed to pack parcels")?;
            let written = annotate(&mut fc, &outcome, &config.fields, &config.output);
            let elapsed = start.elapsed();
            info!("Annotated {} of {} features", written, fc.len());

            write_features(&fc, &output, config.pretty)?;
            done(&output, &outcome, elapsed);
        }

        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input, config } => {
            let config = PackingConfig::resolve(config.as_deref(), Overrides::default())?;
            let fc = read_features(&input)?;
            let parcels = parcels_from_collection(&fc, &config.fields)
                .context("Failed to read parcel attributes")?;

            let mut labels: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
            for p in &parcels {
                let entry = labels.entry(p.group.as_str()).or_default();
                entry.0 += 1;
                entry.1 += p.area;
            }

            println!("File: {}", input.display());
            println!("Features: {}", fc.len());
            println!(
                "Fields: area '{}', group '{}'",
                config.fields.area_field, config.fields.group_field
            );
            println!("\nLabels:");
            for (label, (count, area)) in &labels {
                let label = if label.is_empty() { "(none)" } else { *label };
                println!("  {:<12} {:>7} parcels  {:>14.2} area", label, count, area);
            }

            let part = partition(&parcels, &config.packing.groups);
            println!("\nGroups:");
            for g in &part.groups {
                let area_m2 = g.total_area() * config.packing.area_to_square_meters;
                let radius = CircleSizing.execute(
                    area_m2,
                    CircleSizingParams {
                        scale_factor: config.packing.scale_factor,
                    },
                )?;
                let grid = RingGrid.execute(radius, RingGridParams { target_count: g.len() })?;
                println!(
                    "  {:<12} {:>7} parcels  {:>14.1} m²  radius {:>10.1} m  grid {:>7}",
                    g.spec.name,
                    g.len(),
                    area_m2,
                    radius,
                    grid.len()
                );
            }
            if !part.unassigned.is_empty() {
                println!("  {} parcels match no group", part.unassigned.len());
            }
        }

        // ── Project ──────────────────────────────────────────────────
        Commands::Project { x, y, inverse } => {
            let bridge = ProjectionBridge::conus_albers();
            if inverse {
                let c = bridge
                    .to_geographic(PlanarPoint::new(x, y))
                    .context("Inverse projection failed")?;
                println!("{:.8} {:.8}", c.lon, c.lat);
            } else {
                let p = bridge
                    .to_planar(GeoCoord::new(x, y))
                    .context("Forward projection failed")?;
                println!("{:.3} {:.3}", p.x, p.y);
            }
            info!("{} ({})", bridge.projection_name(), bridge.planar_crs());
        }
    }

    Ok(())
}
