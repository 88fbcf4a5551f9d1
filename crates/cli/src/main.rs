use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polycover::data::{
    coverage_set_from_data, parse_point, CircuitPolytopeData, HopData, PolytopeData,
};
use polycover::paths::{decompose, CircuitPolytope, DecomposeCfg, Hop, PathError};
use polycover::{ExactBackend, Polytope, Rational};
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "polycover")]
#[command(about = "Exact polytope unions and backward path decomposition")]
struct Cmd {
    /// Emit debug-level events (selected covers, hops)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the volume of a union read from JSON
    Volume {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write an irredundant form of a union, plus provenance
    Reduce {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Decompose a target point into a hop chain, plus provenance
    Decompose {
        #[arg(long)]
        coverage: PathBuf,
        #[arg(long)]
        lifted: PathBuf,
        /// Target coordinates, comma separated rationals (e.g. 1/2,0,3)
        #[arg(long, value_delimiter = ',', required = true)]
        target: Vec<String>,
        /// Extra attempts after a failed backsolution
        #[arg(long, default_value_t = 5)]
        retries: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = DecomposeCfg::default().free_coordinates)]
        free_coordinates: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Volume { input } => volume(&input),
        Action::Reduce { input, out } => reduce(&input, &out),
        Action::Decompose {
            coverage,
            lifted,
            target,
            retries,
            seed,
            free_coordinates,
            out,
        } => run_decompose(
            &coverage,
            &lifted,
            &target,
            Retry { retries, seed },
            DecomposeCfg { free_coordinates },
            &out,
        ),
        Action::Report => report(),
    }
}

fn read_polytope(input: &Path) -> Result<Polytope> {
    let data: PolytopeData = io::read_json(input)?;
    Polytope::try_from(&data).with_context(|| format!("decoding {}", input.display()))
}

fn read_coverage(input: &Path) -> Result<Vec<CircuitPolytope<String>>> {
    let data: Vec<CircuitPolytopeData> = io::read_json(input)?;
    coverage_set_from_data(&data).with_context(|| format!("decoding {}", input.display()))
}

fn volume(input: &Path) -> Result<()> {
    let polytope = read_polytope(input)?;
    let volume = polytope.volume(&ExactBackend)?;
    tracing::info!(components = polytope.convex_subpolytopes().len(), "volume");
    println!("{volume}");
    Ok(())
}

fn reduce(input: &Path, out: &Path) -> Result<()> {
    let polytope = read_polytope(input)?;
    let reduced = polytope.reduce(&ExactBackend)?;
    let before = polytope.convex_subpolytopes().len();
    let after = reduced.convex_subpolytopes().len();
    tracing::info!(before, after, "reduce");
    io::write_json(out, &PolytopeData::from(&reduced))?;
    let params = serde_json::json!({
        "components_before": before,
        "components_after": after
    });
    let payload = Payload::new("reduce", params).with_input(input);
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

/// Attempt budget for the decomposition search.
#[derive(Clone, Copy, Debug)]
struct Retry {
    retries: u64,
    seed: u64,
}

/// Successful search plus the number of attempts it took.
struct Attempted {
    hops: Vec<Hop<String>>,
    attempts: u64,
}

/// Run the whole search again with a fresh RNG (`seed + attempt`) whenever it
/// fails with a retryable error; other failures return at once.
fn decompose_with_retries(
    target: &[Rational],
    coverage: &[CircuitPolytope<String>],
    lifted: &[CircuitPolytope<String>],
    retry: Retry,
    cfg: DecomposeCfg,
) -> Result<Attempted, PathError> {
    let mut attempt = 0;
    loop {
        let mut rng = StdRng::seed_from_u64(retry.seed.wrapping_add(attempt));
        match decompose(target, coverage, lifted, &ExactBackend, &mut rng, cfg) {
            Ok(hops) => {
                return Ok(Attempted {
                    hops,
                    attempts: attempt + 1,
                });
            }
            Err(err) if err.is_retryable() && attempt < retry.retries => {
                tracing::warn!(attempt, %err, "decomposition attempt failed; retrying");
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn run_decompose(
    coverage_path: &Path,
    lifted_path: &Path,
    target: &[String],
    retry: Retry,
    cfg: DecomposeCfg,
    out: &Path,
) -> Result<()> {
    let coverage = read_coverage(coverage_path)?;
    let lifted = read_coverage(lifted_path)?;
    let point = parse_point(target).context("parsing --target")?;
    let result = decompose_with_retries(&point, &coverage, &lifted, retry, cfg)
        .with_context(|| format!("decomposing ({})", target.join(", ")))?;
    tracing::info!(
        hops = result.hops.len(),
        attempts = result.attempts,
        "decompose"
    );

    let records: Vec<HopData> = result.hops.iter().map(HopData::from).collect();
    io::write_json(out, &records)?;
    let params = serde_json::json!({
        "target": target,
        "seed": retry.seed,
        "retries": retry.retries,
        "attempts": result.attempts,
        "free_coordinates": cfg.free_coordinates
    });
    let payload = Payload::new("decompose", params)
        .with_input(coverage_path)
        .with_input(lifted_path);
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::block(serde_json::json!({}));
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
