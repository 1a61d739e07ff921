//! mst - Minimum spanning trees with Prim's algorithm
//!
//! # Commands
//!
//! - `mst file <path>` - Print the MST of a graph read from an edge-list file
//! - `mst random <vertices> <density>` - Time every scheme on a random connected graph
//!
//! # Examples
//!
//! ```bash
//! # MST cost and edges using the decrease-key Fibonacci scheme
//! mst file graph.txt --scheme decrease-key
//!
//! # Compare all schemes on a 5000-vertex graph with 10% of all possible edges
//! mst random 5000 10 --seed 7
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`),
//! or `-v` for debug output.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fibonacci_prim::graph::Graph;
use fibonacci_prim::prim::{PrimDriver, Scheme};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Minimum spanning trees with Prim's algorithm over a Fibonacci heap
#[derive(Parser)]
#[command(name = "mst")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a graph from a file and print its MST
    File {
        /// Edge-list file: `<vertices> <edges>` then `<v1> <v2> <cost>` per edge
        path: PathBuf,

        /// Frontier scheme (array, decrease-key, lazy-insert)
        #[arg(short, long, default_value = "decrease-key")]
        scheme: Scheme,

        /// Vertex to grow the tree from
        #[arg(long, default_value_t = 0)]
        start: usize,
    },

    /// Generate a random connected graph and time every scheme on it
    Random {
        /// Number of vertices
        vertices: usize,

        /// Percentage of all possible edges to generate, in (0, 100]
        density: f64,

        /// Seed for reproducible graphs (default: from entropy)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_file(path: &Path, scheme: Scheme, start: usize) -> Result<()> {
    let graph = Graph::from_file(path)
        .with_context(|| format!("failed to load graph from {}", path.display()))?;
    if !graph.is_connected() {
        bail!("graph in {} is not connected", path.display());
    }

    let tree = PrimDriver::new(&graph).start(start).run(scheme)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "{}", tree.total_cost)?;
    for (source, dest) in &tree.edges {
        writeln!(out, "{source} {dest}")?;
    }
    out.flush()?;
    Ok(())
}

fn run_random(vertices: usize, density: f64, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let graph = Graph::random_connected(vertices, density, &mut rng)
        .context("failed to generate a random graph")?;
    info!(
        vertices,
        edges = graph.num_edges(),
        "graph generated"
    );
    println!("Graph generated");

    let mut costs = Vec::with_capacity(Scheme::ALL.len());
    for scheme in Scheme::ALL {
        let started = Instant::now();
        let tree = PrimDriver::new(&graph).run(scheme)?;
        let elapsed = started.elapsed();
        println!(
            "{:<14} {:>10.3} ms  (cost {}, {} stale discards)",
            format!("{scheme}:"),
            elapsed.as_secs_f64() * 1000.0,
            tree.total_cost,
            tree.stats.stale_discards,
        );
        costs.push((scheme, tree.total_cost));
    }

    if costs.windows(2).any(|pair| pair[0].1 != pair[1].1) {
        bail!("schemes disagree on the MST cost: {costs:?}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::File {
            path,
            scheme,
            start,
        } => run_file(&path, scheme, start),
        Commands::Random {
            vertices,
            density,
            seed,
        } => run_random(vertices, density, seed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
