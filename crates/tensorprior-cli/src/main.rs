//! Command-line driver for the structured tensor samplers.
//!
//! Usage: `tensorprior <command>`; set `RUST_LOG=debug` to follow the basis
//! construction.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tensorprior::{
    basis_with, constraint_residual, sample_with, ConstraintFamily, NullspaceOptions, Sample,
    SamplerOptions, Symmetry, TriangularOptions,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tensorprior", about = "Sample random tensors with linear structure")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw one tensor and print it with its constraint residual
    Sample {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Seed for the random number generator (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        tolerances: ToleranceArgs,
    },
    /// Build the family's basis matrix and print its shape
    Basis {
        #[command(flatten)]
        shape: ShapeArgs,
        #[command(flatten)]
        tolerances: ToleranceArgs,
    },
    /// Read "D J" lines from stdin and draw a new tensor for each
    Watch {
        /// Constraint family
        #[arg(long, value_enum)]
        family: FamilyArg,
        /// Seed for the random number generator (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        tolerances: ToleranceArgs,
    },
}

#[derive(Args)]
struct ShapeArgs {
    /// Constraint family
    #[arg(long, value_enum)]
    family: FamilyArg,
    /// Tensor order D
    #[arg(long, short = 'd')]
    order: usize,
    /// Dimension J of every mode
    #[arg(long, short = 'j')]
    dim: usize,
}

#[derive(Args)]
struct ToleranceArgs {
    /// Relative rank cutoff for nullspace computations (triangular)
    #[arg(long)]
    rtol: Option<f64>,
    /// Basis entries below this magnitude are zeroed (triangular)
    #[arg(long)]
    cleanup_tol: Option<f64>,
}

impl ToleranceArgs {
    fn options(&self) -> SamplerOptions {
        SamplerOptions {
            triangular: TriangularOptions {
                nullspace: NullspaceOptions { rtol: self.rtol },
                cleanup_tol: self.cleanup_tol,
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    Triangular,
    FixedSum,
    Symmetric,
    Hankel,
}

impl From<FamilyArg> for ConstraintFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Triangular => ConstraintFamily::Triangular,
            FamilyArg::FixedSum => ConstraintFamily::FixedSum,
            FamilyArg::Symmetric => ConstraintFamily::PermutationInvariant(Symmetry::Symmetric),
            FamilyArg::Hankel => ConstraintFamily::PermutationInvariant(Symmetry::Hankel),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample {
            shape,
            seed,
            tolerances,
        } => cmd_sample(&shape, seed, &tolerances.options()),
        Commands::Basis { shape, tolerances } => cmd_basis(&shape, &tolerances.options()),
        Commands::Watch {
            family,
            seed,
            tolerances,
        } => cmd_watch(family.into(), seed, &tolerances.options()),
    }
}

fn make_rng(seed: Option<u64>) -> (u64, ChaCha8Rng) {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    (seed, ChaCha8Rng::seed_from_u64(seed))
}

fn cmd_sample(shape: &ShapeArgs, seed: Option<u64>, options: &SamplerOptions) -> Result<()> {
    let family = ConstraintFamily::from(shape.family);
    let (seed, mut rng) = make_rng(seed);
    info!(%family, order = shape.order, dim = shape.dim, seed, "sampling");

    let sample = sample_with(family, shape.order, shape.dim, options, &mut rng)
        .with_context(|| format!("Failed to sample {family} tensor"))?;

    let mut out = io::stdout().lock();
    print_sample(&mut out, &sample)?;
    writeln!(out, "seed: {seed}")?;
    Ok(())
}

fn cmd_basis(shape: &ShapeArgs, options: &SamplerOptions) -> Result<()> {
    let family = ConstraintFamily::from(shape.family);
    let v = basis_with(family, shape.order, shape.dim, options)
        .with_context(|| format!("Failed to build {family} basis"))?;
    println!(
        "{family} basis for order {} dimension {}: {} × {}",
        shape.order,
        shape.dim,
        v.nrows(),
        v.ncols()
    );
    Ok(())
}

fn cmd_watch(family: ConstraintFamily, seed: Option<u64>, options: &SamplerOptions) -> Result<()> {
    let (seed, mut rng) = make_rng(seed);
    info!(%family, seed, "watching stdin for \"D J\" lines");

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" || line == "quit" {
            break;
        }

        let (order, dim) = match parse_shape(line) {
            Ok(shape) => shape,
            Err(err) => {
                warn!("skipping line {line:?}");
                writeln!(out, "error: {err:#}")?;
                continue;
            }
        };

        match sample_with(family, order, dim, options, &mut rng) {
            Ok(sample) => print_sample(&mut out, &sample)?,
            Err(err) => writeln!(out, "error: {err}")?,
        }
        out.flush()?;
    }
    Ok(())
}

fn parse_shape(line: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [order, dim] = fields.as_slice() else {
        bail!("expected two integers \"D J\", got {} fields", fields.len());
    };
    let order = order
        .parse::<usize>()
        .with_context(|| format!("Invalid order {order:?}"))?;
    let dim = dim
        .parse::<usize>()
        .with_context(|| format!("Invalid dimension {dim:?}"))?;
    Ok((order, dim))
}

fn print_sample(out: &mut impl Write, sample: &Sample) -> Result<()> {
    write!(out, "{}", sample.tensor)?;
    if let Some(marginal) = &sample.marginal {
        writeln!(out, "marginal (sum over last axis):")?;
        write!(out, "{marginal}")?;
    }
    let residual = constraint_residual(sample.family, &sample.tensor)?;
    writeln!(out, "{} residual: {residual:.3e}", sample.family)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape("3 4").unwrap(), (3, 4));
        assert_eq!(parse_shape("  2\t5 ").unwrap(), (2, 5));
        assert!(parse_shape("3").is_err());
        assert!(parse_shape("3 4 5").is_err());
        assert!(parse_shape("three 4").is_err());
    }

    #[test]
    fn test_family_arg_mapping() {
        assert_eq!(
            ConstraintFamily::from(FamilyArg::Hankel),
            ConstraintFamily::PermutationInvariant(Symmetry::Hankel)
        );
        assert_eq!(ConstraintFamily::from(FamilyArg::FixedSum).to_string(), "fixed-sum");
    }

    #[test]
    fn test_cli_parses_sample() {
        let cli = Cli::try_parse_from([
            "tensorprior",
            "sample",
            "--family",
            "fixed-sum",
            "--order",
            "3",
            "--dim",
            "5",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Sample { shape, seed, .. } => {
                assert_eq!((shape.order, shape.dim), (3, 5));
                assert_eq!(seed, Some(7));
            }
            _ => panic!("expected sample command"),
        }
    }

    #[test]
    fn test_print_sample_reports_residual() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sample = sample_with(
            ConstraintFamily::FixedSum,
            2,
            5,
            &SamplerOptions::default(),
            &mut rng,
        )
        .unwrap();
        let mut buf = Vec::new();
        print_sample(&mut buf, &sample).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("5×5 Tensor"));
        assert!(text.contains("marginal"));
        assert!(text.contains("fixed-sum residual"));
    }
}
