//! Evaluate Bockstein differentials and beta family products on a dataset.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`. Results are printed to stdout, one per
//! line, or as JSON with `--json`.

use std::path::PathBuf;

use anyhow::Context as _;
use bockstein::{utils, BetaOperator, Context, LinComb, Operator};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bockstein")]
#[command(version, about = "Bockstein differentials in the 3-primary algebraic Novikov spectral sequence", long_about = None)]
struct Cli {
    /// Prefix of the dataset files, e.g. data/185 [default: data/185]
    #[arg(long, global = true, env = "BOCKSTEIN_DATA")]
    prefix: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// The Bockstein differential of a class, in algNSS names
    Delta {
        /// A Bockstein name
        gen: String,
    },

    /// Multiply by an element of the beta family
    Beta {
        /// One of beta1, beta2, beta33, beta4, beta5, beta63
        op: BetaOperator,

        /// A generator or a combination such as "x + 2 y"
        elt: LinComb,

        /// Apply the operator this many times
        #[arg(long, default_value = "1")]
        times: usize,
    },

    /// Multiply by alpha1
    Alpha1 { elt: LinComb },

    /// Multiply by 3
    Three { elt: LinComb },

    /// The degree of an algNSS generator
    Deg { name: String },

    /// The algNSS generators in the given stem and filtration
    InDeg { stem: i32, filtration: i32 },

    /// The entries that could not be inverted unambiguously
    Ambiguities,
}

fn print_lincomb(v: &LinComb, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string(v)?);
    } else {
        println!("{v}");
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.prefix.map(utils::Config::new).unwrap_or_default();
    let ctx: Context = config
        .load()
        .with_context(|| format!("Failed to load dataset {}", config.file_prefix.display()))?;

    match cli.command {
        Commands::Delta { gen } => print_lincomb(&ctx.delta().apply_to_generator(&gen)?, cli.json),
        Commands::Beta { op, elt, times } => {
            let v = ctx.beta(op)?.iterate(&elt, times)?;
            print_lincomb(&v, cli.json)
        }
        Commands::Alpha1 { elt } => {
            print_lincomb(&ctx.alpha1().apply_to_combination(&elt)?, cli.json)
        }
        Commands::Three { elt } => print_lincomb(&ctx.three().apply_to_combination(&elt)?, cli.json),
        Commands::Deg { name } => {
            let d = ctx
                .degrees()
                .get(&name)
                .with_context(|| format!("No degree recorded for {name}"))?;
            if cli.json {
                println!("{}", serde_json::to_string(&d)?);
            } else {
                println!("{d}");
            }
            Ok(())
        }
        Commands::InDeg { stem, filtration } => {
            let names = ctx.degrees().in_degree(stem, filtration);
            if cli.json {
                println!("{}", serde_json::to_string(&names)?);
            } else {
                for name in names {
                    println!("{name}");
                }
            }
            Ok(())
        }
        Commands::Ambiguities => {
            if cli.json {
                println!("{}", serde_json::to_string(ctx.ambiguities())?);
            } else {
                for a in ctx.ambiguities() {
                    println!("{a}");
                }
            }
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    utils::init_logging()?;
    run(Cli::parse())
}
