//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the primitive-polynomial kernel. The entry
//! point stays slim: argument parsing lives here, subcommand bodies live in
//! `cli.rs`.
//!
//! ## Subcommands
//!
//! - `test`: decide irreducibility and primitivity of one candidate
//!   polynomial, given in the `"a_n x^n + ... + a_0, p"` text form.
//! - `search`: enumerate trial polynomials of a given degree over `GF(p)`,
//!   printing each primitive one found.
//! - `factor`: factor an arbitrary non-negative integer.
//! - `count`: report the number of primitive polynomials of a given degree
//!   over `GF(p)`.
//!
//! ## Global Options
//!
//! - `--radix`: the `BigInt` digit radix (default `10^9`).
//! - `LOG_FORMAT=json`: structured JSON logs for machine consumption;
//!   human-readable otherwise.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "primpoly", about = "Test and enumerate primitive polynomials over GF(p)")]
struct Cli {
    /// BigInt digit radix (must be >= 2)
    #[arg(long, default_value_t = 1_000_000_000)]
    radix: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide irreducibility and primitivity of one polynomial
    Test {
        /// Polynomial in the form "x^4 + x^2 + 2 x + 3, 5"
        poly: String,
    },
    /// Enumerate primitive polynomials of degree n over GF(p)
    Search {
        /// Field characteristic (must be prime)
        #[arg(long)]
        p: u64,
        /// Polynomial degree
        #[arg(long)]
        n: usize,
        /// Stop after this many primitive polynomials are found (0 = unbounded)
        #[arg(long, default_value_t = 1)]
        limit: usize,
    },
    /// Factor an arbitrary non-negative integer
    Factor {
        /// The integer to factor, as a decimal string
        n: String,
        /// Factoring strategy
        #[arg(long, value_enum, default_value_t = FactorStrategy::Auto)]
        strategy: FactorStrategy,
        /// Table prime base, used with --strategy table or to seed --strategy auto
        #[arg(long)]
        table_p: Option<u64>,
        /// Table exponent, used with --strategy table or to seed --strategy auto
        #[arg(long)]
        table_m: Option<u32>,
    },
    /// Report the count of primitive polynomials of degree n over GF(p)
    Count {
        #[arg(long)]
        p: u64,
        #[arg(long)]
        n: usize,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum FactorStrategy {
    Auto,
    Trial,
    Rho,
    Table,
}

fn main() -> Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    primpoly::bigint::set_radix(cli.radix)?;

    match &cli.command {
        Commands::Test { poly } => cli::run_test(poly),
        Commands::Search { p, n, limit } => cli::run_search(*p, *n, *limit),
        Commands::Factor {
            n,
            strategy,
            table_p,
            table_m,
        } => cli::run_factor(n, *strategy, *table_p, *table_m),
        Commands::Count { p, n } => cli::run_count(*p, *n),
    }
}
