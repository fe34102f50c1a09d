use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tessera::core::forcefield::params::PotentialKind;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tessera Developers",
    version,
    about = "Tessera CLI - Evaluate bonded mesh potentials on triangulated surfaces and sample time-dependent simulation boxes.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate mesh forces, energies, and virials for one configuration.
    Evaluate(EvaluateArgs),
    /// Sample the simulation box of a box variant over a range of timesteps.
    Box(BoxArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Path to the run file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the timestep to evaluate at.
    #[arg(short, long, value_name = "INT")]
    pub timestep: Option<u64>,

    /// Write per-particle forces and energies to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Evaluate only this potential. Can be used multiple times.
    /// Example: --potential harmonic --potential area-conservation
    #[arg(short, long = "potential", value_name = "NAME")]
    pub potentials: Vec<PotentialKind>,

    /// Set a specific configuration value, overriding the run file.
    /// Can be used multiple times. Example: -S system.timestep=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `box` subcommand.
#[derive(Args, Debug)]
pub struct BoxArgs {
    /// Path to the run file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the first sampled timestep.
    #[arg(long, value_name = "INT")]
    pub first: Option<u64>,

    /// Override the last sampled timestep.
    #[arg(long, value_name = "INT")]
    pub last: Option<u64>,

    /// Override the sampling stride.
    #[arg(long, value_name = "INT")]
    pub stride: Option<u64>,

    /// Set a specific configuration value, overriding the run file.
    /// Can be used multiple times. Example: -S box-variant.t-ramp=1000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
