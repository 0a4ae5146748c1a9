use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stevedore")]
#[command(version, about = "Cost-minimizing 2D bin packer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print one placement line per item
    Text(CommonArgs),
    /// Emit the full packing report as JSON
    Json(CommonArgs),
    /// Pack a batch of problem files and report cost and timing only
    Bench(BenchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Problem file to solve
    pub input: PathBuf,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub solver: SolverArgs,
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Problem files to solve
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub solver: SolverArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Placement heuristic used inside a single bin
    #[arg(long, value_enum, default_value = "best-short-side-fit")]
    pub pack_algo: PackHeuristic,

    /// Item ordering applied before packing
    #[arg(long, value_enum, default_value = "area")]
    pub sort_algo: SortOrder,

    /// Bin selection algorithm
    #[arg(long, default_value = "BFF")]
    pub bin_algo: String,

    /// Disable 90 degree item rotation
    #[arg(long)]
    pub no_rotation: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PackHeuristic {
    /// Best Short Side Fit - minimizes the shorter leftover side
    #[default]
    #[value(name = "best-short-side-fit")]
    BestShortSideFit,
    /// Best Long Side Fit - minimizes the longer leftover side
    #[value(name = "best-long-side-fit")]
    BestLongSideFit,
    /// Best Area Fit - picks the smallest free rectangle
    #[value(name = "best-area-fit")]
    BestAreaFit,
    /// Bottom Left - Tetris-style packing
    #[value(name = "bottom-left")]
    BottomLeft,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort items by area, largest first
    #[default]
    #[value(name = "area")]
    Area,
    /// Keep items in insertion order
    #[value(name = "none")]
    None,
}
