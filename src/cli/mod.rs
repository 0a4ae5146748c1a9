mod args;

pub use args::{
    BenchArgs, CliArgs, Command, CommonArgs, PackHeuristic, SolverArgs, SortOrder,
};
