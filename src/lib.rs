pub mod cli;
pub mod error;
pub mod output;
pub mod packer;
pub mod packing;
pub mod problem;

pub use cli::{CliArgs, Command, PackHeuristic, SortOrder};
pub use error::StevedoreError;
pub use output::PackReport;
pub use packer::{BinSelection, CostPacker};
pub use packing::{MaxRectsBin, Placement, Point, Rect};
