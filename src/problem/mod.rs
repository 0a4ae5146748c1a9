mod loader;
mod types;

pub use loader::{load_problem, parse_problem};
pub use types::{BinSpec, ItemSpec, Problem};
