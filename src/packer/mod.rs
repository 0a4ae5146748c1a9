mod factory;
mod offline;
mod pool;
mod router;

pub use factory::BinFactory;
pub use offline::{CostPacker, PendingBin, PendingItem};
pub use pool::BinPool;
pub use router::{BinFirstFit, BinSelection, ItemRouter};
