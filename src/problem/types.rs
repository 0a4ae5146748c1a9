/// One rectangular item from a problem file. `rid` is 1-based file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub width: u32,
    pub height: u32,
    pub rid: u64,
}

/// One bin line from a problem file, quantity one. `bid` is 1-based file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinSpec {
    pub width: u32,
    pub height: u32,
    pub cost: u64,
    pub bid: u64,
}

/// A parsed packing problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    pub items: Vec<ItemSpec>,
    pub bins: Vec<BinSpec>,
}
