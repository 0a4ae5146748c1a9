use std::str::FromStr;

use crate::error::StevedoreError;
use crate::packing::Placement;

use super::BinPool;

/// Strategy deciding which bin receives each item.
///
/// Implementations may open new bins through the pool; they must not close
/// or reorder existing open bins. The returned index counts closed bins
/// first, then open bins.
pub trait ItemRouter {
    fn route(
        &self,
        pool: &mut BinPool,
        width: u32,
        height: u32,
        rid: Option<u64>,
    ) -> Option<(usize, Placement)>;
}

/// Bin First Fit: reuse the first open bin that accepts the item before
/// paying for a new one.
pub struct BinFirstFit;

impl ItemRouter for BinFirstFit {
    fn route(
        &self,
        pool: &mut BinPool,
        width: u32,
        height: u32,
        rid: Option<u64>,
    ) -> Option<(usize, Placement)> {
        let closed = pool.closed_count();

        for (i, bin) in pool.open_bins_mut().iter_mut().enumerate() {
            if let Some(placement) = bin.try_place(width, height, rid) {
                return Some((closed + i, placement));
            }
        }

        loop {
            let index = pool.open_new_bin(width, height)?;
            // The surface probe is necessary but not sufficient, so a fresh
            // bin may still reject the item; ask for another one.
            if let Some(placement) = pool.open_bins_mut()[index].try_place(width, height, rid) {
                return Some((closed + index, placement));
            }
        }
    }
}

/// Recognized bin selection algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BinSelection {
    /// Bin First Fit
    #[default]
    FirstFit,
}

impl BinSelection {
    pub fn router(&self) -> Box<dyn ItemRouter> {
        match self {
            BinSelection::FirstFit => Box::new(BinFirstFit),
        }
    }
}

impl FromStr for BinSelection {
    type Err = StevedoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BFF" => Ok(BinSelection::FirstFit),
            _ => Err(StevedoreError::UnknownBinAlgo(s.to_string())),
        }
    }
}
