use serde::Serialize;

use crate::packer::CostPacker;

/// Where one item ended up.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PlacementRecord {
    /// Caller-supplied item id; items staged without one keep a null id.
    pub rid: Option<u64>,
    pub bid: u64,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

/// One used bin.
#[derive(Debug, Clone, Serialize)]
pub struct BinRecord {
    pub bid: u64,
    pub width: u32,
    pub height: u32,
    pub cost: u64,
    pub items: usize,
    pub occupancy: f64,
}

/// Full result of one packing run.
#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    pub total_cost: u64,
    pub bins: Vec<BinRecord>,
    pub placements: Vec<PlacementRecord>,
    /// Ids of items no bin could hold.
    pub unplaced: Vec<u64>,
}

impl PackReport {
    pub fn from_packer(packer: &CostPacker) -> Self {
        let mut bins = Vec::new();
        let mut placements = Vec::new();

        for (index, bin) in packer.bins().enumerate() {
            if bin.is_empty() {
                continue;
            }
            // Bins created programmatically without an id fall back to
            // their 1-based pool position.
            let bid = bin.bid().unwrap_or(index as u64 + 1);
            bins.push(BinRecord {
                bid,
                width: bin.width(),
                height: bin.height(),
                cost: bin.cost(),
                items: bin.placements().len(),
                occupancy: bin.occupancy(),
            });
            for placement in bin.placements() {
                placements.push(PlacementRecord {
                    rid: placement.rid,
                    bid,
                    x: placement.rect.x,
                    y: placement.rect.y,
                    rotated: placement.rotated,
                });
            }
        }

        placements.sort_by_key(|p| (p.rid.is_none(), p.rid));

        let unplaced = packer.unplaced().iter().filter_map(|i| i.rid).collect();

        Self {
            total_cost: packer.total_cost(),
            bins,
            placements,
            unplaced,
        }
    }
}
