use std::cmp::Reverse;

use log::{debug, info, warn};

use crate::cli::{PackHeuristic, SortOrder};
use crate::error::StevedoreError;
use crate::packing::{MaxRectsBin, Placement};

use super::{BinFactory, BinPool, BinSelection, ItemRouter};

/// An item staged for packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingItem {
    pub width: u32,
    pub height: u32,
    pub rid: Option<u64>,
}

/// A bin type staged for packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBin {
    pub width: u32,
    pub height: u32,
    pub cost: u64,
    pub count: u32,
    pub bid: Option<u64>,
}

/// Offline orchestrator: stage items and bin types, then `pack()` routes
/// every item through the bin pool in sorted order.
///
/// Staged data survives `pack()`, so a caller whose items did not all fit
/// can add more bin types and pack again.
pub struct CostPacker {
    heuristic: PackHeuristic,
    sort: SortOrder,
    rotation: bool,
    router: Box<dyn ItemRouter>,
    pool: BinPool,
    pending_items: Vec<PendingItem>,
    pending_bins: Vec<PendingBin>,
    unplaced: Vec<PendingItem>,
}

impl CostPacker {
    pub fn new() -> Self {
        Self {
            heuristic: PackHeuristic::default(),
            sort: SortOrder::default(),
            rotation: true,
            router: BinSelection::default().router(),
            pool: BinPool::new(),
            pending_items: Vec::new(),
            pending_bins: Vec::new(),
            unplaced: Vec::new(),
        }
    }

    pub fn pack_algo(mut self, heuristic: PackHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn sort_algo(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn rotation(mut self, rotation: bool) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn bin_algo(mut self, selection: BinSelection) -> Self {
        self.router = selection.router();
        self
    }

    /// Stage an item. Dimensions must be positive.
    pub fn add_item(
        &mut self,
        width: u32,
        height: u32,
        rid: Option<u64>,
    ) -> Result<(), StevedoreError> {
        if width == 0 || height == 0 {
            return Err(StevedoreError::InvalidDimension {
                what: "item",
                width,
                height,
            });
        }
        self.pending_items.push(PendingItem { width, height, rid });
        Ok(())
    }

    /// Stage a bin type. Dimensions and cost must be positive.
    pub fn add_bin(
        &mut self,
        width: u32,
        height: u32,
        cost: u64,
        count: u32,
        bid: Option<u64>,
    ) -> Result<(), StevedoreError> {
        if width == 0 || height == 0 {
            return Err(StevedoreError::InvalidDimension {
                what: "bin",
                width,
                height,
            });
        }
        if cost == 0 {
            return Err(StevedoreError::InvalidCost);
        }
        self.pending_bins.push(PendingBin {
            width,
            height,
            cost,
            count,
            bid,
        });
        Ok(())
    }

    /// Pack all staged items into bins produced from the staged bin types.
    ///
    /// Bin types are installed in descending effectiveness order, items are
    /// fed in the configured sort order, and each item is routed by the
    /// configured bin selection strategy. With nothing staged on either
    /// side this resets state and returns without packing.
    pub fn pack(&mut self) {
        self.pool.reset();
        self.unplaced.clear();

        if self.pending_items.is_empty() || self.pending_bins.is_empty() {
            debug!(
                "nothing to pack: {} items, {} bin types staged",
                self.pending_items.len(),
                self.pending_bins.len()
            );
            return;
        }

        let total_item_area: u64 = self
            .pending_items
            .iter()
            .map(|i| u64::from(i.width) * u64::from(i.height))
            .sum();

        let mut ranked: Vec<(f64, PendingBin)> = self
            .pending_bins
            .iter()
            .map(|b| (effectiveness(b, total_item_area), *b))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, spec) in &ranked {
            if spec.count == 0 {
                continue;
            }
            self.pool.add_factory(BinFactory::new(
                spec.width,
                spec.height,
                spec.cost,
                spec.count,
                self.heuristic,
                self.rotation,
                spec.bid,
            ));
        }

        let mut items = self.pending_items.clone();
        match self.sort {
            SortOrder::Area => {
                items.sort_by_key(|i| Reverse(u64::from(i.width) * u64::from(i.height)));
            }
            SortOrder::None => {}
        }

        for item in items {
            match self
                .router
                .route(&mut self.pool, item.width, item.height, item.rid)
            {
                Some((bin_index, placement)) => {
                    debug!(
                        "item {:?} -> bin {} at ({}, {}){}",
                        item.rid,
                        bin_index,
                        placement.rect.x,
                        placement.rect.y,
                        if placement.rotated { " rotated" } else { "" }
                    );
                }
                None => {
                    warn!(
                        "no bin can hold item {:?} ({}x{})",
                        item.rid, item.width, item.height
                    );
                    self.unplaced.push(item);
                }
            }
        }

        let used = self.bins().filter(|b| !b.is_empty()).count();
        info!(
            "packed {} of {} items into {} bins (total cost {})",
            self.pending_items.len() - self.unplaced.len(),
            self.pending_items.len(),
            used,
            self.total_cost()
        );
    }

    /// All placements as `(bin_index, placement)`, bins in closed-then-open
    /// order, placements in the order they were committed.
    pub fn rect_list(&self) -> Vec<(usize, Placement)> {
        self.pool
            .bins()
            .enumerate()
            .flat_map(|(index, bin)| bin.placements().iter().map(move |p| (index, *p)))
            .collect()
    }

    /// Dimensions and identity of every bin holding at least one item.
    pub fn bin_list(&self) -> Vec<(u32, u32, Option<u64>)> {
        self.pool
            .bins()
            .filter(|b| !b.is_empty())
            .map(|b| (b.width(), b.height(), b.bid()))
            .collect()
    }

    pub fn bins(&self) -> impl Iterator<Item = &MaxRectsBin> {
        self.pool.bins()
    }

    pub fn bin(&self, index: usize) -> Result<&MaxRectsBin, StevedoreError> {
        self.pool.bin(index)
    }

    pub fn bin_count(&self) -> usize {
        self.pool.bin_count()
    }

    pub fn total_cost(&self) -> u64 {
        self.pool.total_cost()
    }

    /// Items the last `pack()` could not place anywhere.
    pub fn unplaced(&self) -> &[PendingItem] {
        &self.unplaced
    }

    /// Re-check containment and non-overlap across every bin.
    pub fn validate(&self) -> Result<(), StevedoreError> {
        self.pool.validate()
    }
}

impl Default for CostPacker {
    fn default() -> Self {
        Self::new()
    }
}

/// How much of the outstanding item mass a bin type can absorb per unit
/// cost, discounted when the bin is far larger than the remaining work.
fn effectiveness(spec: &PendingBin, total_item_area: u64) -> f64 {
    let area = u64::from(spec.width) * u64::from(spec.height);
    let fit_ratio = total_item_area.min(area) as f64 / area as f64;
    let cost_effectiveness = area as f64 / spec.cost as f64;
    fit_ratio * cost_effectiveness
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_item_is_rejected() {
        let mut packer = CostPacker::new();
        match packer.add_item(0, 5, None) {
            Err(StevedoreError::InvalidDimension { what: "item", .. }) => {}
            other => panic!("expected invalid-dimension error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_cost_bin_is_rejected() {
        let mut packer = CostPacker::new();
        assert!(matches!(
            packer.add_bin(5, 5, 0, 1, None),
            Err(StevedoreError::InvalidCost)
        ));
    }

    #[test]
    fn test_pack_without_bins_is_a_noop() {
        let mut packer = CostPacker::new();
        packer.add_item(3, 2, Some(1)).unwrap();
        packer.pack();

        assert_eq!(packer.bin_count(), 0);
        assert!(packer.rect_list().is_empty());
        assert!(packer.unplaced().is_empty());
    }

    #[test]
    fn test_effective_bin_type_is_installed_first() {
        // Two 5x5 items; a 5x5 bin at cost 10 scores 2.5, the 10x10 at
        // cost 15 scores 3.33, so the larger bin is consulted first and
        // absorbs both items.
        let mut packer = CostPacker::new();
        packer.add_item(5, 5, Some(1)).unwrap();
        packer.add_item(5, 5, Some(2)).unwrap();
        packer.add_bin(5, 5, 10, 1, Some(1)).unwrap();
        packer.add_bin(10, 10, 15, 1, Some(2)).unwrap();
        packer.pack();

        assert_eq!(packer.total_cost(), 15);
        assert_eq!(packer.bin_list(), vec![(10, 10, Some(2))]);
    }

    #[test]
    fn test_sort_none_preserves_insertion_order() {
        let mut packer = CostPacker::new()
            .sort_algo(SortOrder::None)
            .rotation(false);
        packer.add_item(1, 1, Some(1)).unwrap();
        packer.add_item(4, 4, Some(2)).unwrap();
        packer.add_bin(4, 4, 1, 2, Some(1)).unwrap();
        packer.pack();

        // The small item is placed first and fragments the first bin, so
        // the big one needs a second bin.
        let rids: Vec<_> = packer.rect_list().iter().map(|(_, p)| p.rid).collect();
        assert_eq!(rids, vec![Some(1), Some(2)]);
        assert_eq!(packer.bin_count(), 2);
    }

    #[test]
    fn test_sort_area_packs_largest_first() {
        let mut packer = CostPacker::new().rotation(false);
        packer.add_item(1, 1, Some(1)).unwrap();
        packer.add_item(4, 4, Some(2)).unwrap();
        packer.add_bin(4, 4, 1, 2, Some(1)).unwrap();
        packer.pack();

        let rids: Vec<_> = packer.rect_list().iter().map(|(_, p)| p.rid).collect();
        assert_eq!(rids, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_repack_after_adding_bins() {
        let mut packer = CostPacker::new();
        packer.add_item(6, 6, Some(1)).unwrap();
        packer.add_bin(5, 5, 1, 1, Some(1)).unwrap();
        packer.pack();
        assert_eq!(packer.unplaced().len(), 1);

        packer.add_bin(8, 8, 2, 1, Some(2)).unwrap();
        packer.pack();
        assert!(packer.unplaced().is_empty());
        assert_eq!(packer.total_cost(), 2);
    }

    #[test]
    fn test_bin_index_access() {
        let mut packer = CostPacker::new();
        packer.add_item(2, 2, Some(1)).unwrap();
        packer.add_bin(4, 4, 1, 1, Some(1)).unwrap();
        packer.pack();

        assert_eq!(packer.bin(0).unwrap().bid(), Some(1));
        assert!(matches!(
            packer.bin(3),
            Err(StevedoreError::BinIndexOutOfRange { index: 3, len: 1 })
        ));
    }
}
