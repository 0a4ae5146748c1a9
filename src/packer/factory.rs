use crate::cli::PackHeuristic;
use crate::packing::{MaxRectsBin, Score};

/// Template for one bin type, producing up to `count` identical bins.
///
/// Capacity questions are answered through a lazily built empty reference
/// bin, so probing never consumes the remaining count.
pub struct BinFactory {
    width: u32,
    height: u32,
    cost: u64,
    count: u32,
    heuristic: PackHeuristic,
    rotation: bool,
    bid: Option<u64>,
    ref_bin: Option<MaxRectsBin>,
}

impl BinFactory {
    pub fn new(
        width: u32,
        height: u32,
        cost: u64,
        count: u32,
        heuristic: PackHeuristic,
        rotation: bool,
        bid: Option<u64>,
    ) -> Self {
        Self {
            width,
            height,
            cost,
            count,
            heuristic,
            rotation,
            bid,
            ref_bin: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn is_depleted(&self) -> bool {
        self.count == 0
    }

    /// Factories order by cost, then surface area.
    pub fn sort_key(&self) -> (u64, u64) {
        (self.cost, u64::from(self.width) * u64::from(self.height))
    }

    /// Best score an empty bin of this type would give the item.
    pub fn fitness(&mut self, width: u32, height: u32) -> Option<Score> {
        self.reference().fitness(width, height)
    }

    /// True if the item fits an empty bin of this type at all.
    pub fn fits_surface(&mut self, width: u32, height: u32) -> bool {
        self.reference().fits_surface(width, height)
    }

    /// Produce a fresh empty bin, or `None` when the count is depleted.
    pub fn new_bin(&mut self) -> Option<MaxRectsBin> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;
        Some(self.create_bin())
    }

    fn reference(&mut self) -> &MaxRectsBin {
        if self.ref_bin.is_none() {
            self.ref_bin = Some(self.create_bin());
        }
        match self.ref_bin.as_ref() {
            Some(bin) => bin,
            // Populated just above.
            None => unreachable!(),
        }
    }

    fn create_bin(&self) -> MaxRectsBin {
        MaxRectsBin::new(
            self.width,
            self.height,
            self.cost,
            self.heuristic,
            self.rotation,
            self.bid,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(count: u32) -> BinFactory {
        BinFactory::new(10, 8, 5, count, PackHeuristic::BestShortSideFit, false, Some(1))
    }

    #[test]
    fn test_probing_does_not_consume_count() {
        let mut f = factory(1);

        assert!(f.fits_surface(10, 8));
        assert!(!f.fits_surface(11, 8));
        assert!(f.fitness(4, 4).is_some());

        assert!(f.new_bin().is_some());
        assert!(f.is_depleted());
        assert!(f.new_bin().is_none());
    }

    #[test]
    fn test_produced_bins_are_independent() {
        let mut f = factory(2);
        let mut a = f.new_bin().unwrap();
        let b = f.new_bin().unwrap();

        a.try_place(3, 3, Some(7)).unwrap();
        assert_eq!(a.placements().len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn test_sort_key_orders_by_cost_then_area() {
        let cheap_small = BinFactory::new(2, 2, 1, 1, PackHeuristic::BestShortSideFit, true, None);
        let cheap_big = BinFactory::new(4, 4, 1, 1, PackHeuristic::BestShortSideFit, true, None);
        let expensive = BinFactory::new(2, 2, 9, 1, PackHeuristic::BestShortSideFit, true, None);

        assert!(cheap_small.sort_key() < cheap_big.sort_key());
        assert!(cheap_big.sort_key() < expensive.sort_key());
    }
}
