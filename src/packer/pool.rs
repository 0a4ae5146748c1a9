use std::collections::BTreeMap;

use crate::error::StevedoreError;
use crate::packing::MaxRectsBin;

use super::BinFactory;

/// Bins and factories owned by one packing run.
///
/// Factories are keyed by a monotone counter in a `BTreeMap`, so iteration
/// follows insertion order and a depleted factory can be removed by key
/// without disturbing the rest. Bins index closed-then-open.
#[derive(Default)]
pub struct BinPool {
    closed: Vec<MaxRectsBin>,
    open: Vec<MaxRectsBin>,
    factories: BTreeMap<u64, BinFactory>,
    next_key: u64,
}

impl BinPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_factory(&mut self, factory: BinFactory) {
        self.factories.insert(self.next_key, factory);
        self.next_key += 1;
    }

    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    pub fn bin_count(&self) -> usize {
        self.closed.len() + self.open.len()
    }

    pub fn open_bins_mut(&mut self) -> &mut [MaxRectsBin] {
        &mut self.open
    }

    pub fn bins(&self) -> impl Iterator<Item = &MaxRectsBin> {
        self.closed.iter().chain(self.open.iter())
    }

    pub fn bin(&self, index: usize) -> Result<&MaxRectsBin, StevedoreError> {
        let len = self.bin_count();
        if index < self.closed.len() {
            Ok(&self.closed[index])
        } else if index < len {
            Ok(&self.open[index - self.closed.len()])
        } else {
            Err(StevedoreError::BinIndexOutOfRange { index, len })
        }
    }

    /// Produce a bin from the first factory whose empty surface can hold
    /// the item, in factory insertion order. Returns the new bin's index
    /// within the open list.
    pub fn open_new_bin(&mut self, width: u32, height: u32) -> Option<usize> {
        loop {
            let mut chosen = None;
            for (key, factory) in self.factories.iter_mut() {
                if factory.fits_surface(width, height) {
                    chosen = Some(*key);
                    break;
                }
            }
            let key = chosen?;

            let factory = self.factories.get_mut(&key)?;
            let produced = factory.new_bin();
            let depleted = factory.is_depleted();
            match produced {
                Some(bin) => {
                    if depleted {
                        self.factories.remove(&key);
                    }
                    self.open.push(bin);
                    return Some(self.open.len() - 1);
                }
                None => {
                    // A depleted factory that was never removed; drop it
                    // and keep scanning.
                    self.factories.remove(&key);
                }
            }
        }
    }

    /// Move every open bin to the closed list. Closed bins are kept for
    /// reporting but never consulted for placement again.
    pub fn close_open_bins(&mut self) {
        self.closed.append(&mut self.open);
    }

    /// Total cost of bins holding at least one item.
    pub fn total_cost(&self) -> u64 {
        self.bins().filter(|b| !b.is_empty()).map(|b| b.cost()).sum()
    }

    pub fn validate(&self) -> Result<(), StevedoreError> {
        for bin in self.bins() {
            bin.validate()?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.closed.clear();
        self.open.clear();
        self.factories.clear();
        self.next_key = 0;
    }
}
