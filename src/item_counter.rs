use crate::item::Item;
use fnv::FnvHashMap;
use ordered_float::OrderedFloat;

/// Accumulates the generalized weighted utility (GWU) of raw items. Items
/// that were never added have no entry at all, which is distinct from an
/// entry of zero.
pub struct ItemCounter {
    counter: FnvHashMap<Item, f64>,
}

impl ItemCounter {
    pub fn new() -> ItemCounter {
        ItemCounter {
            counter: FnvHashMap::default(),
        }
    }
    pub fn add(&mut self, item: Item, utility: f64) {
        *self.counter.entry(item).or_insert(0.0) += utility;
    }
    pub fn get(&self, item: Item) -> Option<f64> {
        self.counter.get(&item).cloned()
    }
    pub fn is_promising(&self, item: Item, min_utility: f64) -> bool {
        match self.get(item) {
            Some(gwu) => gwu >= min_utility,
            None => false,
        }
    }
    pub fn items_with_utility_at_least(&self, min_utility: f64) -> Vec<Item> {
        self.counter
            .iter()
            .filter(|&(_, &gwu)| gwu >= min_utility)
            .map(|(&item, _)| item)
            .collect()
    }
    /// Orders by ascending GWU, ties broken by ascending raw id.
    pub fn sort_ascending(&self, v: &mut Vec<Item>) {
        v.sort_by_key(|&item| (OrderedFloat(self.get(item).unwrap_or(0.0)), item));
    }
    pub fn len(&self) -> usize {
        self.counter.len()
    }
}
