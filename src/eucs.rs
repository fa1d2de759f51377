use crate::item::LocalItem;
use fnv::FnvHashMap;

/// Estimated utility co-occurrence structure for one level: for each pair
/// of local items, the summed level-scoped transaction utility of the
/// transactions containing both.
#[derive(Clone, Debug, Default)]
pub struct Eucs {
    pairs: FnvHashMap<(LocalItem, LocalItem), f64>,
}

fn ordered(a: LocalItem, b: LocalItem) -> (LocalItem, LocalItem) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Eucs {
    pub fn new() -> Eucs {
        Eucs {
            pairs: FnvHashMap::default(),
        }
    }

    pub fn add(&mut self, a: LocalItem, b: LocalItem, utility: f64) {
        *self.pairs.entry(ordered(a, b)).or_insert(0.0) += utility;
    }

    pub fn get(&self, a: LocalItem, b: LocalItem) -> Option<f64> {
        self.pairs.get(&ordered(a, b)).cloned()
    }

    /// A pair that never co-occurs has no entry and is always prunable.
    pub fn is_prunable(&self, a: LocalItem, b: LocalItem, min_utility: f64) -> bool {
        match self.get(a, b) {
            Some(utility) => utility < min_utility,
            None => true,
        }
    }
}
