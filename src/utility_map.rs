use crate::item::LocalItem;
use fnv::FnvHashMap;

pub type Tid = u32;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Element {
    pub tid: Tid,
    /// Utility of the item or itemset in this transaction.
    pub iutils: f64,
    /// Utility of the items after it in the level's local order.
    pub rutils: f64,
}

impl Element {
    pub fn new(tid: Tid, iutils: f64, rutils: f64) -> Element {
        Element { tid, iutils, rutils }
    }
}

/// Transaction-indexed utilities of one item or itemset at one level, with
/// the running sums used for pruning. `item` is the last item joined in.
#[derive(Clone, Debug)]
pub struct UtilityMap {
    item: LocalItem,
    elements: FnvHashMap<Tid, Element>,
    sum_iutils: f64,
    sum_rutils: f64,
}

impl UtilityMap {
    pub fn new(item: LocalItem) -> UtilityMap {
        UtilityMap {
            item,
            elements: FnvHashMap::default(),
            sum_iutils: 0.0,
            sum_rutils: 0.0,
        }
    }

    pub fn add_element(&mut self, element: Element) {
        self.sum_iutils += element.iutils;
        self.sum_rutils += element.rutils;
        let previous = self.elements.insert(element.tid, element);
        debug_assert!(previous.is_none(), "tid {} added twice", element.tid);
    }

    pub fn item(&self) -> LocalItem {
        self.item
    }

    pub fn has_tid(&self, tid: Tid) -> bool {
        self.elements.contains_key(&tid)
    }

    pub fn element(&self, tid: Tid) -> Option<&Element> {
        self.elements.get(&tid)
    }

    pub fn support(&self) -> usize {
        self.elements.len()
    }

    pub fn sum_iutils(&self) -> f64 {
        self.sum_iutils
    }

    pub fn sum_rutils(&self) -> f64 {
        self.sum_rutils
    }

    /// Upper bound on the utility of this itemset and of every extension
    /// of it by items later in the local order.
    pub fn bound(&self) -> f64 {
        self.sum_iutils + self.sum_rutils
    }

    pub fn is_promising(&self, min_utility: f64) -> bool {
        self.bound() >= min_utility
    }

    /// True when every transaction of `other` is also one of ours.
    pub fn contains_all_tids(&self, other: &UtilityMap) -> bool {
        if self.support() < other.support() {
            return false;
        }
        other.elements.keys().all(|&tid| self.has_tid(tid))
    }

    /// Intersects this map with `other`, the map of a single item that comes
    /// later in the local order. Returns `None` as soon as the transactions
    /// left unmatched push the bound below `min_utility`.
    pub fn join(&self, other: &UtilityMap, min_utility: f64) -> Option<UtilityMap> {
        let mut joined = UtilityMap::new(other.item);
        let mut bound = self.bound();
        for ex in self.elements.values() {
            match other.element(ex.tid) {
                Some(ey) => {
                    // ey's utility was already part of ex's remaining utility.
                    joined.add_element(Element::new(
                        ex.tid,
                        ex.iutils + ey.iutils,
                        ex.rutils - ey.iutils,
                    ));
                }
                None => {
                    bound -= ex.iutils + ex.rutils;
                    if bound < min_utility {
                        return None;
                    }
                }
            }
        }
        Some(joined)
    }
}
