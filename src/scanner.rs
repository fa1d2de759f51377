use crate::error::{MiningError, Result};
use crate::eucs::Eucs;
use crate::item::{Item, LocalItem};
use crate::item_counter::ItemCounter;
use crate::itemizer::Itemizer;
use crate::taxonomy::Generalization;
use crate::transaction::Transaction;
use crate::utility_map::{Element, Tid, UtilityMap};
use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools;
use std::convert::TryFrom;
use tracing::{debug, info};

/// Everything the search needs to mine one taxonomy level.
#[derive(Debug)]
pub struct LevelData {
    /// 1 for roots, increasing toward the leaves.
    pub level: usize,
    pub itemizer: Itemizer,
    /// Utility map of local item `k` is at index `k - 1`.
    pub maps: Vec<UtilityMap>,
    pub eucs: Option<Eucs>,
}

impl LevelData {
    fn new(level: usize, itemizer: Itemizer, use_eucs: bool) -> LevelData {
        let maps = itemizer.local_items().map(UtilityMap::new).collect();
        LevelData {
            level,
            itemizer,
            maps,
            eucs: if use_eucs { Some(Eucs::new()) } else { None },
        }
    }

    pub fn map_of(&self, item: LocalItem) -> &UtilityMap {
        &self.maps[item.as_index()]
    }
}

pub struct ScanResult {
    pub gwu: ItemCounter,
    pub max_level: usize,
    /// Index `l - 1` holds level `l`.
    pub levels: Vec<LevelData>,
}

/// First pass: the GWU of every item and of every ancestor of an item,
/// each counted once per transaction. Returns the GWUs and the height of
/// the tallest ancestor chain seen.
pub fn compute_gwu<G: Generalization>(
    transactions: &[Transaction],
    generalization: &G,
) -> (ItemCounter, usize) {
    let mut gwu = ItemCounter::new();
    let mut max_level = 0;
    let mut seen: FnvHashSet<Item> = FnvHashSet::default();
    for transaction in transactions {
        seen.clear();
        for &item in transaction.items() {
            for ancestor in generalization.ancestors(item) {
                if seen.insert(ancestor) {
                    gwu.add(ancestor, transaction.utility());
                }
            }
            max_level = max_level.max(generalization.level(item));
        }
    }
    (gwu, max_level)
}

/// Groups the promising items by level and renames each group to local ids
/// in ascending GWU order.
pub fn promising_items_per_level<G: Generalization>(
    gwu: &ItemCounter,
    generalization: &G,
    max_level: usize,
    min_utility: f64,
) -> Vec<Itemizer> {
    let mut per_level: Vec<Vec<Item>> = vec![vec![]; max_level];
    for item in gwu.items_with_utility_at_least(min_utility) {
        let level = generalization.level(item);
        debug_assert!(level >= 1 && level <= max_level);
        per_level[level - 1].push(item);
    }
    per_level
        .iter_mut()
        .map(|items| {
            gwu.sort_ascending(items);
            Itemizer::from_sorted(items)
        })
        .collect()
}

/// Runs both passes over the transactions and builds, for every level, the
/// utility maps of its promising items and (optionally) its EUCS.
pub fn scan<G: Generalization>(
    transactions: &[Transaction],
    generalization: &G,
    min_utility: f64,
    use_eucs: bool,
) -> Result<ScanResult> {
    info!(transactions = transactions.len(), "first dataset scan");
    if let Some(last) = transactions.len().checked_sub(1) {
        tid_of(last)?;
    }
    let (gwu, max_level) = compute_gwu(transactions, generalization);

    let itemizers = promising_items_per_level(&gwu, generalization, max_level, min_utility);
    let mut levels: Vec<LevelData> = itemizers
        .into_iter()
        .enumerate()
        .map(|(index, itemizer)| LevelData::new(index + 1, itemizer, use_eucs))
        .collect();
    for data in &levels {
        debug!(level = data.level, promising = data.itemizer.len(), "promising items");
    }

    info!(levels = max_level, "second dataset scan, building utility maps");
    let mut rolled: FnvHashMap<Item, f64> = FnvHashMap::default();
    let mut revised: Vec<Vec<(LocalItem, f64)>> = vec![vec![]; max_level];
    for (tid, transaction) in transactions.iter().enumerate() {
        roll_up(transaction, generalization, &mut rolled);
        revise(&rolled, generalization, &levels, &mut revised);
        for (data, items) in levels.iter_mut().zip(revised.iter()) {
            if items.is_empty() {
                continue;
            }
            add_revised_transaction(data, tid_of(tid)?, items);
        }
    }

    Ok(ScanResult {
        gwu,
        max_level,
        levels,
    })
}

fn tid_of(index: usize) -> Result<Tid> {
    Tid::try_from(index).map_err(|_| MiningError::TooManyTransactions {
        count: index + 1,
        max: Tid::max_value() as usize + 1,
    })
}

/// Attributes each item's utility to itself and to every one of its
/// ancestors present through it.
fn roll_up<G: Generalization>(
    transaction: &Transaction,
    generalization: &G,
    rolled: &mut FnvHashMap<Item, f64>,
) {
    rolled.clear();
    for (item, utility) in transaction.iter() {
        for ancestor in generalization.ancestors(item) {
            *rolled.entry(ancestor).or_insert(0.0) += utility;
        }
    }
}

/// Splits rolled-up items into per-level revised transactions, dropping
/// unpromising items and sorting by local id.
fn revise<G: Generalization>(
    rolled: &FnvHashMap<Item, f64>,
    generalization: &G,
    levels: &[LevelData],
    revised: &mut [Vec<(LocalItem, f64)>],
) {
    for items in revised.iter_mut() {
        items.clear();
    }
    for (&item, &utility) in rolled {
        let level = generalization.level(item);
        if let Some(local) = levels[level - 1].itemizer.local_of(item) {
            revised[level - 1].push((local, utility));
        }
    }
    for items in revised.iter_mut() {
        items.sort_by_key(|&(local, _)| local);
    }
}

fn add_revised_transaction(data: &mut LevelData, tid: Tid, items: &[(LocalItem, f64)]) {
    // Walk from the largest local id down so each element's remaining
    // utility is the sum over the items after it.
    let mut remaining = 0.0;
    for &(local, utility) in items.iter().rev() {
        data.maps[local.as_index()].add_element(Element::new(tid, utility, remaining));
        remaining += utility;
    }

    if let Some(eucs) = data.eucs.as_mut() {
        let level_utility = remaining;
        for (&(a, _), &(b, _)) in items.iter().tuple_combinations() {
            eucs.add(a, b, level_utility);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Flat, Taxonomy};

    fn item(id: u32) -> Item {
        Item::with_id(id)
    }

    fn local(id: u32) -> LocalItem {
        LocalItem::with_id(id)
    }

    // T1 = {1:2, 2:3}, T2 = {1:4, 3:1}, T3 = {2:2, 3:3}; 1 and 2 generalize to 4.
    fn fixture() -> (Vec<Transaction>, Taxonomy) {
        let transactions = vec![
            Transaction::from_pairs(&[(1, 2.0), (2, 3.0)]),
            Transaction::from_pairs(&[(1, 4.0), (3, 1.0)]),
            Transaction::from_pairs(&[(2, 2.0), (3, 3.0)]),
        ];
        let taxonomy = Taxonomy::from_edges(&[(1, 4), (2, 4)]).unwrap();
        (transactions, taxonomy)
    }

    #[test]
    fn test_compute_gwu() {
        let (transactions, taxonomy) = fixture();
        let (gwu, max_level) = compute_gwu(&transactions, &taxonomy);
        assert_eq!(max_level, 2);
        assert_eq!(gwu.get(item(1)), Some(10.0));
        assert_eq!(gwu.get(item(2)), Some(10.0));
        assert_eq!(gwu.get(item(3)), Some(10.0));
        // Counted once per transaction even when both children occur.
        assert_eq!(gwu.get(item(4)), Some(15.0));
        assert_eq!(gwu.get(item(5)), None);
    }

    #[test]
    fn test_promising_items_per_level() {
        let transactions = vec![
            Transaction::from_pairs(&[(1, 2.0), (2, 3.0)]),
            Transaction::from_pairs(&[(1, 4.0), (3, 1.0)]),
            Transaction::from_pairs(&[(3, 3.0)]),
        ];
        let taxonomy = Taxonomy::from_edges(&[(1, 4), (2, 4)]).unwrap();
        let (gwu, max_level) = compute_gwu(&transactions, &taxonomy);
        let itemizers = promising_items_per_level(&gwu, &taxonomy, max_level, 6.0);
        // Level 1: 3 (GWU 8) before 4 (GWU 10). Level 2: 1 (GWU 10); 2 (GWU 5) pruned.
        assert_eq!(itemizers[0].local_of(item(3)), Some(local(1)));
        assert_eq!(itemizers[0].local_of(item(4)), Some(local(2)));
        assert_eq!(itemizers[1].len(), 1);
        assert_eq!(itemizers[1].local_of(item(1)), Some(local(1)));
        assert_eq!(itemizers[1].local_of(item(2)), None);
    }

    #[test]
    fn test_scan_builds_utility_maps() {
        let (transactions, taxonomy) = fixture();
        let result = scan(&transactions, &taxonomy, 6.0, true).unwrap();
        assert_eq!(result.levels.len(), 2);

        // Level 1: 3 -> 1, 4 -> 2.
        let level1 = &result.levels[0];
        assert_eq!(level1.level, 1);
        let m3 = level1.map_of(local(1));
        assert_eq!(m3.element(1), Some(&Element::new(1, 1.0, 4.0)));
        assert_eq!(m3.element(2), Some(&Element::new(2, 3.0, 2.0)));
        let m4 = level1.map_of(local(2));
        assert_eq!(m4.support(), 3);
        assert_eq!(m4.element(0), Some(&Element::new(0, 5.0, 0.0)));
        assert_eq!(m4.sum_iutils(), 11.0);
        let eucs = level1.eucs.as_ref().unwrap();
        assert_eq!(eucs.get(local(1), local(2)), Some(10.0));

        // Level 2: 1 -> 1, 2 -> 2 (equal GWU, raw id breaks the tie).
        let level2 = &result.levels[1];
        let m1 = level2.map_of(local(1));
        assert_eq!(m1.element(0), Some(&Element::new(0, 2.0, 3.0)));
        assert_eq!(m1.element(1), Some(&Element::new(1, 4.0, 0.0)));
        let m2 = level2.map_of(local(2));
        assert_eq!(m2.bound(), 5.0);
        let eucs = level2.eucs.as_ref().unwrap();
        assert_eq!(eucs.get(local(1), local(2)), Some(5.0));
        assert!(eucs.is_prunable(local(1), local(2), 6.0));
    }

    #[test]
    fn test_tid_of() {
        assert_eq!(tid_of(0).unwrap(), 0);
        assert_eq!(tid_of(Tid::max_value() as usize).unwrap(), Tid::max_value());
        match tid_of(Tid::max_value() as usize + 1) {
            Err(MiningError::TooManyTransactions { count, max }) => assert_eq!(count, max + 1),
            other => panic!("expected too many transactions, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_without_eucs() {
        let (transactions, taxonomy) = fixture();
        let result = scan(&transactions, &taxonomy, 6.0, false).unwrap();
        assert!(result.levels.iter().all(|level| level.eucs.is_none()));
    }

    #[test]
    fn test_remaining_utility_follows_local_order() {
        let transactions = vec![
            Transaction::from_pairs(&[(1, 1.0), (2, 2.0), (3, 3.0)]),
            Transaction::from_pairs(&[(3, 5.0)]),
        ];
        let result = scan(&transactions, &Flat, 0.0, true).unwrap();
        assert_eq!(result.max_level, 1);
        let level = &result.levels[0];
        // GWU: 1 -> 6, 2 -> 6, 3 -> 11, so local order is 1, 2, 3.
        assert_eq!(level.itemizer.local_of(item(3)), Some(local(3)));
        assert_eq!(level.map_of(local(1)).element(0), Some(&Element::new(0, 1.0, 5.0)));
        assert_eq!(level.map_of(local(2)).element(0), Some(&Element::new(0, 2.0, 3.0)));
        assert_eq!(level.map_of(local(3)).element(1), Some(&Element::new(1, 5.0, 0.0)));
        assert_eq!(level.map_of(local(3)).bound(), 8.0);
    }
}
