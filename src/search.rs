// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Depth-first search for the closed high-utility itemsets of one level.
//!
//! A search node is a closed itemset with its utility map, a preset of
//! sibling items already branched on, and a postset of items that may still
//! extend it. Each candidate from the postset is joined in; the result is
//! dropped when its utility bound is too low, skipped when a preset item
//! covers all of its transactions (that sibling's branch already produced
//! the closure), and otherwise closed over every later postset item that
//! occurs in all of its transactions.
//!
//! Every candidate is appended to the preset after it has been processed,
//! whatever the outcome. The preset seen by candidate `k` of a node is
//! therefore the inherited preset plus postset items `0..k`, which lets the
//! top-level branches run in parallel with the same output as a sequential
//! loop.

use crate::eu_list::EUList;
use crate::eucs::Eucs;
use crate::item::LocalItem;
use crate::pattern::ClosedItemset;
use crate::scanner::LevelData;
use crate::utility_map::UtilityMap;
use rayon::prelude::*;
use std::borrow::Cow;

/// Closed itemsets of one level, still in local ids.
#[derive(Debug, Default)]
struct Found {
    itemsets: Vec<(Vec<LocalItem>, f64, usize)>,
    candidates: usize,
}

impl Found {
    fn merge(mut self, other: Found) -> Found {
        self.itemsets.extend(other.itemsets);
        self.candidates += other.candidates;
        self
    }
}

#[derive(Debug, Default)]
pub struct LevelOutcome {
    pub level: usize,
    pub itemsets: Vec<ClosedItemset>,
    /// Extensions that survived EUCS pruning and had their tidsets compared.
    pub candidates: usize,
}

pub struct ClosedSearch<'a> {
    data: &'a LevelData,
    eucs: Option<&'a Eucs>,
    min_utility: f64,
}

impl<'a> ClosedSearch<'a> {
    /// Uses the level's EUCS when the scan built one.
    pub fn new(data: &'a LevelData, min_utility: f64) -> ClosedSearch<'a> {
        ClosedSearch {
            data,
            eucs: data.eucs.as_ref(),
            min_utility,
        }
    }

    pub fn without_eucs(mut self) -> ClosedSearch<'a> {
        self.eucs = None;
        self
    }

    pub fn run(&self) -> LevelOutcome {
        let mut postset = EUList::new();
        postset.extend(self.data.maps.iter());

        let found = (0..postset.len())
            .into_par_iter()
            .map(|index| {
                let mut found = Found::default();
                self.extend(&[], None, &postset.prefix(index), &postset, index, &mut found);
                found
            })
            .reduce(Found::default, Found::merge);

        let itemizer = &self.data.itemizer;
        let itemsets = found
            .itemsets
            .into_iter()
            .map(|(items, utility, support)| ClosedItemset {
                level: self.data.level,
                items: itemizer.to_raw_vec(&items),
                utility,
                support,
            })
            .collect();
        LevelOutcome {
            level: self.data.level,
            itemsets,
            candidates: found.candidates,
        }
    }

    fn is_promising(&self, map: &UtilityMap) -> bool {
        // An empty tidset is not an itemset of the data, whatever its bound.
        map.support() > 0 && map.is_promising(self.min_utility)
    }

    fn search(
        &self,
        closed: &[LocalItem],
        closed_map: &UtilityMap,
        mut preset: EUList<'a>,
        postset: &EUList<'a>,
        found: &mut Found,
    ) {
        for index in 0..postset.len() {
            self.extend(closed, Some(closed_map), &preset, postset, index, found);
            preset.add(postset.get(index));
        }
    }

    fn extend(
        &self,
        closed: &[LocalItem],
        closed_map: Option<&UtilityMap>,
        preset: &EUList<'a>,
        postset: &EUList<'a>,
        index: usize,
        found: &mut Found,
    ) {
        let candidate = postset.get(index);
        let generator: Cow<UtilityMap> = match closed_map {
            None => Cow::Borrowed(candidate),
            Some(map) => match map.join(candidate, self.min_utility) {
                Some(joined) => Cow::Owned(joined),
                None => return,
            },
        };
        if !self.is_promising(&generator) || preset.subsumes(&generator) {
            return;
        }

        let mut closed_new: Vec<LocalItem> = closed.to_vec();
        closed_new.push(candidate.item());
        let mut closed_new_map = generator;
        let mut postset_new = EUList::new();

        for other in postset.iter() {
            if other.item() <= candidate.item() {
                continue;
            }
            if let Some(eucs) = self.eucs {
                if eucs.is_prunable(candidate.item(), other.item(), self.min_utility) {
                    continue;
                }
            }
            found.candidates += 1;
            // Absorbing an item that covers every transaction leaves the
            // tidset unchanged, so this test is the same against the
            // generator or the growing closure.
            if other.contains_all_tids(&closed_new_map) {
                match closed_new_map.join(other, self.min_utility) {
                    Some(joined) if self.is_promising(&joined) => {
                        closed_new.push(other.item());
                        closed_new_map = Cow::Owned(joined);
                    }
                    _ => return,
                }
            } else {
                postset_new.add(other);
            }
        }

        if closed_new_map.sum_iutils() >= self.min_utility {
            found.itemsets.push((
                closed_new.clone(),
                closed_new_map.sum_iutils(),
                closed_new_map.support(),
            ));
        }
        self.search(&closed_new, &closed_new_map, preset.clone(), &postset_new, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::scanner::scan;
    use crate::taxonomy::{Flat, Taxonomy};
    use crate::transaction::Transaction;

    fn sorted_results(outcome: &LevelOutcome) -> Vec<(Vec<u32>, f64, usize)> {
        let mut results: Vec<(Vec<u32>, f64, usize)> = outcome
            .itemsets
            .iter()
            .map(|itemset| {
                let mut items: Vec<u32> = itemset.items.iter().map(Item::id).collect();
                items.sort();
                (items, itemset.utility, itemset.support)
            })
            .collect();
        results.sort_by(|a, b| a.0.cmp(&b.0));
        results
    }

    fn scenario() -> (Vec<Transaction>, Taxonomy) {
        let transactions = vec![
            Transaction::from_pairs(&[(1, 2.0), (2, 3.0)]),
            Transaction::from_pairs(&[(1, 4.0), (3, 1.0)]),
            Transaction::from_pairs(&[(2, 2.0), (3, 3.0)]),
        ];
        let taxonomy = Taxonomy::from_edges(&[(1, 4), (2, 4)]).unwrap();
        (transactions, taxonomy)
    }

    #[test]
    fn test_taxonomy_levels() {
        let (transactions, taxonomy) = scenario();
        let scanned = scan(&transactions, &taxonomy, 6.0, true).unwrap();

        let level1 = ClosedSearch::new(&scanned.levels[0], 6.0).run();
        assert_eq!(
            sorted_results(&level1),
            vec![(vec![3, 4], 10.0, 2), (vec![4], 11.0, 3)]
        );

        let level2 = ClosedSearch::new(&scanned.levels[1], 6.0).run();
        assert_eq!(sorted_results(&level2), vec![(vec![1], 6.0, 2)]);
        assert!(level2.itemsets.iter().all(|itemset| itemset.level == 2));
    }

    #[test]
    fn test_eucs_only_changes_candidates() {
        let (transactions, taxonomy) = scenario();
        let scanned = scan(&transactions, &taxonomy, 6.0, true).unwrap();
        for data in &scanned.levels {
            let with = ClosedSearch::new(data, 6.0).run();
            let without = ClosedSearch::new(data, 6.0).without_eucs().run();
            assert_eq!(sorted_results(&with), sorted_results(&without));
            assert!(with.candidates <= without.candidates);
        }
    }

    #[test]
    fn test_closure_absorbs_covering_items() {
        // b always occurs with a, so {a} is not closed: only {a, b} and {b}
        // can appear.
        let transactions = vec![
            Transaction::from_pairs(&[(1, 1.0), (2, 1.0)]),
            Transaction::from_pairs(&[(1, 1.0), (2, 1.0)]),
            Transaction::from_pairs(&[(2, 5.0)]),
        ];
        let scanned = scan(&transactions, &Flat, 0.0, true).unwrap();
        let outcome = ClosedSearch::new(&scanned.levels[0], 0.0).run();
        assert_eq!(
            sorted_results(&outcome),
            vec![(vec![1, 2], 4.0, 2), (vec![2], 7.0, 3)]
        );
    }

    #[test]
    fn test_threshold_prunes_everything() {
        let (transactions, taxonomy) = scenario();
        let scanned = scan(&transactions, &taxonomy, 100.0, true).unwrap();
        for data in &scanned.levels {
            let outcome = ClosedSearch::new(data, 100.0).run();
            assert!(outcome.itemsets.is_empty());
            assert_eq!(outcome.candidates, 0);
        }
    }

    #[test]
    fn test_duplicate_generators_are_skipped() {
        // c occurs exactly where a and b occur together; the closure {a, b, c}
        // must be reported once.
        let transactions = vec![
            Transaction::from_pairs(&[(1, 1.0), (2, 1.0), (3, 1.0)]),
            Transaction::from_pairs(&[(1, 1.0), (2, 1.0), (3, 1.0)]),
            Transaction::from_pairs(&[(1, 1.0)]),
            Transaction::from_pairs(&[(2, 1.0)]),
        ];
        let scanned = scan(&transactions, &Flat, 0.0, false).unwrap();
        let outcome = ClosedSearch::new(&scanned.levels[0], 0.0).run();
        let results = sorted_results(&outcome);
        assert_eq!(
            results,
            vec![
                (vec![1], 3.0, 3),
                (vec![1, 2, 3], 6.0, 2),
                (vec![2], 3.0, 3),
            ]
        );
    }
}
