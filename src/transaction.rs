use crate::error::{MiningError, Result};
use crate::item::Item;
use crate::taxonomy::Generalization;
use fnv::FnvHashSet;

/// One input transaction: raw items with their utilities, plus the
/// transaction utility (TU). Immutable once read.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    items: Vec<Item>,
    utilities: Vec<f64>,
    utility: f64,
}

impl Transaction {
    /// Callers guarantee `items.len() == utilities.len()`; the reader checks
    /// this before constructing.
    pub fn new(items: Vec<Item>, utilities: Vec<f64>, utility: f64) -> Transaction {
        debug_assert_eq!(items.len(), utilities.len());
        Transaction {
            items,
            utilities,
            utility,
        }
    }

    pub fn from_pairs(pairs: &[(u32, f64)]) -> Transaction {
        let items = pairs.iter().map(|&(item, _)| Item::with_id(item)).collect();
        let utilities: Vec<f64> = pairs.iter().map(|&(_, utility)| utility).collect();
        let utility = utilities.iter().sum();
        Transaction::new(items, utilities, utility)
    }

    /// Rejects negative item utilities and a TU below the sum of the item
    /// utilities. Either would let GWU understate the utility of an itemset
    /// and prune results that should be reported. `line` is the 1-based
    /// position of the transaction in its input.
    pub fn validate(&self, line: usize) -> Result<()> {
        if let Some((item, utility)) = self.iter().find(|&(_, utility)| !(utility >= 0.0)) {
            return Err(MiningError::NegativeUtility { line, item, utility });
        }
        let sum: f64 = self.utilities.iter().sum();
        if !(sum - self.utility <= 1e-9 * sum.max(1.0)) {
            return Err(MiningError::UtilityBelowItems {
                line,
                utility: self.utility,
                sum,
            });
        }
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn utility(&self) -> f64 {
        self.utility
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Item, f64)> + '_ {
        self.items.iter().cloned().zip(self.utilities.iter().cloned())
    }
}

/// Summary of a loaded dataset, reported before mining.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetStats {
    pub transactions: usize,
    pub total_utility: f64,
    pub max_item: Option<Item>,
    pub max_length: usize,
    pub avg_length: f64,
    pub generalized_items: usize,
    pub depth: usize,
}

impl DatasetStats {
    pub fn compute<G: Generalization>(transactions: &[Transaction], generalization: &G) -> DatasetStats {
        let mut total_utility = 0.0;
        let mut max_item = None;
        let mut max_length = 0;
        let mut sum_length = 0;
        let mut depth = 0;
        let mut seen: FnvHashSet<Item> = FnvHashSet::default();
        for transaction in transactions {
            total_utility += transaction.utility();
            max_length = max_length.max(transaction.len());
            sum_length += transaction.len();
            for &item in transaction.items() {
                max_item = max_item.max(Some(item));
                if seen.insert(item) {
                    depth = depth.max(generalization.level(item));
                }
            }
        }
        let avg_length = if transactions.is_empty() {
            0.0
        } else {
            sum_length as f64 / transactions.len() as f64
        };
        DatasetStats {
            transactions: transactions.len(),
            total_utility,
            max_item,
            max_length,
            avg_length,
            generalized_items: generalization.generalized_item_count(),
            depth,
        }
    }
}
