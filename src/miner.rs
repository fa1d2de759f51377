use crate::config::MinerConfig;
use crate::error::Result;
use crate::pattern::ClosedItemset;
use crate::scanner::scan;
use crate::search::ClosedSearch;
use crate::taxonomy::Generalization;
use crate::transaction::{DatasetStats, Transaction};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelStats {
    pub level: usize,
    pub promising_items: usize,
    pub patterns: usize,
    pub candidates: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiningStats {
    pub elapsed: Duration,
    pub patterns: usize,
    pub candidates: usize,
    pub levels: Vec<LevelStats>,
}

#[derive(Debug)]
pub struct MiningResult {
    pub itemsets: Vec<ClosedItemset>,
    pub stats: MiningStats,
}

/// Multi-level closed high-utility itemset miner. With a `Taxonomy` it mines
/// every level of the hierarchy; with `Flat` it is the single-level
/// baseline.
pub struct Miner<'g, G> {
    generalization: &'g G,
    config: MinerConfig,
}

impl<'g, G: Generalization> Miner<'g, G> {
    pub fn new(generalization: &'g G, config: MinerConfig) -> Result<Miner<'g, G>> {
        config.validate()?;
        Ok(Miner {
            generalization,
            config,
        })
    }

    pub fn dataset_stats(&self, transactions: &[Transaction]) -> DatasetStats {
        DatasetStats::compute(self.ingested(transactions), self.generalization)
    }

    fn ingested<'t>(&self, transactions: &'t [Transaction]) -> &'t [Transaction] {
        match self.config.max_transactions {
            Some(max) if max < transactions.len() => &transactions[..max],
            _ => transactions,
        }
    }

    /// Mines every level, deepest first, handing each level's itemsets to
    /// `sink` as soon as that level is done. Stops at the first sink error;
    /// whatever was already handed over stays delivered.
    pub fn run_with_sink<F>(&self, transactions: &[Transaction], mut sink: F) -> Result<MiningStats>
    where
        F: FnMut(&[ClosedItemset]) -> Result<()>,
    {
        let start = Instant::now();
        let transactions = self.ingested(transactions);
        for (index, transaction) in transactions.iter().enumerate() {
            transaction.validate(index + 1)?;
        }
        let min_utility = self.config.min_utility;

        let scanned = scan(transactions, self.generalization, min_utility, self.config.use_eucs)?;
        info!(levels = scanned.max_level, "mining closed high-utility itemsets");

        let mut stats = MiningStats::default();
        for data in scanned.levels.iter().rev() {
            let timer = Instant::now();
            let outcome = ClosedSearch::new(data, min_utility).run();
            debug!(
                level = data.level,
                patterns = outcome.itemsets.len(),
                candidates = outcome.candidates,
                millis = timer.elapsed().as_millis() as u64,
                "level mined"
            );
            sink(&outcome.itemsets)?;
            stats.patterns += outcome.itemsets.len();
            stats.candidates += outcome.candidates;
            stats.levels.push(LevelStats {
                level: data.level,
                promising_items: data.itemizer.len(),
                patterns: outcome.itemsets.len(),
                candidates: outcome.candidates,
            });
        }
        stats.elapsed = start.elapsed();
        Ok(stats)
    }

    pub fn run(&self, transactions: &[Transaction]) -> Result<MiningResult> {
        let mut itemsets: Vec<ClosedItemset> = vec![];
        let stats = self.run_with_sink(transactions, |found| {
            itemsets.extend_from_slice(found);
            Ok(())
        })?;
        Ok(MiningResult { itemsets, stats })
    }
}
