//! Mining of closed high-utility itemsets from taxonomy-structured
//! transactional data, one taxonomy level at a time.

pub mod config;
pub mod error;
pub mod eu_list;
pub mod eucs;
pub mod item;
pub mod item_counter;
pub mod itemizer;
pub mod miner;
pub mod pattern;
pub mod scanner;
pub mod search;
pub mod taxonomy;
pub mod transaction;
pub mod transaction_reader;
pub mod utility_map;

pub use crate::config::MinerConfig;
pub use crate::error::{MiningError, Result};
pub use crate::item::{Item, LocalItem};
pub use crate::miner::{LevelStats, Miner, MiningResult, MiningStats};
pub use crate::pattern::{ClosedItemset, PatternWriter};
pub use crate::taxonomy::{Flat, Generalization, Taxonomy};
pub use crate::transaction::{DatasetStats, Transaction};
