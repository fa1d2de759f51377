use crate::error::{MiningError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct MinerConfig {
    pub min_utility: f64,
    // Caps the number of transactions ingested; used for scalability runs.
    pub max_transactions: Option<usize>,
    pub use_eucs: bool,
}

impl MinerConfig {
    pub fn new(min_utility: f64) -> MinerConfig {
        MinerConfig {
            min_utility,
            max_transactions: None,
            use_eucs: true,
        }
    }

    pub fn with_max_transactions(mut self, max_transactions: usize) -> MinerConfig {
        self.max_transactions = Some(max_transactions);
        self
    }

    pub fn with_eucs(mut self, use_eucs: bool) -> MinerConfig {
        self.use_eucs = use_eucs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_utility.is_finite() || self.min_utility < 0.0 {
            return Err(MiningError::InvalidThreshold(self.min_utility));
        }
        Ok(())
    }
}
