use crate::classify::Strategy;
use crate::error::{BomError, BomResult};

/// Configuration for classifying files and streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyConfig {
    /// Classifier to run
    pub strategy: Strategy,
    /// Bytes read from the start of a file when probing it
    pub sample_size: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        ClassifyConfig {
            strategy: Strategy::default(),
            sample_size: 1024,
        }
    }
}

impl ClassifyConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Reject samples too small for the strategy to ever see a BOM.
    pub fn validate(&self) -> BomResult<()> {
        let needed = self.strategy.lookahead();
        if self.sample_size < needed {
            return Err(BomError::Config(format!(
                "sample size {} is smaller than the {} bytes the {:?} strategy needs",
                self.sample_size, needed, self.strategy
            )));
        }
        Ok(())
    }
}
