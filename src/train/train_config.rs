use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which update rule each training step uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrainMode {
    /// One randomly drawn pair per step.
    Stochastic,
    /// `batch_size` pairs drawn with replacement, gradients averaged.
    MiniBatch { batch_size: usize },
    /// Every pair in order, gradients averaged.
    FullBatch,
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `steps`     — number of gradient-descent updates
/// - `mode`      — how each update picks its samples
/// - `log_every` — emit a progress event every this many steps; `0` disables it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub steps: usize,
    pub mode: TrainMode,
    #[serde(default)]
    pub log_every: usize,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with progress logging disabled.
    pub fn new(steps: usize, mode: TrainMode) -> Self {
        TrainConfig {
            steps,
            mode,
            log_every: 0,
        }
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let TrainMode::MiniBatch { batch_size: 0 } = self.mode {
            return Err(Error::Configuration("batch size must be at least 1".to_owned()));
        }
        Ok(())
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
