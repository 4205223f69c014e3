use std::time::Instant;

use tracing::info;

use crate::error::{Error, Result};
use crate::math::RandomSource;
use crate::network::{Network, TrainingPair};
use crate::train::train_config::{TrainConfig, TrainMode};

/// Runs `config.steps` updates on `network` and returns the mean cost over
/// `data` afterwards.
///
/// Every `config.log_every` steps the mean cost is computed and logged at
/// `info` level.
pub fn train_loop<R>(
    network: &mut Network,
    data: &[TrainingPair],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64>
where
    R: RandomSource + ?Sized,
{
    config.validate()?;
    if data.is_empty() {
        return Err(Error::EmptyTrainingSet);
    }

    let t_start = Instant::now();
    for step in 1..=config.steps {
        match config.mode {
            TrainMode::Stochastic => network.train_stochastic(data, rng)?,
            TrainMode::MiniBatch { batch_size } => network.train_mini_batch(data, batch_size, rng)?,
            TrainMode::FullBatch => network.train_subset(data)?,
        }

        if config.log_every > 0 && step % config.log_every == 0 {
            let cost = network.mean_cost(data)?;
            info!(
                step,
                total_steps = config.steps,
                cost,
                elapsed_ms = t_start.elapsed().as_millis() as u64,
                "training progress"
            );
        }
    }

    network.mean_cost(data)
}
