use tracing::trace;

use crate::error::{Error, Result};
use crate::math::RandomSource;
use crate::network::{Network, TrainingPair};

impl Network {
    /// One gradient-descent step on a single pair drawn uniformly from `data`.
    pub fn train_stochastic<R>(&mut self, data: &[TrainingPair], rng: &mut R) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        if data.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        let index = rng.next_index(data.len());
        let (input, target) = &data[index];
        self.backprop_in_place(input, target)?;
        for layer in &mut self.layers {
            self.optimizer.step(layer)?;
        }
        trace!(index, "stochastic step");
        Ok(())
    }

    /// One step on the average gradient of every pair in `data`, in order.
    pub fn train_subset(&mut self, data: &[TrainingPair]) -> Result<()> {
        self.train_on(data)
    }

    /// One step on the average gradient of `batch_size` pairs drawn from
    /// `data` uniformly with replacement.
    pub fn train_mini_batch<R>(
        &mut self,
        data: &[TrainingPair],
        batch_size: usize,
        rng: &mut R,
    ) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        if data.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        if batch_size == 0 {
            return Err(Error::Configuration("batch size must be at least 1".to_owned()));
        }
        let batch = (0..batch_size).map(|_| &data[rng.next_index(data.len())]);
        self.train_on(batch)
    }

    fn train_on<'a, I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TrainingPair>,
    {
        for layer in &mut self.layers {
            layer.reset_gradient_sums();
        }

        let mut count = 0;
        for (input, target) in pairs {
            self.backprop_in_place(input, target)?;
            for layer in &mut self.layers {
                layer.accumulate_gradients()?;
            }
            count += 1;
        }
        if count == 0 {
            return Err(Error::EmptyTrainingSet);
        }

        for layer in &mut self.layers {
            self.optimizer.step_averaged(layer, count)?;
        }
        trace!(count, "averaged gradient step");
        Ok(())
    }
}
