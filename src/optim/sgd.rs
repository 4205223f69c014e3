use crate::error::Result;
use crate::layers::Layer;

/// Plain gradient descent: `θ -= learning_rate · scale · ∇θ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies the gradients from the layer's latest backprop pass.
    pub fn step(&self, layer: &mut Layer) -> Result<()> {
        layer.apply_gradients(self.learning_rate)
    }

    /// Applies the layer's accumulated gradient sums, averaged over `count`
    /// samples.
    pub fn step_averaged(&self, layer: &mut Layer, count: usize) -> Result<()> {
        layer.apply_gradient_sums(self.learning_rate / count as f64)
    }
}
