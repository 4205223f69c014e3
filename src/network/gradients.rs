use crate::layers::Layer;
use crate::math::Matrix;

/// Per-layer gradients from the latest `Network::backprop` call.
///
/// Borrows the network's scratch buffers, so the network cannot run another
/// pass while this view is alive. Use `to_owned_parts` to keep a copy.
#[derive(Debug, Clone, Copy)]
pub struct Gradients<'a> {
    layers: &'a [Layer],
}

impl<'a> Gradients<'a> {
    pub(crate) fn new(layers: &'a [Layer]) -> Gradients<'a> {
        Gradients { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// ∂C/∂b for layer `l`.
    pub fn biases(&self, l: usize) -> &'a Matrix {
        &self.layers[l].bias_grad
    }

    /// ∂C/∂W for layer `l`.
    pub fn weights(&self, l: usize) -> &'a Matrix {
        &self.layers[l].weight_grad
    }

    /// `(bias gradient, weight gradient)` per layer, input side first.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Matrix, &'a Matrix)> + 'a {
        let layers = self.layers;
        layers.iter().map(|l| (&l.bias_grad, &l.weight_grad))
    }

    /// Copies the gradients out as `(bias gradients, weight gradients)`.
    pub fn to_owned_parts(&self) -> (Vec<Matrix>, Vec<Matrix>) {
        self.iter().map(|(b, w)| (b.clone(), w.clone())).unzip()
    }
}
