use tracing::debug;

use crate::activation::ActivationFunction;
use crate::cost::CostFunction;
use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::math::{Matrix, RandomSource};
use crate::network::gradients::Gradients;
use crate::network::spec::NetworkSpec;
use crate::optim::Sgd;

/// An `(input, target)` pair of column vectors.
pub type TrainingPair = (Matrix, Matrix);

/// A dense feedforward network.
///
/// Every intermediate matrix (activations, errors, gradients) lives in the
/// layers and is reused across calls. `forward` and `backprop` hand out
/// borrows of those buffers, which the borrow checker invalidates before the
/// next call can overwrite them.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) cost: CostFunction,
    pub(crate) optimizer: Sgd,
    input_size: usize,
}

impl Network {
    /// Builds a network with randomly initialised weights and biases.
    pub fn new<R>(spec: &NetworkSpec, rng: &mut R) -> Result<Network>
    where
        R: RandomSource + ?Sized,
    {
        spec.validate()?;

        let mut layers = Vec::with_capacity(spec.layers.len());
        let mut input_size = spec.input_size;
        for (i, layer_spec) in spec.layers.iter().enumerate() {
            let layer = Layer::new(
                layer_spec.size,
                input_size,
                layer_spec.activation,
                spec.weight_range,
                spec.bias_range,
                rng,
            )?;
            debug!(
                layer = i,
                rows = layer_spec.size,
                cols = input_size,
                activation = ?layer_spec.activation,
                "allocated layer"
            );
            layers.push(layer);
            input_size = layer_spec.size;
        }

        Ok(Network {
            layers,
            cost: spec.cost,
            optimizer: Sgd::new(spec.learning_rate),
            input_size: spec.input_size,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn cost_function(&self) -> CostFunction {
        self.cost
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::Configuration(format!(
                "learning rate must be positive and finite, got {learning_rate}"
            )));
        }
        self.optimizer.learning_rate = learning_rate;
        Ok(())
    }

    /// Forward pass; returns the output layer's activation.
    pub fn forward(&mut self, input: &Matrix) -> Result<&Matrix> {
        if input.shape() != (self.input_size, 1) {
            return Err(Error::shape("forward", (self.input_size, 1), input.shape()));
        }
        self.layers[0].feed_from(input)?;
        for l in 1..self.layers.len() {
            let (prev, rest) = self.layers.split_at_mut(l);
            rest[0].feed_from(&prev[l - 1].activation)?;
        }
        Ok(&self.layers[self.layers.len() - 1].activation)
    }

    /// Runs one forward and backward pass for a single pair and returns the
    /// bias and weight gradients of the cost.
    pub fn backprop(&mut self, input: &Matrix, target: &Matrix) -> Result<Gradients<'_>> {
        self.backprop_in_place(input, target)?;
        Ok(Gradients::new(&self.layers))
    }

    pub(crate) fn backprop_in_place(&mut self, input: &Matrix, target: &Matrix) -> Result<()> {
        self.forward(input)?;

        let last = self.layers.len() - 1;
        let output_layer = &mut self.layers[last];
        let delta = self.cost.delta(
            &output_layer.activation,
            target,
            &output_layer.pre_activation,
            output_layer.activator,
        )?;
        output_layer.error.set_copy(&delta)?;

        for l in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(l + 1);
            head[l].propagate_error(&mut tail[0])?;
        }

        self.layers[0].compute_gradients(input)?;
        for l in 1..self.layers.len() {
            let (prev, rest) = self.layers.split_at_mut(l);
            rest[0].compute_gradients(&prev[l - 1].activation)?;
        }
        Ok(())
    }

    /// Scalar cost for one pair: the element-wise cost summed over outputs.
    pub fn cost(&mut self, input: &Matrix, target: &Matrix) -> Result<f64> {
        let cost = self.cost;
        let output = self.forward(input)?;
        Ok(cost.function(output, target)?.total())
    }

    /// Average of `cost` over a data set.
    pub fn mean_cost(&mut self, data: &[TrainingPair]) -> Result<f64> {
        if data.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        let mut total = 0.0;
        for (input, target) in data {
            total += self.cost(input, target)?;
        }
        Ok(total / data.len() as f64)
    }

    pub fn render_weights(&self) -> String {
        self.render_section("Weights", |l| &l.weights)
    }

    pub fn render_biases(&self) -> String {
        self.render_section("Biases", |l| &l.biases)
    }

    /// Activations left by the most recent forward pass.
    pub fn render_activations(&self) -> String {
        self.render_section("Neurons", |l| &l.activation)
    }

    fn render_section(&self, title: &str, pick: impl Fn(&Layer) -> &Matrix) -> String {
        let mut out = format!("{title}:\n");
        for (i, layer) in self.layers.iter().enumerate() {
            out.push_str(&format!("  Layer {}:\n", i + 1));
            out.push_str(&pick(layer).render("    "));
        }
        out
    }

    /// Activation functions from first to last layer.
    pub fn activators(&self) -> impl Iterator<Item = ActivationFunction> + '_ {
        self.layers.iter().map(Layer::activator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::LayerSpec;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec(cost: CostFunction, sizes: &[usize], activation: ActivationFunction) -> NetworkSpec {
        NetworkSpec::new(
            cost,
            0.1,
            (-1.0, 1.0),
            (-1.0, 1.0),
            2,
            sizes.iter().map(|&s| LayerSpec::new(s, activation)).collect(),
        )
    }

    fn network(cost: CostFunction, sizes: &[usize], activation: ActivationFunction) -> Network {
        let mut rng = StdRng::seed_from_u64(21);
        Network::new(&spec(cost, sizes, activation), &mut rng).unwrap()
    }

    #[test]
    fn construction_allocates_expected_shapes() {
        let net = network(CostFunction::Quadratic, &[3, 4, 1], ActivationFunction::Sigmoid);
        let shapes: Vec<_> = net.layers().iter().map(|l| l.weights().shape()).collect();
        assert_eq!(shapes, vec![(3, 2), (4, 3), (1, 4)]);
        assert_eq!(net.output_size(), 1);
        assert_eq!(net.input_size(), 2);
        assert!(net.layers().iter().all(|l| l.pre_activation().as_slice().iter().all(|&z| z == 0.0)));
    }

    #[test]
    fn construction_rejects_single_layer() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = Network::new(
            &spec(CostFunction::Quadratic, &[1], ActivationFunction::Sigmoid),
            &mut rng,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn forward_matches_manual_computation() {
        let mut net = network(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
        let input = Matrix::from_column(&[0.3, -0.7]);

        let sig = ActivationFunction::Sigmoid;
        let w0 = net.layers[0].weights.clone();
        let b0 = net.layers[0].biases.clone();
        let w1 = net.layers[1].weights.clone();
        let b1 = net.layers[1].biases.clone();
        let hidden = (&(&w0 * &input) + &b0).map(|z| sig.function(z));
        let expected = (&(&w1 * &hidden) + &b1).map(|z| sig.function(z));

        let output = net.forward(&input).unwrap();
        assert_abs_diff_eq!(output[0], expected[0], epsilon = 1e-12);
    }

    #[test]
    fn forward_rejects_wrong_input_shape() {
        let mut net = network(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
        assert!(matches!(
            net.forward(&Matrix::column(3)),
            Err(Error::ShapeMismatch { op: "forward", .. })
        ));
    }

    #[test]
    fn backprop_rejects_wrong_target_shape() {
        let mut net = network(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
        let result = net.backprop(&Matrix::column(2), &Matrix::column(2));
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    fn finite_difference_check(cost: CostFunction, sizes: &[usize], activation: ActivationFunction) {
        let mut net = network(cost, sizes, activation);
        let input = Matrix::from_column(&[0.8, -0.4]);
        let target = Matrix::from_column(&vec![0.25; *sizes.last().unwrap()]);

        let (bias_grads, weight_grads) = net.backprop(&input, &target).unwrap().to_owned_parts();

        let h = 1e-6;
        for l in 0..net.layers.len() {
            let (rows, cols) = net.layers[l].weights.shape();
            for r in 0..rows {
                for c in 0..cols {
                    let original = net.layers[l].weights[(r, c)];
                    net.layers[l].weights[(r, c)] = original + h;
                    let plus = net.cost(&input, &target).unwrap();
                    net.layers[l].weights[(r, c)] = original - h;
                    let minus = net.cost(&input, &target).unwrap();
                    net.layers[l].weights[(r, c)] = original;

                    let numeric = (plus - minus) / (2.0 * h);
                    assert_abs_diff_eq!(weight_grads[l][(r, c)], numeric, epsilon = 1e-6);
                }
            }
            for r in 0..rows {
                let original = net.layers[l].biases[r];
                net.layers[l].biases[r] = original + h;
                let plus = net.cost(&input, &target).unwrap();
                net.layers[l].biases[r] = original - h;
                let minus = net.cost(&input, &target).unwrap();
                net.layers[l].biases[r] = original;

                let numeric = (plus - minus) / (2.0 * h);
                assert_abs_diff_eq!(bias_grads[l][r], numeric, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn gradients_match_finite_differences_quadratic_sigmoid() {
        finite_difference_check(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
    }

    #[test]
    fn gradients_match_finite_differences_cross_entropy() {
        finite_difference_check(CostFunction::CrossEntropy, &[3, 2, 1], ActivationFunction::Sigmoid);
    }

    #[test]
    fn gradients_match_finite_differences_identity() {
        finite_difference_check(CostFunction::Quadratic, &[3, 2], ActivationFunction::Identity);
    }

    #[test]
    fn set_learning_rate_validates() {
        let mut net = network(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
        assert!(net.set_learning_rate(-1.0).is_err());
        net.set_learning_rate(0.25).unwrap();
        assert_eq!(net.learning_rate(), 0.25);
    }

    #[test]
    fn render_sections_label_layers() {
        let net = network(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
        let text = net.render_weights();
        assert!(text.starts_with("Weights:\n  Layer 1:\n    "));
        assert!(text.contains("  Layer 2:\n"));
        assert!(net.render_biases().starts_with("Biases:"));
        assert!(net.render_activations().starts_with("Neurons:"));
    }

    #[test]
    fn mean_cost_rejects_empty_set() {
        let mut net = network(CostFunction::Quadratic, &[2, 1], ActivationFunction::Sigmoid);
        assert!(matches!(net.mean_cost(&[]), Err(Error::EmptyTrainingSet)));
    }
}
