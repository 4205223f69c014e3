use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::{Matrix, RandomSource};

/// One fully connected layer together with every buffer the forward and
/// backward passes write into. All buffers are allocated here once and
/// overwritten in place afterwards.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) activator: ActivationFunction,
    /// Shape `(size, input_size)`.
    pub(crate) weights: Matrix,
    /// Shape `(size, 1)`.
    pub(crate) biases: Matrix,
    pub(crate) pre_activation: Matrix,
    pub(crate) activation: Matrix,

    // Backprop scratch.
    pub(crate) weights_transposed: Matrix,
    pub(crate) error: Matrix,
    /// `W_{l+1}ᵀ · error_{l+1}` before the derivative is applied.
    pub(crate) propagated: Matrix,
    pub(crate) bias_grad: Matrix,
    pub(crate) weight_grad: Matrix,

    // Running sums for subset training.
    pub(crate) bias_grad_sum: Matrix,
    pub(crate) weight_grad_sum: Matrix,
}

impl Layer {
    pub fn new<R>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        weight_range: (f64, f64),
        bias_range: (f64, f64),
        rng: &mut R,
    ) -> Result<Layer>
    where
        R: RandomSource + ?Sized,
    {
        if size == 0 || input_size == 0 {
            return Err(Error::Configuration(format!(
                "layer dimensions must be positive, got {size}x{input_size}"
            )));
        }
        let weights = Matrix::random_of_size((size, input_size), weight_range, rng)?;
        let biases = Matrix::random_of_size((size, 1), bias_range, rng)?;

        Ok(Layer {
            activator: activation,
            weights,
            biases,
            pre_activation: Matrix::column(size),
            activation: Matrix::column(size),
            weights_transposed: Matrix::zeros(input_size, size),
            error: Matrix::column(size),
            propagated: Matrix::column(size),
            bias_grad: Matrix::column(size),
            weight_grad: Matrix::zeros(size, input_size),
            bias_grad_sum: Matrix::column(size),
            weight_grad_sum: Matrix::zeros(size, input_size),
        })
    }

    /// Number of neurons.
    pub fn size(&self) -> usize {
        self.weights.rows()
    }

    /// Length of the vector this layer consumes.
    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn activator(&self) -> ActivationFunction {
        self.activator
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    /// Output of the most recent forward pass.
    pub fn activation(&self) -> &Matrix {
        &self.activation
    }

    pub fn pre_activation(&self) -> &Matrix {
        &self.pre_activation
    }

    /// `z = W·input + b`, `a = f(z)`, both written into the layer's caches.
    pub fn feed_from(&mut self, input: &Matrix) -> Result<()> {
        Matrix::multiply_into(&mut self.pre_activation, &self.weights, input)?;
        self.pre_activation.add_in_place(&self.biases)?;
        let activator = self.activator;
        self.activation
            .set_evaluated(&self.pre_activation, |z| activator.function(z))
    }

    /// Error of a hidden layer from the layer after it:
    /// `error = f'(z) ∘ (W_nextᵀ · error_next)`.
    pub fn propagate_error(&mut self, next: &mut Layer) -> Result<()> {
        next.weights_transposed.set_transposed_copy(&next.weights)?;
        Matrix::multiply_into(&mut self.propagated, &next.weights_transposed, &next.error)?;

        let activator = self.activator;
        self.error
            .set_evaluated(&self.pre_activation, |z| activator.derivative(z))?;
        self.error.hadamard_in_place(&self.propagated)
    }

    /// Fills `bias_grad` and `weight_grad` from `error` and the vector that
    /// was fed into this layer.
    pub fn compute_gradients(&mut self, input: &Matrix) -> Result<()> {
        if input.shape() != (self.weight_grad.cols(), 1) {
            return Err(Error::shape("compute_gradients", self.weight_grad.shape(), input.shape()));
        }
        self.bias_grad.set_copy(&self.error)?;
        for row in 0..self.weight_grad.rows() {
            let e = self.error[row];
            for col in 0..self.weight_grad.cols() {
                self.weight_grad[(row, col)] = input[col] * e;
            }
        }
        Ok(())
    }

    pub(crate) fn reset_gradient_sums(&mut self) {
        self.bias_grad_sum.initialize_with(0.0);
        self.weight_grad_sum.initialize_with(0.0);
    }

    pub(crate) fn accumulate_gradients(&mut self) -> Result<()> {
        self.bias_grad_sum.add_in_place(&self.bias_grad)?;
        self.weight_grad_sum.add_in_place(&self.weight_grad)
    }

    /// `W -= rate·δW`, `b -= rate·δb` using the latest backprop gradients.
    pub(crate) fn apply_gradients(&mut self, rate: f64) -> Result<()> {
        self.weights.add_scaled(&self.weight_grad, -rate)?;
        self.biases.add_scaled(&self.bias_grad, -rate)
    }

    /// Same update using the accumulated sums.
    pub(crate) fn apply_gradient_sums(&mut self, rate: f64) -> Result<()> {
        self.weights.add_scaled(&self.weight_grad_sum, -rate)?;
        self.biases.add_scaled(&self.bias_grad_sum, -rate)
    }
}
