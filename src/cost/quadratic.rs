use crate::activation::ActivationFunction;
use crate::error::Result;
use crate::math::Matrix;

pub struct QuadraticCost;

impl QuadraticCost {
    /// Element-wise `½·(o − y)²`, left unreduced.
    pub fn function(output: &Matrix, expected: &Matrix) -> Result<Matrix> {
        let error = Matrix::difference(output, expected)?;
        let mut cost = Matrix::hadamard(&error, &error)?;
        cost.scale(0.5);
        Ok(cost)
    }

    /// Output-layer error `(o − y) ∘ f'(z)`.
    pub fn delta(
        output: &Matrix,
        expected: &Matrix,
        pre_activation: &Matrix,
        activation: ActivationFunction,
    ) -> Result<Matrix> {
        let mut delta = Matrix::difference(output, expected)?;
        delta.hadamard_in_place(&pre_activation.map(|x| activation.derivative(x)))?;
        Ok(delta)
    }
}
