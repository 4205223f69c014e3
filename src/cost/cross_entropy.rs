use crate::error::Result;
use crate::math::Matrix;

/// Binary cross-entropy for a sigmoid output layer.
///
/// The delta is `o − y`: the sigmoid derivative cancels against the cost's
/// derivative, so it is only valid when the last layer is sigmoid. `Network`
/// refuses any other pairing.
pub struct CrossEntropyCost;

impl CrossEntropyCost {
    /// Element-wise `−[y·ln(o) + (1 − y)·ln(1 − o)]`, left unreduced.
    ///
    /// Outputs outside `(0, 1)` produce NaN or infinity.
    pub fn function(output: &Matrix, expected: &Matrix) -> Result<Matrix> {
        let mut positive = output.map(f64::ln);
        positive.hadamard_in_place(expected)?;

        let mut negative = output.map(|o| (1.0 - o).ln());
        negative.hadamard_in_place(&expected.map(|y| 1.0 - y))?;

        positive.add_in_place(&negative)?;
        positive.scale(-1.0);
        Ok(positive)
    }

    pub fn delta(output: &Matrix, expected: &Matrix) -> Result<Matrix> {
        Matrix::difference(output, expected)
    }
}
