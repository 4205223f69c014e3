use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::cost::cross_entropy::CrossEntropyCost;
use crate::cost::quadratic::QuadraticCost;
use crate::error::Result;
use crate::math::Matrix;

/// Selects the cost the network is trained against.
///
/// - `Quadratic`    — half squared error; any output activation.
/// - `CrossEntropy` — binary cross-entropy; sigmoid output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    Quadratic,
    CrossEntropy,
}

impl CostFunction {
    /// Element-wise cost matrix for one output/target pair.
    pub fn function(&self, output: &Matrix, expected: &Matrix) -> Result<Matrix> {
        match self {
            CostFunction::Quadratic => QuadraticCost::function(output, expected),
            CostFunction::CrossEntropy => CrossEntropyCost::function(output, expected),
        }
    }

    /// Error of the output layer, i.e. ∂C/∂z for the last pre-activation.
    ///
    /// `CrossEntropy` ignores `pre_activation` and `activation`.
    pub fn delta(
        &self,
        output: &Matrix,
        expected: &Matrix,
        pre_activation: &Matrix,
        activation: ActivationFunction,
    ) -> Result<Matrix> {
        match self {
            CostFunction::Quadratic => {
                QuadraticCost::delta(output, expected, pre_activation, activation)
            }
            CostFunction::CrossEntropy => CrossEntropyCost::delta(output, expected),
        }
    }

    /// Whether this cost's delta is correct for the given output activation.
    pub fn supports_output(&self, activation: ActivationFunction) -> bool {
        match self {
            CostFunction::Quadratic => true,
            CostFunction::CrossEntropy => activation == ActivationFunction::Sigmoid,
        }
    }
}
