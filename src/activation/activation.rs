use serde::{Deserialize, Serialize};

/// Element-wise activation applied to a layer's pre-activation vector.
///
/// Each variant is a stateless `(function, derivative)` pair chosen once per
/// layer when the network is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => if x < 0.0 { 0.0 } else { x },
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative with respect to the pre-activation value.
    ///
    /// ReLU's derivative at exactly `0.0` is `1.0`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::ReLU => if x < 0.0 { 0.0 } else { 1.0 },
            ActivationFunction::Identity => 1.0,
        }
    }
}
