use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::cost::CostFunction;
use crate::error::{Error, Result};

/// One layer of a network: its neuron count and activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(size: usize, activation: ActivationFunction) -> LayerSpec {
        LayerSpec { size, activation }
    }
}

/// Architecture and hyperparameters needed to build a `Network`.
///
/// Only configuration lives here; trained weights are never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub cost: CostFunction,
    pub learning_rate: f64,
    /// Weights are drawn uniformly from `[min, max)`.
    pub weight_range: (f64, f64),
    /// Biases are drawn uniformly from `[min, max)`.
    pub bias_range: (f64, f64),
    /// Length of the input column vector. The input is not itself a layer.
    pub input_size: usize,
    /// Ordered layers, first hidden layer to output layer.
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    pub fn new(
        cost: CostFunction,
        learning_rate: f64,
        weight_range: (f64, f64),
        bias_range: (f64, f64),
        input_size: usize,
        layers: Vec<LayerSpec>,
    ) -> NetworkSpec {
        NetworkSpec {
            cost,
            learning_rate,
            weight_range,
            bias_range,
            input_size,
            layers,
        }
    }

    /// Checks every constraint `Network::new` relies on.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(Error::Configuration(format!(
                "a network needs at least two layers, got {}",
                self.layers.len()
            )));
        }
        if self.input_size == 0 {
            return Err(Error::Configuration("input size must be positive".to_owned()));
        }
        if let Some(i) = self.layers.iter().position(|l| l.size == 0) {
            return Err(Error::Configuration(format!("layer {i} has zero neurons")));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::Configuration(format!(
                "learning rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        for (name, (min, max)) in [("weight", self.weight_range), ("bias", self.bias_range)] {
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(Error::Configuration(format!(
                    "{name} range [{min}, {max}) is empty"
                )));
            }
        }
        let output = self.layers[self.layers.len() - 1].activation;
        if !self.cost.supports_output(output) {
            return Err(Error::Configuration(format!(
                "{:?} cost requires a sigmoid output layer, got {:?}",
                self.cost, output
            )));
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file written by `save_json`.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_spec() -> NetworkSpec {
        NetworkSpec::new(
            CostFunction::CrossEntropy,
            0.5,
            (-1.0, 1.0),
            (-1.0, 1.0),
            2,
            vec![
                LayerSpec::new(2, ActivationFunction::Sigmoid),
                LayerSpec::new(1, ActivationFunction::Sigmoid),
            ],
        )
    }

    #[test]
    fn valid_spec_passes() {
        assert!(xor_spec().validate().is_ok());
    }

    #[test]
    fn rejects_single_layer() {
        let mut spec = xor_spec();
        spec.layers.truncate(1);
        assert!(matches!(spec.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_zero_sizes_and_bad_hyperparameters() {
        let mut spec = xor_spec();
        spec.input_size = 0;
        assert!(spec.validate().is_err());

        let mut spec = xor_spec();
        spec.layers[0].size = 0;
        assert!(spec.validate().is_err());

        let mut spec = xor_spec();
        spec.learning_rate = 0.0;
        assert!(spec.validate().is_err());

        let mut spec = xor_spec();
        spec.bias_range = (1.0, -1.0);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn rejects_cross_entropy_without_sigmoid_output() {
        let mut spec = xor_spec();
        spec.layers[1].activation = ActivationFunction::Identity;
        assert!(matches!(spec.validate(), Err(Error::Configuration(_))));
        spec.cost = CostFunction::Quadratic;
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn json_round_trip_through_file() {
        let spec = xor_spec();
        let path = std::env::temp_dir().join(format!("backprop-nn-spec-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        spec.save_json(path).unwrap();
        let loaded = NetworkSpec::load_json(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded, spec);
    }

    #[test]
    fn parses_hand_written_json() {
        let json = r#"{
            "cost": "quadratic",
            "learning_rate": 0.1,
            "weight_range": [-0.5, 0.5],
            "bias_range": [0.0, 0.1],
            "input_size": 3,
            "layers": [
                { "size": 4, "activation": "relu" },
                { "size": 2, "activation": "identity" }
            ]
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.layers[0], LayerSpec::new(4, ActivationFunction::ReLU));
        assert_eq!(spec.cost, CostFunction::Quadratic);
        assert!(spec.validate().is_ok());
    }
}
