pub mod activation;
pub mod cost;
pub mod error;
pub mod layers;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::ActivationFunction;
pub use cost::CostFunction;
pub use error::{Error, Result};
pub use layers::Layer;
pub use math::{Matrix, RandomSource, SharedRandom};
pub use network::{Gradients, LayerSpec, Network, NetworkSpec, TrainingPair};
pub use optim::Sgd;
pub use train::{train_loop, TrainConfig, TrainMode};
