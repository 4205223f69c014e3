pub mod gradients;
pub mod network;
pub mod spec;

pub use gradients::Gradients;
pub use network::{Network, TrainingPair};
pub use spec::{LayerSpec, NetworkSpec};
