pub mod matrix;
pub mod random;
pub mod render;

pub use matrix::Matrix;
pub use random::{RandomSource, SharedRandom};
