pub mod cost_type;
pub mod cross_entropy;
pub mod quadratic;

pub use cost_type::CostFunction;
pub use cross_entropy::CrossEntropyCost;
pub use quadratic::QuadraticCost;
