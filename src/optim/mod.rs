pub mod accumulate;
pub mod sgd;

pub use sgd::Sgd;
