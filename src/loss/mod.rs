pub mod mse;

pub use mse::SquaredError;
