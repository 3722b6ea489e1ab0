pub mod vector;

pub use vector::{argmax, one_hot_into};
