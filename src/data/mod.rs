pub mod digits;

pub use digits::{check_topology, Dataset, Digit, CLASSES, PIXELS, RECORD_LEN};
