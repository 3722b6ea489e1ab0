pub mod backward;
pub mod codec;
pub mod init;
pub mod network;
pub mod topology;

pub use init::xavier_limit;
pub use network::{Gradients, Grads, Network, Params, Role};
pub use topology::Topology;
