pub mod poller;

pub use poller::{MatrixPoller, MatrixSource, RegistryMatrixSource};
