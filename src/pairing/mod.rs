pub mod conductor;
pub mod error;

pub use conductor::{PairingConductor, PairingStep};
pub use error::PairingError;
