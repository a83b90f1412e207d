//! Dual-store upload and delete coordination.

pub mod compensation;
pub mod coordinator;

pub use compensation::Compensator;
pub use coordinator::TransferCoordinator;
