//! # secureshare-storage
//!
//! Object store providers for SecureShare. The S3-compatible provider is
//! gated behind the `s3` feature; the in-memory provider is always built.

pub mod manager;
pub mod providers;

pub use manager::build_object_store;
pub use providers::MemoryObjectStore;
#[cfg(feature = "s3")]
pub use providers::S3ObjectStore;
