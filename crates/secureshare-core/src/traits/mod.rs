//! Collaborator traits defined in `secureshare-core` and implemented by
//! the adapter crates.

pub mod object_store;

pub use object_store::{ObjectStore, PresignParams};
