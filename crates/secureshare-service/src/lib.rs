//! # secureshare-service
//!
//! The transfer layer of SecureShare. It keeps the object store and the
//! metadata store consistent across uploads and deletes, and governs the
//! lifecycle of download tokens.
//!
//! Services follow constructor injection: store handles are passed in as
//! `Arc<dyn ObjectStore>` / `Arc<dyn MetadataStore>` at construction time.

pub mod access;
pub mod fanout;
pub mod listing;
pub mod token;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessTokenManager, BatchIssue};
pub use listing::{ListedFile, ListingAggregator};
pub use token::TokenGenerator;
pub use transfer::{Compensator, TransferCoordinator};
