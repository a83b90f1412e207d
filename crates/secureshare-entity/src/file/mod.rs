//! File record entities.

pub mod filter;
pub mod model;
pub mod token;

pub use filter::{RecordFilter, RecordPatch};
pub use model::FileRecord;
pub use token::TokenType;
