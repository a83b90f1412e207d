//! # secureshare-entity
//!
//! Domain entity models for SecureShare. [`file::FileRecord`] is the single
//! persisted document; [`file::RecordFilter`] and [`file::RecordPatch`] are
//! the query and mutation vocabulary the metadata store understands.

pub mod file;

pub use file::{FileRecord, RecordFilter, RecordPatch, TokenType};
