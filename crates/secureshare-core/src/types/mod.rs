//! Core type definitions used across the SecureShare workspace.

pub mod id;

pub use id::FileId;
