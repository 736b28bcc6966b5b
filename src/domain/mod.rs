//! Domain layer types and invariants.

pub mod blocks;
pub mod contact;
pub mod document;
pub mod format;
pub mod slug;
