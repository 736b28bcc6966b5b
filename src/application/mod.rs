//! Application services layer.

pub mod clipboard;
pub mod contact;
pub mod error;
pub mod render;
