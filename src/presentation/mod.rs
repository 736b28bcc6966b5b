//! Presentation layer: page templates and view models.

pub mod views;
