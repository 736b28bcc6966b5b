//! Folio: rendering core and contact pipeline for a content-managed portfolio.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
