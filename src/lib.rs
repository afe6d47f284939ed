//! Aerial demo: synthetic 5G session simulator and showcase page.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod engine;
pub mod fixture;
pub mod render;
pub mod dashboard;
