//! Core engine: the session simulator and the page orchestration around it.

pub mod simulator;
pub mod demo;

pub use demo::{DemoContext, DemoView, FormInput, Selection};
pub use simulator::generate_sessions;
