//! Integration tests: fixture source → context → simulation → page.

mod fixture_source;
mod simulation;
