//! Shared test utilities for docagent integration tests.
//!
//! - `TestHarness`: an on-disk database in a temp directory plus fake
//!   capabilities, wired into an `Agent`
//! - `fakes`: scripted oracles, capabilities and stores

pub mod fakes;
pub mod harness;

pub use fakes::*;
pub use harness::TestHarness;
