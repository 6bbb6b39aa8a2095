//! Shared test utilities for plintake integration tests.
//!
//! This module provides `TestHarness` for isolated test execution with temp
//! directories and a seeded in-memory database.

pub mod harness;

pub use harness::TestHarness;
