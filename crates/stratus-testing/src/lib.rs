//! Testing infrastructure for stratus integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `ShellWorld`: Isolated shell home plus configured binary invocations
//! - `ShellResult`: Captured output with packed-line helpers

pub mod world;

pub use world::{ShellResult, ShellWorld};
