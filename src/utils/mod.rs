//! Shared utilities for the runner and the interpreter.

pub mod log;
