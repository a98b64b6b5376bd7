//! LS-8 virtual machine library.
//!
//! Provides the interpreter core, the binary program loader, and the logging utilities
//! used by the `ls8` runner.

pub mod utils;
pub mod virtual_machine;
