//! LS-8 virtual machine.
//!
//! A byte-addressable, register-based 8-bit machine: 256 bytes of memory, eight registers,
//! a program counter and a comparison-flags register.
//!
//! # Architecture
//!
//! - **Memory**: 256 zero-initialized bytes holding both code (loaded at address 0) and stack
//! - **Registers**: `R0`..`R7`, 8-bit, wrapping; `R7` is the stack pointer (starts at `0xF4`)
//! - **Instruction format**: opcode byte plus 0-2 operand bytes; the opcode encodes its own
//!   operand count and whether the handler controls the PC
//! - **Execution model**: single-threaded fetch-decode-execute loop driven by an
//!   opcode-indexed dispatch table; a run ends in `Halted` or `Faulted`
//!
//! # Modules
//!
//! - [`errors`]: Load and execution error types
//! - [`isa`]: Instruction set definition and opcode decoding
//! - [`output`]: Output sink for program output and diagnostics
//! - [`program`]: Program images and the binary-text loader
//! - [`vm`]: Machine state, ALU, dispatch table and interpreter loop

pub mod errors;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod output;
pub mod program;
pub mod vm;
