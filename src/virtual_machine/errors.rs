use crate::virtual_machine::vm::RunState;
use thiserror::Error;

/// Errors raised while loading or executing an LS-8 program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VMError {
    /// Fetched byte has no entry in the dispatch table.
    #[error("unrecognized opcode 0b{opcode:08b} at pc {pc:#04x}")]
    UnrecognizedOpcode { opcode: u8, pc: usize },
    /// `DIV` or `MOD` with a zero divisor register.
    #[error("{instruction}: division by zero at pc {pc:#04x}")]
    DivisionByZero { instruction: &'static str, pc: usize },
    /// Memory access or instruction fetch outside the 256-byte address space.
    #[error("address {address:#x} out of range at pc {pc:#04x}")]
    AddressOutOfRange { address: usize, pc: usize },
    /// Register operand does not name one of the eight registers.
    #[error("register index {index} out of bounds at pc {pc:#04x}")]
    InvalidRegisterIndex { index: u8, pc: usize },
    /// A non-ALU instruction was routed to the ALU. Always an interpreter bug.
    #[error("internal error: unsupported ALU operation {instruction}")]
    UnsupportedAluOperation { instruction: &'static str },
    /// `run` was called on a machine that has already started.
    #[error("machine is {state:?}, expected Ready")]
    InvalidState { state: RunState },
    /// Program line is not an 8-digit binary literal.
    #[error("line {line}: invalid binary literal '{token}'")]
    InvalidBinaryLiteral { line: usize, token: String },
    /// Program does not fit in memory.
    #[error("program is {size} bytes, memory holds {capacity}")]
    ProgramTooLarge { size: usize, capacity: usize },
    /// Program file could not be read.
    #[error("io error reading {path}: {reason}")]
    Io { path: String, reason: String },
}

impl VMError {
    /// Returns `true` for errors that indicate a bug in the interpreter itself rather than
    /// in the loaded program.
    pub const fn is_internal(&self) -> bool {
        matches!(self, VMError::UnsupportedAluOperation { .. })
    }

    /// Returns `true` for errors that end a run cleanly in [`RunState::Halted`].
    pub const fn is_halting(&self) -> bool {
        matches!(self, VMError::DivisionByZero { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_opcode_message() {
        let err = VMError::UnrecognizedOpcode {
            opcode: 0xFF,
            pc: 3,
        };
        assert_eq!(
            err.to_string(),
            "unrecognized opcode 0b11111111 at pc 0x03"
        );
    }

    #[test]
    fn classification() {
        let alu = VMError::UnsupportedAluOperation { instruction: "HLT" };
        assert!(alu.is_internal());
        assert!(!alu.is_halting());

        let div = VMError::DivisionByZero {
            instruction: "DIV",
            pc: 0,
        };
        assert!(div.is_halting());
        assert!(!div.is_internal());

        let fault = VMError::AddressOutOfRange { address: 256, pc: 255 };
        assert!(!fault.is_halting());
        assert!(!fault.is_internal());
    }
}
