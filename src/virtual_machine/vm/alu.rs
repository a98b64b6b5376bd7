//! Arithmetic and logic unit.
//!
//! All results are 8-bit and wrap modulo 256. Shifts by eight or more positions
//! produce zero.

use super::machine::Machine;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;

/// Operations the ALU can perform on register values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Inc,
    Dec,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
}

impl TryFrom<Instruction> for AluOp {
    type Error = VMError;

    /// Maps an instruction to its ALU operation.
    ///
    /// Any other instruction yields [`VMError::UnsupportedAluOperation`]; reaching that
    /// branch means the dispatch table routed the wrong handler.
    fn try_from(instruction: Instruction) -> Result<Self, Self::Error> {
        Ok(match instruction {
            Instruction::Add => AluOp::Add,
            Instruction::Sub => AluOp::Sub,
            Instruction::Mul => AluOp::Mul,
            Instruction::Div => AluOp::Div,
            Instruction::Mod => AluOp::Mod,
            Instruction::Inc => AluOp::Inc,
            Instruction::Dec => AluOp::Dec,
            Instruction::And => AluOp::And,
            Instruction::Or => AluOp::Or,
            Instruction::Xor => AluOp::Xor,
            Instruction::Not => AluOp::Not,
            Instruction::Shl => AluOp::Shl,
            Instruction::Shr => AluOp::Shr,
            other => {
                return Err(VMError::UnsupportedAluOperation {
                    instruction: other.mnemonic(),
                });
            }
        })
    }
}

impl AluOp {
    /// Whether the operation reads only its destination register.
    pub const fn is_unary(&self) -> bool {
        matches!(self, AluOp::Inc | AluOp::Dec | AluOp::Not)
    }

    /// Computes `a op b`. Returns `None` when `DIV` or `MOD` would divide by zero.
    pub fn apply(&self, a: u8, b: u8) -> Option<u8> {
        Some(match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Div => a.checked_div(b)?,
            AluOp::Mod => a.checked_rem(b)?,
            AluOp::Inc => a.wrapping_add(1),
            AluOp::Dec => a.wrapping_sub(1),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::Not => !a,
            AluOp::Shl => a.checked_shl(u32::from(b)).unwrap_or(0),
            AluOp::Shr => a.checked_shr(u32::from(b)).unwrap_or(0),
        })
    }
}

impl Machine {
    /// Applies `instruction` to register `dst`, reading `src` as the second operand.
    ///
    /// Unary operations ignore `src`. On division by zero `dst` is left unchanged and
    /// [`VMError::DivisionByZero`] is returned for the loop to turn into a halt.
    pub fn alu(&mut self, instruction: Instruction, dst: u8, src: Option<u8>) -> Result<(), VMError> {
        let op = AluOp::try_from(instruction)?;
        let a = self.register(dst)?;
        let b = match (op.is_unary(), src) {
            (true, _) => 0,
            (false, Some(src)) => self.register(src)?,
            (false, None) => {
                return Err(VMError::UnsupportedAluOperation {
                    instruction: instruction.mnemonic(),
                });
            }
        };
        let result = op.apply(a, b).ok_or(VMError::DivisionByZero {
            instruction: instruction.mnemonic(),
            pc: self.pc(),
        })?;
        self.set_register(dst, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_with(r0: u8, r1: u8) -> Machine {
        let mut m = Machine::new(&[]);
        m.set_register(0, r0).unwrap();
        m.set_register(1, r1).unwrap();
        m
    }

    fn run_alu(instruction: Instruction, r0: u8, r1: u8) -> u8 {
        let mut m = machine_with(r0, r1);
        m.alu(instruction, 0, Some(1)).unwrap();
        m.register(0).unwrap()
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(run_alu(Instruction::Add, 200, 100), 44);
        assert_eq!(run_alu(Instruction::Sub, 3, 5), 254);
        assert_eq!(run_alu(Instruction::Mul, 16, 17), 16);
        assert_eq!(run_alu(Instruction::Mul, 8, 9), 72);
    }

    #[test]
    fn division_floors() {
        assert_eq!(run_alu(Instruction::Div, 7, 2), 3);
        assert_eq!(run_alu(Instruction::Mod, 7, 2), 1);
        assert_eq!(run_alu(Instruction::Div, 255, 255), 1);
    }

    #[test]
    fn bitwise() {
        assert_eq!(run_alu(Instruction::And, 0b1100, 0b1010), 0b1000);
        assert_eq!(run_alu(Instruction::Or, 0b1100, 0b1010), 0b1110);
        assert_eq!(run_alu(Instruction::Xor, 0b1100, 0b1010), 0b0110);
    }

    #[test]
    fn shifts_drop_bits() {
        assert_eq!(run_alu(Instruction::Shl, 0b1000_0001, 1), 0b0000_0010);
        assert_eq!(run_alu(Instruction::Shr, 0b1000_0001, 7), 1);
        assert_eq!(run_alu(Instruction::Shl, 0xFF, 8), 0);
        assert_eq!(run_alu(Instruction::Shr, 0xFF, 200), 0);
    }

    #[test]
    fn unary_ops_ignore_src() {
        let mut m = machine_with(0b1010_0101, 99);
        m.alu(Instruction::Not, 0, None).unwrap();
        assert_eq!(m.register(0), Ok(0b0101_1010));
        m.alu(Instruction::Not, 0, Some(1)).unwrap();
        assert_eq!(m.register(0), Ok(0b1010_0101));

        let mut m = machine_with(255, 0);
        m.alu(Instruction::Inc, 0, None).unwrap();
        assert_eq!(m.register(0), Ok(0));
        m.alu(Instruction::Dec, 0, None).unwrap();
        assert_eq!(m.register(0), Ok(255));
    }

    #[test]
    fn divide_by_zero_leaves_dst() {
        for instr in [Instruction::Div, Instruction::Mod] {
            let mut m = machine_with(10, 0);
            let err = m.alu(instr, 0, Some(1)).unwrap_err();
            assert!(matches!(err, VMError::DivisionByZero { .. }));
            assert_eq!(m.register(0), Ok(10));
        }
    }

    #[test]
    fn non_alu_instruction_is_internal_error() {
        let mut m = machine_with(1, 2);
        let err = m.alu(Instruction::Ldi, 0, Some(1)).unwrap_err();
        assert_eq!(err, VMError::UnsupportedAluOperation { instruction: "LDI" });
        assert!(err.is_internal());

        let err = m.alu(Instruction::Cmp, 0, Some(1)).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn binary_op_without_src_is_internal_error() {
        let mut m = machine_with(1, 2);
        assert!(m.alu(Instruction::Add, 0, None).unwrap_err().is_internal());
        assert_eq!(m.register(0), Ok(1));
    }

    #[test]
    fn every_alu_opcode_except_cmp_maps_to_an_op() {
        for &instr in Instruction::ALL {
            let mapped = AluOp::try_from(instr).is_ok();
            assert_eq!(mapped, instr.is_alu() && instr != Instruction::Cmp, "{}", instr.mnemonic());
        }
    }
}
