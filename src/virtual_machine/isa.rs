//! Instruction Set Architecture (ISA) definitions.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the canonical
//! instruction list and invokes a callback macro with it, so the opcode enum and the static
//! ISA check are generated from a single source.
//!
//! # Instruction format
//!
//! An instruction is one opcode byte followed by zero to two operand bytes. The opcode byte
//! carries its own decoding metadata:
//!
//! ```text
//!   7 6   5   4   3 2 1 0
//!  [ n ] [A] [P] [ id   ]
//! ```
//!
//! - `n` (bits 6-7): number of operand bytes
//! - `A` (bit 5): instruction is executed by the ALU
//! - `P` (bit 4): the handler sets the PC itself; the loop must not advance it
//! - `id` (bits 0-3): instruction identifier within its group

use crate::virtual_machine::errors::VMError;

/// Mask selecting the operand count bits of an opcode.
pub const OPERAND_COUNT_MASK: u8 = 0b1100_0000;
/// Opcode bit marking ALU instructions.
pub const ALU_BIT: u8 = 0b0010_0000;
/// Opcode bit marking instructions whose handler controls the PC.
pub const SETS_PC_BIT: u8 = 0b0001_0000;

/// Number of operand bytes following `opcode`.
pub const fn operand_count(opcode: u8) -> usize {
    ((opcode & OPERAND_COUNT_MASK) >> 6) as usize
}

/// Whether the handler for `opcode` moves the PC on its own.
pub const fn sets_pc(opcode: u8) -> bool {
    opcode & SETS_PC_BIT != 0
}

/// Invokes a callback macro with the complete instruction definition list.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Machine control
            // =========================
            /// NOP ; does nothing
            Nop = 0b0000_0000, "NOP" => [],
            /// HLT ; stops the machine
            Hlt = 0b0000_0001, "HLT" => [],
            // =========================
            // Loads, stores and output
            // =========================
            /// LDI ra, imm ; ra = imm
            Ldi = 0b1000_0010, "LDI" => [ra: Reg, imm: Imm],
            /// LD ra, rb ; ra = memory[rb]
            Ld = 0b1000_0011, "LD" => [ra: Reg, rb: Reg],
            /// ST ra, rb ; memory[ra] = rb
            St = 0b1000_0100, "ST" => [ra: Reg, rb: Reg],
            /// PRN ra ; prints ra as a decimal number
            Prn = 0b0100_0111, "PRN" => [ra: Reg],
            /// PRA ra ; prints ra as an ASCII character
            Pra = 0b0100_1000, "PRA" => [ra: Reg],
            // =========================
            // ALU
            // =========================
            /// ADD ra, rb ; ra = ra + rb
            Add = 0b1010_0000, "ADD" => [ra: Reg, rb: Reg],
            /// SUB ra, rb ; ra = ra - rb
            Sub = 0b1010_0001, "SUB" => [ra: Reg, rb: Reg],
            /// MUL ra, rb ; ra = ra * rb
            Mul = 0b1010_0010, "MUL" => [ra: Reg, rb: Reg],
            /// DIV ra, rb ; ra = ra / rb (halts on division by zero)
            Div = 0b1010_0011, "DIV" => [ra: Reg, rb: Reg],
            /// MOD ra, rb ; ra = ra % rb (halts on division by zero)
            Mod = 0b1010_0100, "MOD" => [ra: Reg, rb: Reg],
            /// INC ra ; ra = ra + 1
            Inc = 0b0110_0101, "INC" => [ra: Reg],
            /// DEC ra ; ra = ra - 1
            Dec = 0b0110_0110, "DEC" => [ra: Reg],
            /// CMP ra, rb ; FL = EQUAL, GREATER or LESS
            Cmp = 0b1010_0111, "CMP" => [ra: Reg, rb: Reg],
            /// AND ra, rb ; ra = ra & rb
            And = 0b1010_1000, "AND" => [ra: Reg, rb: Reg],
            /// NOT ra ; ra = !ra
            Not = 0b0110_1001, "NOT" => [ra: Reg],
            /// OR ra, rb ; ra = ra | rb
            Or = 0b1010_1010, "OR" => [ra: Reg, rb: Reg],
            /// XOR ra, rb ; ra = ra ^ rb
            Xor = 0b1010_1011, "XOR" => [ra: Reg, rb: Reg],
            /// SHL ra, rb ; ra = ra << rb
            Shl = 0b1010_1100, "SHL" => [ra: Reg, rb: Reg],
            /// SHR ra, rb ; ra = ra >> rb
            Shr = 0b1010_1101, "SHR" => [ra: Reg, rb: Reg],
            // =========================
            // Stack
            // =========================
            /// PUSH ra ; SP -= 1; memory[SP] = ra
            Push = 0b0100_0101, "PUSH" => [ra: Reg],
            /// POP ra ; ra = memory[SP]; SP += 1
            Pop = 0b0100_0110, "POP" => [ra: Reg],
            // =========================
            // Control flow
            // =========================
            /// CALL ra ; push return address; PC = ra
            Call = 0b0101_0000, "CALL" => [ra: Reg],
            /// RET ; PC = pop()
            Ret = 0b0001_0001, "RET" => [],
            /// JMP ra ; PC = ra
            Jmp = 0b0101_0100, "JMP" => [ra: Reg],
            /// JEQ ra ; if FL is EQUAL then PC = ra
            Jeq = 0b0101_0101, "JEQ" => [ra: Reg],
            /// JNE ra ; if FL is not EQUAL then PC = ra
            Jne = 0b0101_0110, "JNE" => [ra: Reg],
            /// JGT ra ; if FL is GREATER then PC = ra
            Jgt = 0b0101_0111, "JGT" => [ra: Reg],
            /// JLT ra ; if FL is LESS then PC = ra
            Jlt = 0b0101_1000, "JLT" => [ra: Reg],
            /// JLE ra ; if FL is LESS or EQUAL then PC = ra
            Jle = 0b0101_1001, "JLE" => [ra: Reg],
            /// JGE ra ; if FL is GREATER or EQUAL then PC = ra
            Jge = 0b0101_1010, "JGE" => [ra: Reg],
        }
    };
}

#[macro_export]
macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $opcode:literal, $mnemonic:literal => [
                $( $field:ident : $kind:ident ),* $(,)?
            ]
        ),* $(,)?
    ) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name = $opcode,
            )*
        }

        impl TryFrom<u8> for Instruction {
            type Error = VMError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $opcode => Ok(Instruction::$name), )*
                    _ => Err(VMError::UnrecognizedOpcode {
                        opcode: value,
                        pc: 0,
                    }),
                }
            }
        }

        impl Instruction {
            /// Every instruction in opcode-table order.
            pub const ALL: &'static [Instruction] = &[ $( Instruction::$name, )* ];

            /// Returns the assembly mnemonic for this instruction.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Instruction::$name => $mnemonic, )*
                }
            }
        }
    };
}

for_each_instruction!(define_instructions);

impl Instruction {
    /// Returns the raw opcode byte.
    pub const fn opcode(&self) -> u8 {
        *self as u8
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_count(&self) -> usize {
        operand_count(self.opcode())
    }

    /// Total encoded length, opcode included.
    pub const fn encoded_len(&self) -> usize {
        self.operand_count() + 1
    }

    /// Whether the handler controls the PC. When `false` the loop advances it by [`encoded_len`](Self::encoded_len).
    pub const fn sets_pc(&self) -> bool {
        sets_pc(self.opcode())
    }

    /// Whether the instruction is executed by the ALU.
    pub const fn is_alu(&self) -> bool {
        self.opcode() & ALU_BIT != 0
    }
}
