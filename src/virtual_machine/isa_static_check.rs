#[cfg(test)]
mod tests {
    use crate::virtual_machine::isa::Instruction;

    /// Declared operand layout of one table entry.
    struct Declared {
        instruction: Instruction,
        mnemonic: &'static str,
        operands: &'static [&'static str],
    }

    macro_rules! collect_isa {
        (
            $( $(#[$doc:meta])* $name:ident = $opcode:literal, $mnemonic:literal => [ $( $field:ident : $kind:ident ),* $(,)? ] ),* $(,)?
        ) => {
            vec![
                $(
                    Declared {
                        instruction: Instruction::$name,
                        mnemonic: $mnemonic,
                        operands: &[ $( stringify!($kind) ),* ],
                    },
                )*
            ]
        };
    }

    fn declared() -> Vec<Declared> {
        crate::for_each_instruction!(collect_isa)
    }

    #[test]
    fn operand_count_bits_match_declared_operands() {
        for entry in declared() {
            assert_eq!(
                entry.instruction.operand_count(),
                entry.operands.len(),
                "{}: opcode bits disagree with operand list",
                entry.mnemonic
            );
        }
    }

    #[test]
    fn mnemonic_matches_variant() {
        for entry in declared() {
            assert_eq!(entry.instruction.mnemonic(), entry.mnemonic);
        }
    }

    #[test]
    fn only_jumps_and_returns_set_pc() {
        for entry in declared() {
            let is_control = matches!(
                entry.mnemonic,
                "CALL" | "RET" | "JMP" | "JEQ" | "JNE" | "JGT" | "JLT" | "JLE" | "JGE"
            );
            assert_eq!(entry.instruction.sets_pc(), is_control, "{}", entry.mnemonic);
        }
    }

    #[test]
    fn immediates_only_on_ldi() {
        for entry in declared() {
            let has_imm = entry.operands.contains(&"Imm");
            assert_eq!(has_imm, entry.instruction == Instruction::Ldi, "{}", entry.mnemonic);
        }
    }
}
