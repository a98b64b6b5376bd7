//! Opcode dispatch table and instruction handlers.
//!
//! The table is a flat 256-slot array indexed by opcode byte. Each occupied slot holds the
//! decoded [`Instruction`], the handler, and whether that handler moves the PC itself.
//! Handlers read operand registers through the [`Machine`] and never advance the PC for
//! non-control instructions; the loop does that after they return.

use super::machine::{Machine, Operands};
use super::registers::Flags;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::output::Output;

/// An instruction fetched at the PC together with its operand bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Decoded {
    pub(super) instruction: Instruction,
    pub(super) a: u8,
    pub(super) b: u8,
}

impl Decoded {
    pub(super) fn new(instruction: Instruction, operands: Operands) -> Self {
        Self {
            instruction,
            a: operands.a,
            b: operands.b,
        }
    }
}

pub(super) type Handler = fn(&mut Machine, &mut dyn Output, Decoded) -> Result<(), VMError>;

/// One occupied slot of the dispatch table.
#[derive(Clone, Copy)]
pub(super) struct Entry {
    pub(super) instruction: Instruction,
    /// `true` when the handler leaves the PC where it wants the next fetch to happen.
    pub(super) sets_pc: bool,
    pub(super) handler: Handler,
}

pub(super) struct DispatchTable {
    entries: [Option<Entry>; 256],
}

macro_rules! dispatch_table {
    ( $( $variant:ident => $handler:ident ),* $(,)? ) => {{
        let mut entries: [Option<Entry>; 256] = [None; 256];
        $(
            entries[Instruction::$variant.opcode() as usize] = Some(Entry {
                instruction: Instruction::$variant,
                sets_pc: Instruction::$variant.sets_pc(),
                handler: $handler,
            });
        )*
        entries
    }};
}

impl DispatchTable {
    pub(super) fn new() -> Self {
        let entries = dispatch_table! {
            // Machine control
            Nop => op_nop,
            Hlt => op_hlt,
            // Loads, stores and output
            Ldi => op_ldi,
            Ld => op_ld,
            St => op_st,
            Prn => op_prn,
            Pra => op_pra,
            // ALU
            Add => op_alu_binary,
            Sub => op_alu_binary,
            Mul => op_alu_binary,
            Div => op_alu_binary,
            Mod => op_alu_binary,
            And => op_alu_binary,
            Or => op_alu_binary,
            Xor => op_alu_binary,
            Shl => op_alu_binary,
            Shr => op_alu_binary,
            Inc => op_alu_unary,
            Dec => op_alu_unary,
            Not => op_alu_unary,
            Cmp => op_cmp,
            // Stack
            Push => op_push,
            Pop => op_pop,
            // Control flow
            Call => op_call,
            Ret => op_ret,
            Jmp => op_jmp,
            Jeq => op_jeq,
            Jne => op_jne,
            Jgt => op_jgt,
            Jlt => op_jlt,
            Jle => op_jle,
            Jge => op_jge,
        };
        Self { entries }
    }

    pub(super) fn lookup(&self, opcode: u8) -> Option<Entry> {
        self.entries[opcode as usize]
    }
}

fn op_nop(_m: &mut Machine, _out: &mut dyn Output, _d: Decoded) -> Result<(), VMError> {
    Ok(())
}

fn op_hlt(m: &mut Machine, _out: &mut dyn Output, _d: Decoded) -> Result<(), VMError> {
    m.set_running(false);
    Ok(())
}

fn op_ldi(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    m.set_register(d.a, d.b)
}

fn op_ld(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let address = m.register(d.b)?;
    let value = m.read(address as usize)?;
    m.set_register(d.a, value)
}

fn op_st(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let address = m.register(d.a)?;
    let value = m.register(d.b)?;
    m.write(address as usize, value)
}

fn op_prn(m: &mut Machine, out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    out.print_value(m.register(d.a)?);
    Ok(())
}

fn op_pra(m: &mut Machine, out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    out.print_char(m.register(d.a)?);
    Ok(())
}

fn op_alu_binary(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    m.alu(d.instruction, d.a, Some(d.b))
}

fn op_alu_unary(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    m.alu(d.instruction, d.a, None)
}

fn op_cmp(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let a = m.register(d.a)?;
    let b = m.register(d.b)?;
    m.set_flags(Flags::compare(a, b));
    Ok(())
}

fn op_push(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let sp = m.sp().wrapping_sub(1);
    m.set_sp(sp);
    // Read after the decrement so `PUSH R7` stores the new stack pointer.
    let value = m.register(d.a)?;
    m.write(sp as usize, value)
}

fn op_pop(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let value = m.read(m.sp() as usize)?;
    m.set_register(d.a, value)?;
    // Re-read SP: `POP R7` increments the value it just loaded.
    m.set_sp(m.sp().wrapping_add(1));
    Ok(())
}

fn op_call(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let target = m.register(d.a)?;
    let next = m.pc() + d.instruction.encoded_len();
    let return_addr = u8::try_from(next).map_err(|_| VMError::AddressOutOfRange {
        address: next,
        pc: m.pc(),
    })?;
    m.push(return_addr)?;
    m.set_pc(target as usize);
    Ok(())
}

fn op_ret(m: &mut Machine, _out: &mut dyn Output, _d: Decoded) -> Result<(), VMError> {
    let return_addr = m.pop()?;
    m.set_pc(return_addr as usize);
    Ok(())
}

/// Jumps to the address in register `d.a` when `taken`, otherwise steps over the
/// instruction. Conditional jumps own the PC on both branches.
fn jump_if(m: &mut Machine, d: Decoded, taken: bool) -> Result<(), VMError> {
    if taken {
        let target = m.register(d.a)?;
        m.set_pc(target as usize);
    } else {
        m.set_pc(m.pc() + d.instruction.encoded_len());
    }
    Ok(())
}

fn op_jmp(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    jump_if(m, d, true)
}

fn op_jeq(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let fl = m.flags();
    jump_if(m, d, fl == Flags::EQUAL)
}

fn op_jne(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let fl = m.flags();
    jump_if(m, d, fl != Flags::EQUAL)
}

fn op_jgt(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let fl = m.flags();
    jump_if(m, d, fl.is_greater())
}

fn op_jlt(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let fl = m.flags();
    jump_if(m, d, fl.is_less())
}

fn op_jle(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let fl = m.flags();
    jump_if(m, d, fl.is_less() || fl.is_equal())
}

fn op_jge(m: &mut Machine, _out: &mut dyn Output, d: Decoded) -> Result<(), VMError> {
    let fl = m.flags();
    jump_if(m, d, fl.is_greater() || fl.is_equal())
}
