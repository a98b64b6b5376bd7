use super::memory::Memory;
use super::registers::{Flags, Registers};
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;

/// Operand bytes of the instruction at the PC. Absent operands read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct Operands {
    pub(super) a: u8,
    pub(super) b: u8,
}

/// All mutable state of the machine: memory, registers, PC, flags and the running flag.
///
/// Every accessor that can leave the address space or the register file returns a
/// [`VMError`] tagged with the current PC.
#[derive(Clone, Debug)]
pub struct Machine {
    memory: Memory,
    registers: Registers,
    pc: usize,
    fl: Flags,
    running: bool,
}

impl Machine {
    pub(super) fn new(image: &[u8]) -> Self {
        let mut memory = Memory::new();
        memory.load(image);
        Self {
            memory,
            registers: Registers::new(),
            pc: 0,
            fl: Flags::default(),
            running: false,
        }
    }

    pub fn read(&self, address: usize) -> Result<u8, VMError> {
        self.memory.read(address, self.pc)
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), VMError> {
        self.memory.write(address, value, self.pc)
    }

    pub fn register(&self, idx: u8) -> Result<u8, VMError> {
        self.registers.get(idx, self.pc)
    }

    pub fn set_register(&mut self, idx: u8, value: u8) -> Result<(), VMError> {
        self.registers.set(idx, value, self.pc)
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    pub fn flags(&self) -> Flags {
        self.fl
    }

    pub fn set_flags(&mut self, fl: Flags) {
        self.fl = fl;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn sp(&self) -> u8 {
        self.registers.sp()
    }

    pub fn set_sp(&mut self, sp: u8) {
        self.registers.set_sp(sp);
    }

    /// Decrements SP (mod 256) and stores `value` at the new top of stack.
    pub fn push(&mut self, value: u8) -> Result<(), VMError> {
        let sp = self.sp().wrapping_sub(1);
        self.set_sp(sp);
        self.write(sp as usize, value)
    }

    /// Loads the top of stack and increments SP (mod 256).
    pub fn pop(&mut self) -> Result<u8, VMError> {
        let sp = self.sp();
        let value = self.read(sp as usize)?;
        self.set_sp(sp.wrapping_add(1));
        Ok(value)
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Reads the operand bytes of `instruction`, which sits at the current PC.
    pub(super) fn operands(&self, instruction: Instruction) -> Result<Operands, VMError> {
        let mut bytes = [0u8; 2];
        for (i, slot) in bytes
            .iter_mut()
            .enumerate()
            .take(instruction.operand_count())
        {
            *slot = self.read(self.pc + 1 + i)?;
        }
        Ok(Operands {
            a: bytes[0],
            b: bytes[1],
        })
    }
}
