use crate::virtual_machine::errors::VMError;
use std::cmp::Ordering;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// Register reserved as the stack pointer.
pub const SP: u8 = 7;
/// Initial stack pointer. The stack grows down from here.
pub const STACK_START: u8 = 0xF4;

/// Register file of eight 8-bit registers.
///
/// `R7` starts at [`STACK_START`]; every other register starts at zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    regs: [u8; REGISTER_COUNT],
}

impl Registers {
    pub(super) fn new() -> Self {
        let mut regs = [0; REGISTER_COUNT];
        regs[SP as usize] = STACK_START;
        Self { regs }
    }

    /// Returns the value in register `idx`.
    ///
    /// Returns [`VMError::InvalidRegisterIndex`] if `idx` is not in `0..8`.
    pub(super) fn get(&self, idx: u8, pc: usize) -> Result<u8, VMError> {
        self.regs
            .get(idx as usize)
            .copied()
            .ok_or(VMError::InvalidRegisterIndex { index: idx, pc })
    }

    /// Stores `value` into register `idx`.
    ///
    /// Returns [`VMError::InvalidRegisterIndex`] if `idx` is not in `0..8`.
    pub(super) fn set(&mut self, idx: u8, value: u8, pc: usize) -> Result<(), VMError> {
        let slot = self
            .regs
            .get_mut(idx as usize)
            .ok_or(VMError::InvalidRegisterIndex { index: idx, pc })?;
        *slot = value;
        Ok(())
    }

    pub(super) fn sp(&self) -> u8 {
        self.regs[SP as usize]
    }

    pub(super) fn set_sp(&mut self, value: u8) {
        self.regs[SP as usize] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.regs
    }
}

/// Comparison result register (`FL`), written by `CMP` and read by conditional jumps.
///
/// At most one bit is set: `0b001` equal, `0b010` greater, `0b100` less.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const EQUAL: Flags = Flags(0b0000_0001);
    pub const GREATER: Flags = Flags(0b0000_0010);
    pub const LESS: Flags = Flags(0b0000_0100);

    /// Flags for comparing `a` against `b`.
    pub fn compare(a: u8, b: u8) -> Self {
        match a.cmp(&b) {
            Ordering::Equal => Flags::EQUAL,
            Ordering::Greater => Flags::GREATER,
            Ordering::Less => Flags::LESS,
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_equal(self) -> bool {
        self.0 & Flags::EQUAL.0 != 0
    }

    pub const fn is_greater(self) -> bool {
        self.0 & Flags::GREATER.0 != 0
    }

    pub const fn is_less(self) -> bool {
        self.0 & Flags::LESS.0 != 0
    }
}
