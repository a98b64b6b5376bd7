use crate::virtual_machine::errors::VMError;

/// Number of addressable bytes.
pub const MEMORY_SIZE: usize = 256;

/// Flat, zero-initialized byte memory shared by code and stack.
///
/// Addresses are not wrapped: anything at or beyond [`MEMORY_SIZE`] is an
/// [`VMError::AddressOutOfRange`] fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Memory {
    pub(super) fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    /// Copies `image` to the start of memory.
    ///
    /// Callers go through [`Program`](crate::virtual_machine::program::Program), which has
    /// already rejected images larger than memory.
    pub(super) fn load(&mut self, image: &[u8]) {
        let len = image.len().min(MEMORY_SIZE);
        self.cells[..len].copy_from_slice(&image[..len]);
    }

    /// Reads the byte at `address`; `pc` is recorded in the fault.
    pub(super) fn read(&self, address: usize, pc: usize) -> Result<u8, VMError> {
        self.cells
            .get(address)
            .copied()
            .ok_or(VMError::AddressOutOfRange { address, pc })
    }

    /// Writes the byte at `address`; `pc` is recorded in the fault.
    pub(super) fn write(&mut self, address: usize, value: u8, pc: usize) -> Result<(), VMError> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(VMError::AddressOutOfRange { address, pc })?;
        *cell = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}
