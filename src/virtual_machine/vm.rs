//! Core interpreter.
//!
//! The [`VM`] owns a [`Machine`] and a dispatch table and runs the fetch-decode-execute
//! loop until the program halts or faults:
//!
//! 1. fetch the opcode at the PC
//! 2. look it up in the dispatch table (no entry is a fault)
//! 3. read the operand bytes the opcode declares
//! 4. run the handler
//! 5. advance the PC by the instruction length unless the opcode's PC-control bit is set
//!
//! A machine runs exactly once: [`VM::run`] moves it from [`RunState::Ready`] to either
//! [`RunState::Halted`] or [`RunState::Faulted`].

mod alu;
mod dispatch;
mod machine;
mod memory;
mod registers;

pub use alu::AluOp;
pub use machine::Machine;
pub use memory::{MEMORY_SIZE, Memory};
pub use registers::{Flags, REGISTER_COUNT, Registers, SP, STACK_START};

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::output::Output;
use crate::virtual_machine::program::Program;
use dispatch::{Decoded, DispatchTable};
use std::fmt::Write;

/// Lifecycle of a [`VM`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Program loaded, nothing executed yet.
    Ready,
    /// Inside [`VM::run`].
    Running,
    /// Stopped by `HLT` or by a division by zero.
    Halted,
    /// Stopped by an unrecoverable error.
    Faulted,
}

/// LS-8 interpreter.
pub struct VM {
    machine: Machine,
    table: DispatchTable,
    state: RunState,
    /// Instructions executed to completion.
    steps: u64,
    trace: bool,
}

impl VM {
    /// Creates a machine with `program` loaded at address 0.
    pub fn new(program: Program) -> Self {
        Self {
            machine: Machine::new(program.as_bytes()),
            table: DispatchTable::new(),
            state: RunState::Ready,
            steps: 0,
            trace: false,
        }
    }

    /// Emits a trace line to the output before every instruction when enabled.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Runs the program to completion.
    ///
    /// Returns `Ok(RunState::Halted)` after `HLT` or a division by zero (the latter also
    /// writes a diagnostic). Any other error writes a diagnostic, leaves the machine in
    /// [`RunState::Faulted`] and is returned. Calling `run` twice is an
    /// [`VMError::InvalidState`] error.
    pub fn run<O: Output>(&mut self, out: &mut O) -> Result<RunState, VMError> {
        if self.state != RunState::Ready {
            return Err(VMError::InvalidState { state: self.state });
        }
        self.state = RunState::Running;
        self.machine.set_running(true);

        while self.machine.running() {
            if self.trace {
                out.trace(&self.trace_line());
            }
            match self.step(out) {
                Ok(()) => self.steps += 1,
                Err(err) if err.is_halting() => {
                    out.diagnostic(&err.to_string());
                    self.machine.set_running(false);
                }
                Err(err) => {
                    out.diagnostic(&err.to_string());
                    self.machine.set_running(false);
                    self.state = RunState::Faulted;
                    return Err(err);
                }
            }
        }

        self.state = RunState::Halted;
        Ok(self.state)
    }

    /// Executes the instruction at the PC.
    fn step(&mut self, out: &mut dyn Output) -> Result<(), VMError> {
        let pc = self.machine.pc();
        let opcode = self.machine.read(pc)?;
        let entry = self
            .table
            .lookup(opcode)
            .ok_or(VMError::UnrecognizedOpcode { opcode, pc })?;
        let operands = self.machine.operands(entry.instruction)?;

        (entry.handler)(
            &mut self.machine,
            out,
            Decoded::new(entry.instruction, operands),
        )?;

        if !entry.sets_pc {
            self.machine
                .set_pc(pc + entry.instruction.encoded_len());
        }
        Ok(())
    }

    /// Formats the machine state as
    /// `TRACE: PC | FL | M[PC] M[PC+1] M[PC+2] | R0 .. R7`, in hex.
    pub fn trace_line(&self) -> String {
        let pc = self.machine.pc();
        let mut line = format!("TRACE: {:02X} | {:02X} |", pc, self.machine.flags().bits());
        for address in pc..pc + 3 {
            match self.machine.read(address) {
                Ok(byte) => {
                    let _ = write!(line, " {byte:02X}");
                }
                Err(_) => line.push_str(" --"),
            }
        }
        line.push_str(" |");
        for reg in self.machine.registers().as_slice() {
            let _ = write!(line, " {reg:02X}");
        }
        line
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn registers(&self) -> &Registers {
        self.machine.registers()
    }

    pub fn memory(&self) -> &Memory {
        self.machine.memory()
    }

    /// Value of register `idx`, or `None` outside `0..8`.
    pub fn register(&self, idx: u8) -> Option<u8> {
        self.machine.register(idx).ok()
    }

    pub fn pc(&self) -> usize {
        self.machine.pc()
    }

    pub fn flags(&self) -> Flags {
        self.machine.flags()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
