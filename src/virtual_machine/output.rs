//! Output sink the interpreter writes to.
//!
//! The [`Output`] trait is the only I/O surface of the machine: `PRN` and `PRA` write
//! through it, and so do halt/fault diagnostics and trace lines. [`StdOutput`] is what
//! the runner uses; [`BufferOutput`] keeps everything in memory.

use std::io::{self, Write};

/// Synchronous sink for program output and machine diagnostics.
pub trait Output {
    /// Emits a register value as a decimal number followed by a newline (`PRN`).
    fn print_value(&mut self, value: u8);
    /// Emits a register value as a single character (`PRA`).
    fn print_char(&mut self, byte: u8);
    /// Emits a diagnostic such as a divide-by-zero or unrecognized-opcode report.
    fn diagnostic(&mut self, message: &str);
    /// Emits one trace line. Ignored unless the sink cares about tracing.
    fn trace(&mut self, _line: &str) {}
}

/// Writes program output to stdout and diagnostics and traces to stderr.
#[derive(Debug, Default)]
pub struct StdOutput;

impl Output for StdOutput {
    fn print_value(&mut self, value: u8) {
        let _ = writeln!(io::stdout().lock(), "{value}");
    }

    fn print_char(&mut self, byte: u8) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", byte as char);
        let _ = stdout.flush();
    }

    fn diagnostic(&mut self, message: &str) {
        let _ = writeln!(io::stderr().lock(), "{message}");
    }

    fn trace(&mut self, line: &str) {
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

/// Records everything written to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferOutput {
    /// Program output exactly as it would appear on stdout.
    pub stdout: String,
    /// Values passed to `PRN`, in order.
    pub values: Vec<u8>,
    /// Diagnostics, in order.
    pub diagnostics: Vec<String>,
    /// Trace lines, in order.
    pub traces: Vec<String>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for BufferOutput {
    fn print_value(&mut self, value: u8) {
        self.values.push(value);
        self.stdout.push_str(&value.to_string());
        self.stdout.push('\n');
    }

    fn print_char(&mut self, byte: u8) {
        self.stdout.push(byte as char);
    }

    fn diagnostic(&mut self, message: &str) {
        self.diagnostics.push(message.to_string());
    }

    fn trace(&mut self, line: &str) {
        self.traces.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_records_values_and_text() {
        let mut out = BufferOutput::new();
        out.print_value(72);
        out.print_char(b'H');
        out.print_char(b'i');
        assert_eq!(out.values, vec![72]);
        assert_eq!(out.stdout, "72\nHi");
    }

    #[test]
    fn buffer_keeps_diagnostics_separate() {
        let mut out = BufferOutput::new();
        out.diagnostic("division by zero");
        out.trace("TRACE: 00");
        assert!(out.stdout.is_empty());
        assert_eq!(out.diagnostics, vec!["division by zero".to_string()]);
        assert_eq!(out.traces, vec!["TRACE: 00".to_string()]);
    }

    struct Silent;

    impl Output for Silent {
        fn print_value(&mut self, _value: u8) {}
        fn print_char(&mut self, _byte: u8) {}
        fn diagnostic(&mut self, _message: &str) {}
    }

    #[test]
    fn trace_defaults_to_noop() {
        let mut out = Silent;
        out.trace("ignored");
    }
}
