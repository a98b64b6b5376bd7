//! LS-8 program images and the text loader.
//!
//! Programs are distributed as text: one 8-digit binary literal per line, with `#`
//! starting a comment that runs to the end of the line.
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::vm::MEMORY_SIZE;
use std::fs;
use std::path::Path;

/// Width of one binary literal in the text encoding.
const LITERAL_WIDTH: usize = 8;

/// Instruction bytes ready to be written into memory from address 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Wraps already-decoded bytes, rejecting images larger than memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, VMError> {
        if bytes.len() > MEMORY_SIZE {
            return Err(VMError::ProgramTooLarge {
                size: bytes.len(),
                capacity: MEMORY_SIZE,
            });
        }
        Ok(Self { bytes })
    }

    /// Parses the text encoding.
    ///
    /// Blank and comment-only lines are skipped. Every other line must hold exactly one
    /// 8-digit binary literal.
    pub fn parse(source: &str) -> Result<Self, VMError> {
        let mut bytes = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let token = raw.split('#').next().unwrap_or_default().trim();
            if token.is_empty() {
                continue;
            }
            bytes.push(parse_literal(token).ok_or_else(|| VMError::InvalidBinaryLiteral {
                line: index + 1,
                token: token.to_string(),
            })?);
        }
        Self::from_bytes(bytes)
    }

    /// Reads and parses a program file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VMError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| VMError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&source)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Parses one fixed-width binary literal.
fn parse_literal(token: &str) -> Option<u8> {
    if token.len() != LITERAL_WIDTH || !token.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(token, 2).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PRINT8: &str = "\
# Print the number 8

10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";

    #[test]
    fn parse_skips_comments_and_blanks() {
        let program = Program::parse(PRINT8).unwrap();
        assert_eq!(
            program.as_bytes(),
            &[0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
        );
    }

    #[test]
    fn parse_accepts_crlf_and_indentation() {
        let program = Program::parse("  00000001  \r\n\t10000010#x\r\n").unwrap();
        assert_eq!(program.as_bytes(), &[1, 0b1000_0010]);
    }

    #[test]
    fn parse_rejects_short_literal() {
        let err = Program::parse("00000001\n0101\n").unwrap_err();
        assert_eq!(
            err,
            VMError::InvalidBinaryLiteral {
                line: 2,
                token: "0101".to_string()
            }
        );
    }

    #[test]
    fn parse_rejects_non_binary_digits() {
        assert!(matches!(
            Program::parse("00000002"),
            Err(VMError::InvalidBinaryLiteral { line: 1, .. })
        ));
        assert!(matches!(
            Program::parse("+0000001"),
            Err(VMError::InvalidBinaryLiteral { line: 1, .. })
        ));
    }

    #[test]
    fn parse_rejects_two_literals_on_one_line() {
        assert!(matches!(
            Program::parse("00000001 00000001"),
            Err(VMError::InvalidBinaryLiteral { line: 1, .. })
        ));
    }

    #[test]
    fn parse_accepts_exactly_full_memory() {
        let source = "00000000\n".repeat(MEMORY_SIZE);
        assert_eq!(Program::parse(&source).unwrap().len(), MEMORY_SIZE);
    }

    #[test]
    fn parse_rejects_oversized_program() {
        let source = "00000000\n".repeat(MEMORY_SIZE + 1);
        assert_eq!(
            Program::parse(&source).unwrap_err(),
            VMError::ProgramTooLarge {
                size: MEMORY_SIZE + 1,
                capacity: MEMORY_SIZE
            }
        );
    }

    #[test]
    fn empty_source_is_empty_program() {
        let program = Program::parse("# nothing here\n\n").unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn from_file_reads_program() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PRINT8.as_bytes()).unwrap();
        let program = Program::from_file(file.path()).unwrap();
        assert_eq!(program.len(), 6);
    }

    #[test]
    fn from_file_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Program::from_file(dir.path().join("missing.ls8")).unwrap_err();
        assert!(matches!(err, VMError::Io { .. }));
    }
}
