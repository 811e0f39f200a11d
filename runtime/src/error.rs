use thiserror::Error;

/// Failures that can only be detected while a program executes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A capture group was opened while another was still open.
    #[error("nested capture group opened at instruction {pc:04}")]
    NestedGroup { pc: usize },
    #[error("character range {start:?}-{end:?} spans multi-byte characters")]
    MultiByteRange { start: char, end: char },
}
