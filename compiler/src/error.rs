use thiserror::Error;

/// A malformed pattern. Every variant carries the byte offset into the
/// pattern at which the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unmatched `)` at offset {offset}")]
    UnmatchedCloseParen { offset: usize },
    #[error("unterminated group opened at offset {offset}")]
    UnterminatedGroup { offset: usize },
    #[error("unterminated bracket expression opened at offset {offset}")]
    UnterminatedBracket { offset: usize },
    #[error("dangling escape at offset {offset}")]
    DanglingEscape { offset: usize },
    /// `^` is only valid at the start of a pattern and `$` only at the end.
    #[error("misplaced anchor `{anchor}` at offset {offset}")]
    MisplacedAnchor { anchor: char, offset: usize },
    #[error("unescaped `:` at offset {offset} outside of a bracket expression")]
    StrayClassDelimiter { offset: usize },
    #[error("unknown character class `[:{name}:]` at offset {offset}")]
    UnknownClass { name: String, offset: usize },
    #[error("invalid character range `{start}-{end}` at offset {offset}")]
    InvalidRange {
        start: char,
        end: char,
        offset: usize,
    },
    #[error("character range at offset {offset} contains a multi-byte character")]
    MultiByteRange { offset: usize },
    #[error("malformed repetition at offset {offset}")]
    MalformedRepetition { offset: usize },
    #[error("negative repetition bound at offset {offset}")]
    NegativeRepetition { offset: usize },
    #[error("quantifier at offset {offset} has nothing to repeat")]
    NothingToRepeat { offset: usize },
    #[error("quantifier at offset {offset} applied to an empty group")]
    EmptyGroupRepetition { offset: usize },
}
