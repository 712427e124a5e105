// This module defines the single error type shared by every stage of the bfc pipeline, built
// with the thiserror crate. Error covers the malformed-program conditions found by the jump
// resolver (unmatched open or close brackets), the tape bounds check performed by the
// interpreter, backend capability failures (an opcode a code generator cannot emit), invalid
// configuration, and the I/O and x86-64 encoding failures propagated from std and iced-x86.
// Every variant carries enough context (source position, instruction index, head and tape
// size) to localize the fault. Result<T> is the crate-wide alias.

//! Error types for the bfc pipeline.

use thiserror::Error;

use super::instruction::Opcode;

/// Errors produced while loading, resolving, running or lowering a program.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unmatched ']' at offset {position} (instruction {index})")]
    UnmatchedCloseBracket { position: usize, index: usize },

    #[error("unmatched '[' at offset {position} (instruction {index})")]
    UnmatchedOpenBracket { position: usize, index: usize },

    #[error(
        "tape head moved out of bounds at offset {position} (instruction {index}): \
         head {head} moved by {offset} on a tape of {tape_size} cells"
    )]
    TapeBoundsExceeded {
        position: usize,
        index: usize,
        head: usize,
        offset: i64,
        tape_size: usize,
    },

    #[error("{backend} backend cannot emit {opcode} (offset {position}, instruction {index})")]
    UnsupportedOperation {
        backend: &'static str,
        opcode: Opcode,
        position: usize,
        index: usize,
    },

    #[error("tape size must be a positive integer, got {value:?}")]
    InvalidTapeSize { value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("x86-64 encoding failed: {0}")]
    Encoding(#[from] iced_x86::IcedError),

    #[error("{what} count {count} does not fit the immediate field")]
    ImmediateOutOfRange { what: &'static str, count: u32 },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
