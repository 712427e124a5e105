// This module is the hub for the types every bfc stage shares: the instruction model
// (opcodes, operations carrying a count or a jump target, positioned instructions), the
// program containers that separate unresolved loader output from resolved sequences, the
// pipeline configuration (tape size and run-length folding), and the crate-wide error enum.
// Nothing in here executes or emits code; the frontend, interpreter and backends build on it.

//! Core types shared by the loader, resolver, interpreter and backends.
//!
//! # Key Components
//!
//! ## Instruction model (`instruction`)
//! - [`Opcode`]: the eight operators and their source symbols
//! - [`Operation`]: opcode plus count or bracket target as one tagged value
//! - [`Instruction`]: an operation with its source offset
//!
//! ## Programs (`program`)
//! - [`Program`]: loader output, brackets unresolved
//! - [`ResolvedProgram`]: resolver output, consumed by every backend
//!
//! ## Configuration (`config`) and errors (`error`)

pub mod config;
pub mod error;
pub mod instruction;
pub mod program;

pub use config::{Config, TapeSize, DEFAULT_TAPE_SIZE};
pub use error::{Error, Result};
pub use instruction::{Instruction, Opcode, Operation};
pub use program::{Program, ResolvedProgram};
