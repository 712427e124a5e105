//! bfc - compiler and interpreter for the eight-operator tape machine language.
//!
//! Source bytes are decoded into a run-length folded instruction stream,
//! bracket targets are resolved ahead of time into a jump table, and the
//! resolved stream is either interpreted on a fixed-size byte tape or lowered
//! to C, x86-64 or AArch64 assembly text.
//!
//! # Primary Usage
//!
//! ```
//! use bfc::{Config, Session};
//!
//! let session = Session::new(Config::default());
//! let mut output = Vec::new();
//! session.run(b"++[>+<-]>.", &b""[..], &mut output)?;
//! assert_eq!(output, vec![2]);
//! # Ok::<(), bfc::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`core`] - instruction model, programs, configuration, errors
//! - [`frontend`] - loader and jump resolver
//! - [`interpreter`] - tape and interpreter
//! - [`codegen`] - backend trait, target selection, capability check
//! - [`csource`], [`x64`], [`arm64`] - the three backends
//! - [`session`] - pipeline driver

pub mod arm64;
pub mod codegen;
pub mod core;
pub mod csource;
pub mod frontend;
pub mod interpreter;
pub mod session;
pub mod x64;

pub use codegen::{generate, Backend, Target};
pub use self::core::{
    Config, Error, Instruction, Opcode, Operation, Program, ResolvedProgram, Result, TapeSize,
    DEFAULT_TAPE_SIZE,
};
pub use frontend::{load, resolve, Loader};
pub use interpreter::{Interpreter, Tape};
pub use session::{Mode, Session};
