// This module defines the pluggable code generation layer. Backend is the trait every target
// implements: a name for diagnostics, a capability check telling whether an opcode can be
// lowered, and an emit function that walks the resolved instruction sequence once and returns
// complete target text for a given tape size. Target enumerates the built-in backends (C
// source, x86-64 GNU assembly, AArch64 GNU assembly) and is what the command line selects.
// generate() is the single entry point: it runs the capability check over the whole program
// first, so an unsupported Read fails with UnsupportedOperation before any text is produced,
// and only then hands the program to the backend.

//! Code generation: the [`Backend`] trait and backend selection.

use std::fmt;

use crate::arm64::Arm64Backend;
use crate::core::{Error, Opcode, ResolvedProgram, Result, TapeSize};
use crate::csource::CBackend;
use crate::x64::X64Backend;

/// A code generator for one target representation.
pub trait Backend {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this backend can lower `opcode`.
    fn supports(&self, opcode: Opcode) -> bool;

    /// Lower `program` to target text. Callers go through [`generate`], which
    /// has already rejected unsupported opcodes.
    fn emit(&self, program: &ResolvedProgram, tape_size: TapeSize) -> Result<String>;
}

/// Built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Target {
    /// Portable C translation unit.
    C,
    /// x86-64 assembly, GNU as / AT&T syntax.
    #[value(name = "x86-64")]
    X86_64,
    /// AArch64 assembly, GNU as syntax.
    Arm64,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::C, Target::X86_64, Target::Arm64];

    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Target::C => Box::new(CBackend),
            Target::X86_64 => Box::new(X64Backend),
            Target::Arm64 => Box::new(Arm64Backend),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Target::C => "c",
            Target::X86_64 => "x86-64",
            Target::Arm64 => "arm64",
        };
        f.write_str(name)
    }
}

/// Reject the first instruction `backend` cannot lower.
pub fn check_capabilities(backend: &dyn Backend, program: &ResolvedProgram) -> Result<()> {
    let unsupported = program
        .instructions()
        .iter()
        .enumerate()
        .find(|(_, instruction)| !backend.supports(instruction.opcode()));

    match unsupported {
        Some((index, instruction)) => Err(Error::UnsupportedOperation {
            backend: backend.name(),
            opcode: instruction.opcode(),
            position: instruction.position,
            index,
        }),
        None => Ok(()),
    }
}

/// Capability check, then emission. Either the full text or an error.
pub fn generate(
    backend: &dyn Backend,
    program: &ResolvedProgram,
    tape_size: TapeSize,
) -> Result<String> {
    check_capabilities(backend, program)?;
    let text = backend.emit(program, tape_size)?;
    log::debug!(
        "{} backend emitted {} bytes for {} instructions",
        backend.name(),
        text.len(),
        program.len()
    );
    Ok(text)
}

/// Assembly label naming a bracket by its instruction index.
pub(crate) fn label(index: usize) -> String {
    format!("L{index}")
}
