//! Source decoding with run-length folding.

use std::io::Read;

use crate::core::{Instruction, Opcode, Operation, Program, Result};

/// Decode `source` with the default settings (runs folded).
pub fn load(source: &[u8]) -> Program {
    Loader::new().load(source)
}

/// Turns raw source bytes into an unresolved [`Program`].
///
/// Bytes outside the eight operator symbols are skipped. Adjacent identical
/// unary operators are merged into one instruction whose count is the run
/// length; the merged instruction keeps the offset of the first symbol.
/// The loader never fails on malformed bracket nesting, that is the
/// resolver's job.
#[derive(Debug, Clone, Copy)]
pub struct Loader {
    fold_runs: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self { fold_runs: true }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable folding to get one instruction per significant symbol.
    pub fn fold_runs(mut self, fold_runs: bool) -> Self {
        self.fold_runs = fold_runs;
        self
    }

    pub fn load(&self, source: &[u8]) -> Program {
        let mut program = Program::default();
        let mut skipped = 0usize;

        for (position, &byte) in source.iter().enumerate() {
            match Opcode::from_symbol(byte) {
                Some(opcode) => self.push(&mut program, position, opcode),
                None => skipped += 1,
            }
        }

        log::debug!(
            "loaded {} instructions from {} bytes ({} comment bytes skipped)",
            program.len(),
            source.len(),
            skipped
        );
        program
    }

    /// Read the whole stream, then decode it.
    pub fn load_from_reader<R: Read>(&self, mut reader: R) -> Result<Program> {
        let mut source = Vec::new();
        reader.read_to_end(&mut source)?;
        Ok(self.load(&source))
    }

    fn push(&self, program: &mut Program, position: usize, opcode: Opcode) {
        if self.fold_runs && opcode.is_foldable() {
            if let Some(last) = program.last_mut() {
                if last.opcode() == opcode && last.operation.try_fold() {
                    return;
                }
            }
        }
        program.push(Instruction::new(position, Operation::single(opcode)));
    }
}
