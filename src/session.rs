// This module drives one pipeline invocation. Session holds the configuration (tape size and
// whether runs are folded) and runs the stages strictly in sequence: the loader decodes the
// source bytes, the jump resolver pairs brackets, and exactly one consumer then takes the
// resolved program, either the interpreter (with caller-supplied input and output streams),
// a code generation backend, or the instruction listing. Ownership of the instruction
// sequence moves from stage to stage; nothing is kept between invocations. Mode is the
// selection the command-line wrapper hands over.

//! Pipeline driver: load, resolve, then interpret or emit.

use std::io::{Read, Write};

use crate::codegen::{generate, Target};
use crate::core::{Config, ResolvedProgram, Result};
use crate::frontend::{resolve, Loader};
use crate::interpreter::Interpreter;

/// What to do with a resolved program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Execute it on the tape.
    Interpret,
    /// Generate code for a target.
    Emit(Target),
    /// Print the instruction listing.
    Listing,
}

/// Runs the pipeline stages with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loader then resolver.
    pub fn compile(&self, source: &[u8]) -> Result<ResolvedProgram> {
        let program = Loader::new().fold_runs(self.config.fold_runs).load(source);
        resolve(program)
    }

    /// Compile and interpret `source`.
    pub fn run<R: Read, W: Write>(&self, source: &[u8], input: R, output: W) -> Result<()> {
        let program = self.compile(source)?;
        Interpreter::new(&program, self.config.tape_size).run(input, output)
    }

    /// Compile `source` and generate code for `target`.
    pub fn emit(&self, source: &[u8], target: Target) -> Result<String> {
        let program = self.compile(source)?;
        let backend = target.backend();
        generate(backend.as_ref(), &program, self.config.tape_size)
    }

    /// Dispatch to exactly one consumer. Generated text and listings go to `output`.
    pub fn execute<R: Read, W: Write>(
        &self,
        mode: Mode,
        source: &[u8],
        input: R,
        mut output: W,
    ) -> Result<()> {
        log::debug!("running in {mode:?} mode with tape size {}", self.config.tape_size);
        match mode {
            Mode::Interpret => self.run(source, input, output),
            Mode::Emit(target) => {
                let text = self.emit(source, target)?;
                output.write_all(text.as_bytes())?;
                output.flush()?;
                Ok(())
            }
            Mode::Listing => {
                let program = self.compile(source)?;
                output.write_all(program.listing().as_bytes())?;
                output.flush()?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Error, TapeSize};

    #[test]
    fn unfolded_session_keeps_one_instruction_per_symbol() {
        let session = Session::new(Config::new().with_fold_runs(false));
        let program = session.compile(b"+++").expect("compiles");
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn tape_size_reaches_the_interpreter() {
        let tape_size = TapeSize::new(2).expect("positive");
        let session = Session::new(Config::new().with_tape_size(tape_size));
        let result = session.run(b">>", &b""[..], Vec::new());
        assert!(matches!(result, Err(Error::TapeBoundsExceeded { tape_size: 2, .. })));
    }

    #[test]
    fn emit_mode_writes_generated_text() {
        let mut output = Vec::new();
        Session::default()
            .execute(Mode::Emit(Target::C), b"+.", &b""[..], &mut output)
            .expect("C supports everything");
        let text = String::from_utf8(output).expect("utf-8");
        assert!(text.contains("memory[head] += 1;"));
    }

    #[test]
    fn listing_mode_prints_resolved_operands() {
        let mut output = Vec::new();
        Session::default()
            .execute(Mode::Listing, b"[-]", &b""[..], &mut output)
            .expect("balanced");
        assert_eq!(
            String::from_utf8(output).ok().as_deref(),
            Some("(0, LoopOpen, 2)\n(1, Decrement, 1)\n(2, LoopClose, 0)\n")
        );
    }
}
