// This module executes a resolved instruction sequence directly. Interpreter owns a fresh
// zero-filled Tape for the duration of one run and walks the program with a program counter:
// counted increments and decrements wrap modulo 256, counted moves are bounds-checked against
// the fixed tape (leaving it is a TapeBoundsExceeded error, never silent corruption), Read
// pulls one byte from the input stream and stores 0 once the stream is exhausted, Write pushes
// the current cell to the output stream, and the brackets jump straight to the partner index
// recorded by the jump resolver. A program that loops forever runs forever; there is no step
// limit.

//! Tape-machine interpreter.

pub mod tape;

use std::io::{ErrorKind, Read, Write};

use crate::core::{Error, Instruction, Opcode, Operation, ResolvedProgram, Result, TapeSize};

pub use tape::Tape;

/// Executes one [`ResolvedProgram`] against its own tape.
pub struct Interpreter<'p> {
    program: &'p ResolvedProgram,
    tape: Tape,
    pc: usize,
    steps: u64,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p ResolvedProgram, tape_size: TapeSize) -> Self {
        Self {
            program,
            tape: Tape::new(tape_size),
            pc: 0,
            steps: 0,
        }
    }

    /// Tape state, e.g. after [`run`](Self::run) returned.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run until the program counter falls off the end of the program.
    pub fn run<R: Read, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let program = self.program;
        let instructions = program.instructions();

        while let Some(instruction) = instructions.get(self.pc) {
            log::trace!(
                "pc={} head={} cell={} {}",
                self.pc,
                self.tape.head(),
                self.tape.cell(),
                instruction
            );
            self.step(instruction, &mut input, &mut output)?;
            self.steps += 1;
        }

        output.flush()?;
        log::debug!(
            "program finished after {} steps, head at {}",
            self.steps,
            self.tape.head()
        );
        Ok(())
    }

    fn step<R: Read, W: Write>(
        &mut self,
        instruction: &Instruction,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        match instruction.operation {
            Operation::Increment(count) => self.tape.add(wrap(count)),
            Operation::Decrement(count) => self.tape.sub(wrap(count)),
            Operation::MoveLeft(count) => {
                let moved = usize::try_from(count)
                    .ok()
                    .and_then(|distance| self.tape.shift_left(distance));
                if moved.is_none() {
                    return Err(self.out_of_bounds(instruction, -i64::from(count)));
                }
            }
            Operation::MoveRight(count) => {
                let moved = usize::try_from(count)
                    .ok()
                    .and_then(|distance| self.tape.shift_right(distance));
                if moved.is_none() {
                    return Err(self.out_of_bounds(instruction, i64::from(count)));
                }
            }
            Operation::Read => {
                let byte = read_byte(input)?.unwrap_or(0);
                self.tape.set_cell(byte);
            }
            Operation::Write => output.write_all(&[self.tape.cell()])?,
            Operation::LoopOpen(target) => {
                if self.tape.cell() == 0 {
                    self.pc = self.jump_target(target)?;
                }
            }
            Operation::LoopClose(target) => {
                if self.tape.cell() != 0 {
                    self.pc = self.jump_target(target)?;
                }
            }
        }
        self.pc += 1;
        Ok(())
    }

    fn jump_target(&self, target: Option<usize>) -> Result<usize> {
        // A ResolvedProgram never carries an unresolved bracket.
        target.ok_or_else(|| {
            let instruction = &self.program.instructions()[self.pc];
            let (position, index) = (instruction.position, self.pc);
            match instruction.opcode() {
                Opcode::LoopClose => Error::UnmatchedCloseBracket { position, index },
                _ => Error::UnmatchedOpenBracket { position, index },
            }
        })
    }

    fn out_of_bounds(&self, instruction: &Instruction, offset: i64) -> Error {
        Error::TapeBoundsExceeded {
            position: instruction.position,
            index: self.pc,
            head: self.tape.head(),
            offset,
            tape_size: self.tape.len(),
        }
    }
}

/// Counts apply to 8-bit cells.
fn wrap(count: u32) -> u8 {
    (count % 256) as u8
}

/// One byte from `input`, `None` at end of stream.
fn read_byte<R: Read>(input: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Run `program` on a fresh tape.
pub fn run<R: Read, W: Write>(
    program: &ResolvedProgram,
    tape_size: TapeSize,
    input: R,
    output: W,
) -> Result<()> {
    Interpreter::new(program, tape_size).run(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{load, resolve};

    fn interpret(source: &[u8], input: &[u8]) -> Result<Vec<u8>> {
        let program = resolve(load(source))?;
        let mut output = Vec::new();
        run(&program, TapeSize::default(), input, &mut output)?;
        Ok(output)
    }

    #[test]
    fn counted_increment_then_write() {
        assert_eq!(interpret(b"+++.", b"").ok(), Some(vec![3]));
    }

    #[test]
    fn echo_reads_input() {
        assert_eq!(interpret(b",.,.", b"hi").ok(), Some(b"hi".to_vec()));
    }

    #[test]
    fn loop_skipped_when_cell_is_zero() {
        assert_eq!(interpret(b"[.+]+.", b"").ok(), Some(vec![1]));
    }

    #[test]
    fn large_counts_wrap() {
        let mut source = vec![b'+'; 300];
        source.push(b'.');
        assert_eq!(interpret(&source, b"").ok(), Some(vec![44]));
    }

    #[test]
    fn bounds_error_carries_context() {
        let program = resolve(load(b">>> <<<<")).expect("no brackets");
        let mut interpreter = Interpreter::new(&program, TapeSize::default());
        match interpreter.run(&b""[..], Vec::new()) {
            Err(Error::TapeBoundsExceeded {
                position,
                index,
                head,
                offset,
                tape_size,
            }) => {
                assert_eq!((position, index, head, offset, tape_size), (4, 1, 3, -4, 1000));
            }
            other => panic!("expected bounds error, got {other:?}"),
        }
        assert_eq!(interpreter.tape().head(), 3);
    }

    #[test]
    fn unresolved_close_is_reported_as_unmatched_close() {
        let program = ResolvedProgram::from_resolved(vec![
            Instruction::new(0, Operation::Increment(1)),
            Instruction::new(3, Operation::LoopClose(None)),
        ]);
        let result = Interpreter::new(&program, TapeSize::default()).run(&b""[..], Vec::new());
        assert!(matches!(
            result,
            Err(Error::UnmatchedCloseBracket { position: 3, index: 1 })
        ));
    }

    #[test]
    fn unresolved_open_is_reported_as_unmatched_open() {
        let program =
            ResolvedProgram::from_resolved(vec![Instruction::new(5, Operation::LoopOpen(None))]);
        let result = Interpreter::new(&program, TapeSize::default()).run(&b""[..], Vec::new());
        assert!(matches!(
            result,
            Err(Error::UnmatchedOpenBracket { position: 5, index: 0 })
        ));
    }

    #[test]
    fn steps_count_executed_instructions() {
        let program = resolve(load(b"++[-]")).expect("balanced");
        let mut interpreter = Interpreter::new(&program, TapeSize::default());
        interpreter.run(&b""[..], Vec::new()).expect("runs");
        // + [ - ] - ]
        assert_eq!(interpreter.steps(), 6);
    }
}
