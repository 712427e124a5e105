//! x86-64 backend.
//!
//! Emits a `run` function for the GNU assembler. The tape is a zeroed
//! `memory` array in `.data`; `%rax` walks it as the head pointer. Loop
//! brackets become label pairs keyed by instruction index: the open bracket
//! defines its own label, tests the cell and jumps past the matching close
//! when it is zero; the close jumps back unconditionally and then defines
//! its own label, so the condition is re-tested at the top of every
//! iteration.
//!
//! Read has no OS integration here and is reported as unsupported.

use crate::codegen::Backend;
use crate::core::{Error, Instruction, Opcode, Operation, ResolvedProgram, Result, TapeSize};

use super::encoder::{X64Encoder, ARG0, HEAD, MEMORY_SYMBOL, SCRATCH};

/// GNU as (AT&T syntax) x86-64 code generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct X64Backend;

impl Backend for X64Backend {
    fn name(&self) -> &'static str {
        "x86-64"
    }

    fn supports(&self, opcode: Opcode) -> bool {
        opcode != Opcode::Read
    }

    fn emit(&self, program: &ResolvedProgram, tape_size: TapeSize) -> Result<String> {
        let mut encoder = X64Encoder::new();

        encoder.directive(".data");
        encoder.define(MEMORY_SYMBOL);
        encoder.directive(&format!(".zero {tape_size}"));
        encoder.directive(".text");
        encoder.directive(".globl run");
        encoder.define("run");
        encoder.load_tape_base()?;

        for (index, instruction) in program.instructions().iter().enumerate() {
            self.lower(&mut encoder, index, instruction)?;
        }

        encoder.ret();
        log::trace!("x86-64: {} machine instructions", encoder.instruction_count());
        Ok(encoder.finish())
    }
}

impl X64Backend {
    fn lower(&self, encoder: &mut X64Encoder, index: usize, instruction: &Instruction) -> Result<()> {
        match instruction.operation {
            Operation::Increment(count) => {
                encoder.load_cell(SCRATCH)?;
                encoder.add_scratch8(cell_amount(count))?;
                encoder.store_cell()?;
            }
            Operation::Decrement(count) => {
                encoder.load_cell(SCRATCH)?;
                encoder.sub_scratch8(cell_amount(count))?;
                encoder.store_cell()?;
            }
            Operation::MoveLeft(count) => encoder.sub_head(head_amount("move-left", count)?)?,
            Operation::MoveRight(count) => encoder.add_head(head_amount("move-right", count)?)?,
            Operation::Write => {
                encoder.push(HEAD)?;
                encoder.load_cell(ARG0)?;
                encoder.call_putchar()?;
                encoder.pop(HEAD)?;
            }
            Operation::LoopOpen(Some(close)) => {
                encoder.define_label(index);
                encoder.load_cell(SCRATCH)?;
                encoder.test_scratch_zero()?;
                encoder.jump_if_zero(close)?;
            }
            Operation::LoopClose(Some(open)) => {
                encoder.jump(open)?;
                encoder.define_label(index);
            }
            Operation::Read | Operation::LoopOpen(None) | Operation::LoopClose(None) => {
                return Err(Error::UnsupportedOperation {
                    backend: self.name(),
                    opcode: instruction.opcode(),
                    position: instruction.position,
                    index,
                });
            }
        }
        Ok(())
    }
}

/// Cell arithmetic is modulo 256.
fn cell_amount(count: u32) -> u8 {
    (count % 256) as u8
}

/// Head moves use a sign-extended 32-bit immediate.
fn head_amount(what: &'static str, count: u32) -> Result<i32> {
    i32::try_from(count).map_err(|_| Error::ImmediateOutOfRange { what, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{load, resolve};

    #[test]
    fn oversized_move_is_rejected() {
        assert!(matches!(
            head_amount("move-right", u32::MAX),
            Err(Error::ImmediateOutOfRange { count: u32::MAX, .. })
        ));
        assert_eq!(head_amount("move-right", 12).ok(), Some(12));
    }

    #[test]
    fn prologue_and_epilogue() {
        let program = resolve(load(b"")).expect("empty program");
        let text = X64Backend.emit(&program, TapeSize::default()).expect("emits");
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        assert_eq!(&lines[..6], &[".data", "memory:", ".zero 1000", ".text", ".globl run", "run:"]);
        assert!(lines[6].starts_with("lea"));
        assert!(lines[7].starts_with("ret"));
    }

    #[test]
    fn write_saves_the_head_around_the_call() {
        let program = resolve(load(b".")).expect("no brackets");
        let text = X64Backend.emit(&program, TapeSize::default()).expect("emits");
        let body: Vec<&str> = text.lines().map(str::trim).skip(7).collect();
        assert!(body[0].starts_with("push"), "{body:?}");
        assert!(body[1].starts_with("movz"), "{body:?}");
        assert!(body[1].ends_with("%edi"), "{body:?}");
        assert!(body[2].starts_with("call"), "{body:?}");
        assert!(body[3].starts_with("pop"), "{body:?}");
    }
}
