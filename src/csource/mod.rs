//! C source backend.
//!
//! Emits one self-contained translation unit: a static byte array for the
//! tape, a `head` index, and one statement per instruction. Loops become
//! `while` statements, so bracket pairing is expressed by brace nesting.

use std::fmt::Write as _;

use crate::codegen::Backend;
use crate::core::{Opcode, Operation, ResolvedProgram, Result, TapeSize};

/// Lowers to portable C. Supports every opcode.
#[derive(Debug, Clone, Copy, Default)]
pub struct CBackend;

impl Backend for CBackend {
    fn name(&self) -> &'static str {
        "c"
    }

    fn supports(&self, _opcode: Opcode) -> bool {
        true
    }

    fn emit(&self, program: &ResolvedProgram, tape_size: TapeSize) -> Result<String> {
        let mut out = CWriter::default();

        out.line("#include <stdio.h>");
        out.line("");
        out.line(&format!("static unsigned char memory[{tape_size}];"));
        out.line("");
        out.line("int main(void) {");
        out.depth = 1;
        out.line("size_t head = 0;");
        if program.instructions().iter().any(|i| i.opcode() == Opcode::Read) {
            out.line("int c;");
        }

        for instruction in program.instructions() {
            match instruction.operation {
                Operation::Increment(n) => out.line(&format!("memory[head] += {n};")),
                Operation::Decrement(n) => out.line(&format!("memory[head] -= {n};")),
                Operation::MoveLeft(n) => out.line(&format!("head -= {n};")),
                Operation::MoveRight(n) => out.line(&format!("head += {n};")),
                Operation::Read => {
                    out.line("c = getchar();");
                    out.line("memory[head] = c == EOF ? 0 : (unsigned char)c;");
                }
                Operation::Write => out.line("putchar(memory[head]);"),
                Operation::LoopOpen(_) => {
                    out.line("while (memory[head] != 0) {");
                    out.depth += 1;
                }
                Operation::LoopClose(_) => {
                    out.depth = out.depth.saturating_sub(1);
                    out.line("}");
                }
            }
        }

        out.line("return 0;");
        out.depth = 0;
        out.line("}");
        Ok(out.text)
    }
}

/// Indentation-aware line buffer.
#[derive(Default)]
struct CWriter {
    text: String,
    depth: usize,
}

impl CWriter {
    fn line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.text.push_str("    ");
            }
        }
        // Writing into a String cannot fail.
        let _ = writeln!(self.text, "{line}");
    }
}
