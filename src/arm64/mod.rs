// This module is the AArch64 backend. It lowers the resolved instruction sequence to GNU
// assembler text for a `run` function following AAPCS64: the frame record (x29/x30) and the
// callee-saved head register x19 are spilled in the prologue and restored in the epilogue,
// w9 is the scratch register for ldrb/add/strb cell updates, and the output primitive is
// reached with `bl putchar` taking the cell in w0 (x19 survives the call, so no explicit save
// is needed around it). Head moves use the 12-bit add/sub immediate when it fits and fall back
// to a literal-pool load otherwise. Loops use the same label pairing as the x86-64 backend,
// expressed with the cbz/b idiom. Read is not lowered and is reported as unsupported.

//! AArch64 backend (GNU as syntax).

use std::fmt::Write as _;

use crate::codegen::{label, Backend};
use crate::core::{Error, Instruction, Opcode, Operation, ResolvedProgram, Result, TapeSize};

/// Head pointer, callee-saved under AAPCS64.
const HEAD: &str = "x19";
/// Scratch for cell arithmetic.
const SCRATCH: &str = "w9";
/// Scratch for wide head offsets.
const SCRATCH64: &str = "x9";
/// Largest unshifted add/sub immediate.
const MAX_IMM12: u32 = 4095;

/// GNU as AArch64 code generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arm64Backend;

impl Backend for Arm64Backend {
    fn name(&self) -> &'static str {
        "arm64"
    }

    fn supports(&self, opcode: Opcode) -> bool {
        opcode != Opcode::Read
    }

    fn emit(&self, program: &ResolvedProgram, tape_size: TapeSize) -> Result<String> {
        let mut asm = Arm64Writer::default();

        asm.directive(".data");
        asm.define("memory");
        asm.directive(&format!(".zero {tape_size}"));
        asm.directive(".text");
        asm.directive(".globl run");
        asm.directive(".p2align 2");
        asm.define("run");
        asm.op("stp x29, x30, [sp, #-32]!");
        asm.op("mov x29, sp");
        asm.op(&format!("str {HEAD}, [sp, #16]"));
        asm.op(&format!("adrp {HEAD}, memory"));
        asm.op(&format!("add {HEAD}, {HEAD}, :lo12:memory"));

        for (index, instruction) in program.instructions().iter().enumerate() {
            self.lower(&mut asm, index, instruction)?;
        }

        asm.op(&format!("ldr {HEAD}, [sp, #16]"));
        asm.op("ldp x29, x30, [sp], #32");
        asm.op("ret");
        Ok(asm.text)
    }
}

impl Arm64Backend {
    fn lower(&self, asm: &mut Arm64Writer, index: usize, instruction: &Instruction) -> Result<()> {
        match instruction.operation {
            Operation::Increment(count) => asm.update_cell("add", count),
            Operation::Decrement(count) => asm.update_cell("sub", count),
            Operation::MoveLeft(count) => asm.move_head("sub", count),
            Operation::MoveRight(count) => asm.move_head("add", count),
            Operation::Write => {
                asm.op(&format!("ldrb w0, [{HEAD}]"));
                asm.op("bl putchar");
            }
            Operation::LoopOpen(Some(close)) => {
                asm.define(&label(index));
                asm.op(&format!("ldrb {SCRATCH}, [{HEAD}]"));
                asm.op(&format!("cbz {SCRATCH}, {}", label(close)));
            }
            Operation::LoopClose(Some(open)) => {
                asm.op(&format!("b {}", label(open)));
                asm.define(&label(index));
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

#[derive(Default)]
struct Arm64Writer {
    text: String,
}

impl Arm64Writer {
    fn directive(&mut self, line: &str) {
        self.op(line);
    }

    fn op(&mut self, line: &str) {
        let _ = writeln!(self.text, "\t{line}");
    }

    fn define(&mut self, name: &str) {
        let _ = writeln!(self.text, "{name}:");
    }

    /// ldrb / add|sub / strb on the current cell.
    fn update_cell(&mut self, mnemonic: &str, count: u32) {
        let amount = count % 256;
        self.op(&format!("ldrb {SCRATCH}, [{HEAD}]"));
        self.op(&format!("{mnemonic} {SCRATCH}, {SCRATCH}, #{amount}"));
        self.op(&format!("strb {SCRATCH}, [{HEAD}]"));
    }

    fn move_head(&mut self, mnemonic: &str, count: u32) {
        if count <= MAX_IMM12 {
            self.op(&format!("{mnemonic} {HEAD}, {HEAD}, #{count}"));
        } else {
            self.op(&format!("ldr {SCRATCH64}, ={count}"));
            self.op(&format!("{mnemonic} {HEAD}, {HEAD}, {SCRATCH64}"));
        }
    }
}
