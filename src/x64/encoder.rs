// This module turns tape-machine operations into x86-64 assembly text using the iced-x86
// library. X64Encoder builds each machine instruction as a real iced_x86::Instruction (so
// operand sizes and immediate ranges are validated by iced's encoder tables) and renders it
// with iced's GAS formatter in AT&T syntax. Symbolic operands are handled by giving each
// symbol a reserved address far above any immediate the backend emits: the `memory` tape
// array, the `putchar` output primitive, and one `L<index>` label per bracket instruction.
// LabelResolver maps those addresses back to names while formatting. Directives and label
// definitions are written verbatim. Register roles are fixed: %rax holds the head pointer,
// %cl/%ecx is the arithmetic scratch register, and %edi carries the putchar argument per the
// System V calling convention.

//! x86-64 instruction emission through iced-x86.

use iced_x86::{
    Code, Formatter, GasFormatter, Instruction, MemoryOperand, Register, SymbolResolver,
    SymbolResult,
};

use crate::core::Result;

/// Head pointer: address of the current cell.
pub const HEAD: Register = Register::RAX;
/// Scratch register for load/modify/store sequences.
pub const SCRATCH: Register = Register::ECX;
pub const SCRATCH8: Register = Register::CL;
/// First integer argument register (System V).
pub const ARG0: Register = Register::EDI;

/// Reserved addresses for the symbols the resolver names.
const MEMORY_ADDRESS: u64 = 0x7000_0000_0000;
const PUTCHAR_ADDRESS: u64 = 0x7100_0000_0000;
const LABEL_BASE: u64 = 0x7200_0000_0000;

pub const MEMORY_SYMBOL: &str = "memory";
pub const PUTCHAR_SYMBOL: &str = "putchar";

/// Names the reserved addresses while formatting.
struct LabelResolver;

impl SymbolResolver for LabelResolver {
    fn symbol(
        &mut self,
        _instruction: &Instruction,
        _operand: u32,
        _instruction_operand: Option<u32>,
        address: u64,
        _address_size: u32,
    ) -> Option<SymbolResult<'_>> {
        match address {
            MEMORY_ADDRESS => Some(SymbolResult::with_str(address, MEMORY_SYMBOL)),
            PUTCHAR_ADDRESS => Some(SymbolResult::with_str(address, PUTCHAR_SYMBOL)),
            a if a >= LABEL_BASE => {
                let index = usize::try_from(a - LABEL_BASE).ok()?;
                Some(SymbolResult::with_string(address, crate::codegen::label(index)))
            }
            _ => None,
        }
    }
}

fn label_address(index: usize) -> u64 {
    LABEL_BASE + index as u64
}

/// Accumulates formatted x86-64 assembly.
pub struct X64Encoder {
    formatter: GasFormatter,
    text: String,
    scratch: String,
    instruction_count: usize,
}

impl Default for X64Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl X64Encoder {
    pub fn new() -> Self {
        let mut formatter = GasFormatter::with_options(Some(Box::new(LabelResolver)), None);
        formatter.options_mut().set_rip_relative_addresses(true);
        Self {
            formatter,
            text: String::new(),
            scratch: String::new(),
            instruction_count: 0,
        }
    }

    /// Number of machine instructions emitted so far (directives and labels excluded).
    pub fn instruction_count(&self) -> usize {
        self.instruction_count
    }

    pub fn finish(self) -> String {
        self.text
    }

    /// Emit a raw assembler line (directive or data definition).
    pub fn directive(&mut self, line: &str) {
        self.text.push('\t');
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Define a symbol at the current location.
    pub fn define(&mut self, name: &str) {
        self.text.push_str(name);
        self.text.push_str(":\n");
    }

    /// Define the label of the bracket at `index`.
    pub fn define_label(&mut self, index: usize) {
        let name = crate::codegen::label(index);
        self.define(&name);
    }

    fn emit(&mut self, instruction: Instruction) {
        self.scratch.clear();
        self.formatter.format(&instruction, &mut self.scratch);
        self.text.push('\t');
        self.text.push_str(&self.scratch);
        self.text.push('\n');
        self.instruction_count += 1;
    }

    /// `lea memory(%rip),%rax`
    pub fn load_tape_base(&mut self) -> Result<()> {
        let memory = MemoryOperand::with_base_displ(Register::RIP, MEMORY_ADDRESS as i64);
        self.emit(Instruction::with2(Code::Lea_r64_m, HEAD, memory)?);
        Ok(())
    }

    /// Zero-extend the current cell into the scratch register.
    pub fn load_cell(&mut self, dst: Register) -> Result<()> {
        self.emit(Instruction::with2(
            Code::Movzx_r32_rm8,
            dst,
            MemoryOperand::with_base(HEAD),
        )?);
        Ok(())
    }

    /// Store the low byte of the scratch register into the current cell.
    pub fn store_cell(&mut self) -> Result<()> {
        self.emit(Instruction::with2(
            Code::Mov_rm8_r8,
            MemoryOperand::with_base(HEAD),
            SCRATCH8,
        )?);
        Ok(())
    }

    pub fn add_scratch8(&mut self, amount: u8) -> Result<()> {
        self.emit(Instruction::with2(Code::Add_rm8_imm8, SCRATCH8, u32::from(amount))?);
        Ok(())
    }

    pub fn sub_scratch8(&mut self, amount: u8) -> Result<()> {
        self.emit(Instruction::with2(Code::Sub_rm8_imm8, SCRATCH8, u32::from(amount))?);
        Ok(())
    }

    pub fn add_head(&mut self, amount: i32) -> Result<()> {
        self.emit(Instruction::with2(Code::Add_rm64_imm32, HEAD, amount)?);
        Ok(())
    }

    pub fn sub_head(&mut self, amount: i32) -> Result<()> {
        self.emit(Instruction::with2(Code::Sub_rm64_imm32, HEAD, amount)?);
        Ok(())
    }

    /// `cmp $0,%cl`
    pub fn test_scratch_zero(&mut self) -> Result<()> {
        self.emit(Instruction::with2(Code::Cmp_rm8_imm8, SCRATCH8, 0u32)?);
        Ok(())
    }

    /// `je L<index>`
    pub fn jump_if_zero(&mut self, index: usize) -> Result<()> {
        self.emit(Instruction::with_branch(Code::Je_rel32_64, label_address(index))?);
        Ok(())
    }

    /// `jmp L<index>`
    pub fn jump(&mut self, index: usize) -> Result<()> {
        self.emit(Instruction::with_branch(Code::Jmp_rel32_64, label_address(index))?);
        Ok(())
    }

    pub fn push(&mut self, reg: Register) -> Result<()> {
        self.emit(Instruction::with1(Code::Push_r64, reg)?);
        Ok(())
    }

    pub fn pop(&mut self, reg: Register) -> Result<()> {
        self.emit(Instruction::with1(Code::Pop_r64, reg)?);
        Ok(())
    }

    /// `call putchar`
    pub fn call_putchar(&mut self) -> Result<()> {
        self.emit(Instruction::with_branch(Code::Call_rel32_64, PUTCHAR_ADDRESS)?);
        Ok(())
    }

    pub fn ret(&mut self) {
        self.emit(Instruction::with(Code::Retnq));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_line(encoder: &X64Encoder) -> String {
        encoder
            .text
            .lines()
            .last()
            .map(|l| l.trim().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn branches_name_their_labels() {
        let mut encoder = X64Encoder::new();
        encoder.jump(7).expect("jmp encodes");
        let line = last_line(&encoder);
        assert!(line.starts_with("jmp"), "{line}");
        assert!(line.ends_with("L7"), "{line}");

        encoder.jump_if_zero(12).expect("je encodes");
        let line = last_line(&encoder);
        assert!(line.starts_with("je"), "{line}");
        assert!(line.ends_with("L12"), "{line}");
    }

    #[test]
    fn call_names_putchar() {
        let mut encoder = X64Encoder::new();
        encoder.call_putchar().expect("call encodes");
        let line = last_line(&encoder);
        assert!(line.starts_with("call"), "{line}");
        assert!(line.ends_with("putchar"), "{line}");
    }

    #[test]
    fn tape_base_is_rip_relative() {
        let mut encoder = X64Encoder::new();
        encoder.load_tape_base().expect("lea encodes");
        let line = last_line(&encoder);
        assert!(line.starts_with("lea"), "{line}");
        assert!(line.contains("memory(%rip)"), "{line}");
        assert!(line.ends_with("%rax"), "{line}");
    }

    #[test]
    fn small_immediates_are_not_mistaken_for_symbols() {
        let mut encoder = X64Encoder::new();
        encoder.add_head(5).expect("add encodes");
        let line = last_line(&encoder);
        assert!(line.starts_with("add"), "{line}");
        assert!(!line.contains('L'), "{line}");
        assert_eq!(encoder.instruction_count(), 1);
    }

    #[test]
    fn labels_and_directives_are_verbatim() {
        let mut encoder = X64Encoder::new();
        encoder.directive(".text");
        encoder.define_label(3);
        assert_eq!(encoder.finish(), "\t.text\nL3:\n");
    }
}
