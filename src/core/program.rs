//! Instruction sequences before and after jump resolution.
//!
//! [`Program`] is what the loader produces: brackets are still unpaired.
//! [`ResolvedProgram`] can only be obtained from
//! [`resolve`](crate::frontend::resolve), so holding one proves that every
//! bracket has a symmetric partner. The interpreter and the backends only
//! accept the resolved form.

use std::fmt::Write as _;

use super::instruction::{Instruction, Operation};

/// Loader output: an ordered instruction sequence with unresolved brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub(crate) instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Instruction> {
        self.instructions.last_mut()
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

/// A program whose bracket operands all hold their partner's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgram {
    instructions: Vec<Instruction>,
}

impl ResolvedProgram {
    /// Only the resolver builds these; it has already paired the brackets.
    pub(crate) fn from_resolved(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Index of the bracket paired with the bracket at `index`.
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.instructions.get(index).and_then(Instruction::target)
    }

    /// `(open, close)` index pairs, in order of the open bracket.
    pub fn loop_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(index, instruction)| match instruction.operation {
                Operation::LoopOpen(Some(close)) => Some((index, close)),
                _ => None,
            })
    }

    /// One `(position, Opcode, operand)` line per instruction.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for instruction in &self.instructions {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{instruction}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolvedProgram {
        ResolvedProgram::from_resolved(vec![
            Instruction::new(0, Operation::Increment(2)),
            Instruction::new(2, Operation::LoopOpen(Some(3))),
            Instruction::new(3, Operation::Decrement(1)),
            Instruction::new(4, Operation::LoopClose(Some(1))),
        ])
    }

    #[test]
    fn partner_and_pairs_follow_operands() {
        let program = sample();
        assert_eq!(program.partner(1), Some(3));
        assert_eq!(program.partner(3), Some(1));
        assert_eq!(program.partner(0), None);
        assert_eq!(program.partner(99), None);
        assert_eq!(program.loop_pairs().collect::<Vec<_>>(), vec![(1, 3)]);
    }

    #[test]
    fn listing_has_one_line_per_instruction() {
        let listing = sample().listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "(0, Increment, 2)",
                "(2, LoopOpen, 3)",
                "(3, Decrement, 1)",
                "(4, LoopClose, 1)",
            ]
        );
    }
}
