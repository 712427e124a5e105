// This module defines the instruction model shared by every pipeline stage. Opcode is the
// fieldless set of eight tape-machine operators, with the byte symbol each one is written as.
// Operation pairs an opcode with its operand as a tagged variant: the four unary operators
// carry a run-length repeat count, the two brackets carry the index of their partner bracket
// (None until the jump resolver has run), and Read/Write carry nothing. Instruction adds the
// byte offset of the triggering symbol in the source, used only for diagnostics. The Display
// implementations render the `(position, Opcode, operand)` listing format printed by `bfc --dump`.

//! Instruction model: opcodes, operations and positioned instructions.

use std::fmt;

/// The eight operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Increment,
    Decrement,
    MoveLeft,
    MoveRight,
    Read,
    Write,
    LoopOpen,
    LoopClose,
}

impl Opcode {
    pub const ALL: [Opcode; 8] = [
        Opcode::Increment,
        Opcode::Decrement,
        Opcode::MoveLeft,
        Opcode::MoveRight,
        Opcode::Read,
        Opcode::Write,
        Opcode::LoopOpen,
        Opcode::LoopClose,
    ];

    /// Decode a source byte. Every byte outside `+-<>,.[]` is a comment.
    pub fn from_symbol(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Opcode::Increment),
            b'-' => Some(Opcode::Decrement),
            b'<' => Some(Opcode::MoveLeft),
            b'>' => Some(Opcode::MoveRight),
            b',' => Some(Opcode::Read),
            b'.' => Some(Opcode::Write),
            b'[' => Some(Opcode::LoopOpen),
            b']' => Some(Opcode::LoopClose),
            _ => None,
        }
    }

    pub fn symbol(self) -> u8 {
        match self {
            Opcode::Increment => b'+',
            Opcode::Decrement => b'-',
            Opcode::MoveLeft => b'<',
            Opcode::MoveRight => b'>',
            Opcode::Read => b',',
            Opcode::Write => b'.',
            Opcode::LoopOpen => b'[',
            Opcode::LoopClose => b']',
        }
    }

    /// Whether adjacent occurrences are merged into one counted instruction.
    pub fn is_foldable(self) -> bool {
        matches!(
            self,
            Opcode::Increment | Opcode::Decrement | Opcode::MoveLeft | Opcode::MoveRight
        )
    }

    pub fn is_bracket(self) -> bool {
        matches!(self, Opcode::LoopOpen | Opcode::LoopClose)
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Increment => "Increment",
            Opcode::Decrement => "Decrement",
            Opcode::MoveLeft => "MoveLeft",
            Opcode::MoveRight => "MoveRight",
            Opcode::Read => "Read",
            Opcode::Write => "Write",
            Opcode::LoopOpen => "LoopOpen",
            Opcode::LoopClose => "LoopClose",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An opcode together with its operand.
///
/// Counts are always at least 1. Bracket targets are indices into the
/// instruction sequence and stay `None` until jump resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Increment(u32),
    Decrement(u32),
    MoveLeft(u32),
    MoveRight(u32),
    Read,
    Write,
    LoopOpen(Option<usize>),
    LoopClose(Option<usize>),
}

impl Operation {
    /// Build the operation a single occurrence of `opcode` stands for.
    pub fn single(opcode: Opcode) -> Self {
        match opcode {
            Opcode::Increment => Operation::Increment(1),
            Opcode::Decrement => Operation::Decrement(1),
            Opcode::MoveLeft => Operation::MoveLeft(1),
            Opcode::MoveRight => Operation::MoveRight(1),
            Opcode::Read => Operation::Read,
            Opcode::Write => Operation::Write,
            Opcode::LoopOpen => Operation::LoopOpen(None),
            Opcode::LoopClose => Operation::LoopClose(None),
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Operation::Increment(_) => Opcode::Increment,
            Operation::Decrement(_) => Opcode::Decrement,
            Operation::MoveLeft(_) => Opcode::MoveLeft,
            Operation::MoveRight(_) => Opcode::MoveRight,
            Operation::Read => Opcode::Read,
            Operation::Write => Opcode::Write,
            Operation::LoopOpen(_) => Opcode::LoopOpen,
            Operation::LoopClose(_) => Opcode::LoopClose,
        }
    }

    /// Repeat count of a unary operator.
    pub fn count(&self) -> Option<u32> {
        match *self {
            Operation::Increment(n)
            | Operation::Decrement(n)
            | Operation::MoveLeft(n)
            | Operation::MoveRight(n) => Some(n),
            _ => None,
        }
    }

    /// Partner index of a resolved bracket.
    pub fn target(&self) -> Option<usize> {
        match *self {
            Operation::LoopOpen(target) | Operation::LoopClose(target) => target,
            _ => None,
        }
    }

    /// Add one to the repeat count. Returns false when the operation is not
    /// foldable or the count is saturated, in which case the caller must start
    /// a new instruction.
    pub(crate) fn try_fold(&mut self) -> bool {
        match self {
            Operation::Increment(n)
            | Operation::Decrement(n)
            | Operation::MoveLeft(n)
            | Operation::MoveRight(n) => match n.checked_add(1) {
                Some(next) => {
                    *n = next;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Record the partner index of a bracket. No-op for other operations.
    pub(crate) fn set_target(&mut self, index: usize) {
        if let Operation::LoopOpen(target) | Operation::LoopClose(target) = self {
            *target = Some(index);
        }
    }
}

/// One entry of the intermediate representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Byte offset of the (first) triggering symbol in the source.
    pub position: usize,
    pub operation: Operation,
}

impl Instruction {
    pub fn new(position: usize, operation: Operation) -> Self {
        Self { position, operation }
    }

    pub fn opcode(&self) -> Opcode {
        self.operation.opcode()
    }

    pub fn count(&self) -> Option<u32> {
        self.operation.count()
    }

    pub fn target(&self) -> Option<usize> {
        self.operation.target()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, ", self.position, self.opcode())?;
        match self.operation {
            Operation::Increment(n)
            | Operation::Decrement(n)
            | Operation::MoveLeft(n)
            | Operation::MoveRight(n) => write!(f, "{n})"),
            Operation::Read | Operation::Write => write!(f, "-)"),
            Operation::LoopOpen(Some(target)) | Operation::LoopClose(Some(target)) => {
                write!(f, "{target})")
            }
            Operation::LoopOpen(None) | Operation::LoopClose(None) => write!(f, "?)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_through_opcodes() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::from_symbol(opcode.symbol()), Some(opcode));
        }
        assert_eq!(Opcode::from_symbol(b'a'), None);
        assert_eq!(Opcode::from_symbol(b'\n'), None);
    }

    #[test]
    fn only_unary_operators_fold() {
        let mut inc = Operation::single(Opcode::Increment);
        assert!(inc.try_fold());
        assert_eq!(inc, Operation::Increment(2));

        let mut write = Operation::single(Opcode::Write);
        assert!(!write.try_fold());

        let mut open = Operation::single(Opcode::LoopOpen);
        assert!(!open.try_fold());
        assert_eq!(open.target(), None);
    }

    #[test]
    fn saturated_count_refuses_to_fold() {
        let mut op = Operation::MoveRight(u32::MAX);
        assert!(!op.try_fold());
        assert_eq!(op.count(), Some(u32::MAX));
    }

    #[test]
    fn display_matches_listing_format() {
        assert_eq!(Instruction::new(4, Operation::Increment(3)).to_string(), "(4, Increment, 3)");
        assert_eq!(Instruction::new(2, Operation::Read).to_string(), "(2, Read, -)");
        assert_eq!(Instruction::new(9, Operation::LoopOpen(Some(12))).to_string(), "(9, LoopOpen, 12)");
        assert_eq!(Instruction::new(9, Operation::LoopClose(None)).to_string(), "(9, LoopClose, ?)");
    }
}
