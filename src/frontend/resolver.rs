//! Static bracket matching.
//!
//! A single left-to-right pass with an explicit stack of pending open
//! brackets. Each close bracket pops its open partner and both get the
//! other's index as operand, which gives the interpreter O(1) jumps over a
//! flat instruction array.

use crate::core::{Error, Opcode, Program, ResolvedProgram, Result};

/// Pair every bracket with its partner.
///
/// Fails on the first close bracket with nothing open, or, after the scan,
/// on the outermost open bracket that was never closed.
pub fn resolve(program: Program) -> Result<ResolvedProgram> {
    let mut instructions = program.into_instructions();
    let mut pending: Vec<usize> = Vec::new();
    let mut max_depth = 0usize;

    for index in 0..instructions.len() {
        match instructions[index].opcode() {
            Opcode::LoopOpen => {
                pending.push(index);
                max_depth = max_depth.max(pending.len());
            }
            Opcode::LoopClose => {
                let open = pending.pop().ok_or(Error::UnmatchedCloseBracket {
                    position: instructions[index].position,
                    index,
                })?;
                instructions[open].operation.set_target(index);
                instructions[index].operation.set_target(open);
                log::trace!("paired [{open}] with [{index}]");
            }
            _ => {}
        }
    }

    if let Some(&outermost) = pending.first() {
        return Err(Error::UnmatchedOpenBracket {
            position: instructions[outermost].position,
            index: outermost,
        });
    }

    log::debug!(
        "resolved jump table for {} instructions (max loop depth {})",
        instructions.len(),
        max_depth
    );
    Ok(ResolvedProgram::from_resolved(instructions))
}
