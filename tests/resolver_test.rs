//! Jump resolution over whole programs.

use bfc::{load, resolve, Error, Loader, Opcode, Operation};

fn assert_symmetric(source: &[u8]) {
    let program = resolve(load(source)).unwrap_or_else(|e| panic!("{e}"));
    for (index, instruction) in program.instructions().iter().enumerate() {
        match instruction.operation {
            Operation::LoopOpen(target) | Operation::LoopClose(target) => {
                let partner = target.unwrap_or_else(|| panic!("bracket {index} left unresolved"));
                assert_eq!(program.partner(partner), Some(index));
                let expected = if instruction.opcode() == Opcode::LoopOpen {
                    Opcode::LoopClose
                } else {
                    Opcode::LoopOpen
                };
                assert_eq!(program.instructions()[partner].opcode(), expected);
            }
            _ => assert_eq!(instruction.target(), None),
        }
    }
}

#[test]
fn well_bracketed_programs_resolve_symmetrically() {
    for source in [
        &b"[]"[..],
        b"[[]]",
        b"[][]",
        b"+[->[-]<]",
        b"a[b[c]d[e[f]g]h]i",
        b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.",
    ] {
        assert_symmetric(source);
    }
}

#[test]
fn unfolded_programs_resolve_too() {
    let program = resolve(Loader::new().fold_runs(false).load(b"++[>+<-]")).expect("balanced");
    assert_eq!(program.len(), 8);
    assert_eq!(program.partner(2), Some(7));
    assert_eq!(program.partner(7), Some(2));
}

#[test]
fn extra_close_bracket_is_located() {
    // Offsets count every source byte, comments included.
    let source = b"+[-]  ]  [";
    match resolve(load(source)) {
        Err(Error::UnmatchedCloseBracket { position, index }) => {
            assert_eq!(position, 6);
            assert_eq!(index, 4);
        }
        other => panic!("expected UnmatchedCloseBracket, got {other:?}"),
    }
}

#[test]
fn extra_open_bracket_is_located() {
    let source = b"x [ [-] [ ]";
    match resolve(load(source)) {
        Err(Error::UnmatchedOpenBracket { position, index }) => {
            assert_eq!(position, 2);
            assert_eq!(index, 0);
        }
        other => panic!("expected UnmatchedOpenBracket, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_offset() {
    let message = resolve(load(b"]")).err().map(|e| e.to_string());
    assert_eq!(message.as_deref(), Some("unmatched ']' at offset 0 (instruction 0)"));
}
