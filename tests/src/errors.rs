use ere_compiler::{compile, CompileError};
use ere_runtime::*;

#[test]
fn should_reject_stray_class_delimiters() {
    let input_output = [
        (":", CompileError::StrayClassDelimiter { offset: 0 }),
        ("hello*:", CompileError::StrayClassDelimiter { offset: 6 }),
    ];

    for (test_id, (pattern, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, Err(expected)), (test_id, compile(pattern)));
    }
}

#[test]
fn should_accept_class_delimiters_within_brackets_or_escaped() {
    let input_output = [("[:]", "a:b"), ("[[:alpha:]:]+", "1a:b2"), ("a\\:b", "xa:b")];

    for (test_id, (pattern, input)) in input_output.into_iter().enumerate() {
        let found = compile(pattern)
            .map(|program| find(&program, input).map(|found| found.is_some()));

        assert_eq!((test_id, Ok(Ok(true))), (test_id, found));
    }
}

#[test]
fn should_render_offsets_in_error_messages() {
    let input_output = [
        ("a)", "unmatched `)` at offset 1"),
        ("[[:word:]]", "unknown character class `[:word:]` at offset 0"),
        ("x{3,1}", "malformed repetition at offset 1"),
    ];

    for (test_id, (pattern, expected)) in input_output.into_iter().enumerate() {
        let msg = compile(pattern).map_err(|e| e.to_string());

        assert_eq!((test_id, Err(expected.to_string())), (test_id, msg));
    }
}

#[test]
fn should_fail_search_on_nested_groups() {
    let program = compile("((a))").expect("pattern should compile");

    assert_eq!(Err(RuntimeError::NestedGroup { pc: 2 }), find(&program, "a"));
}

#[test]
fn should_fail_search_on_hand_built_multi_byte_range() {
    let program = Program::new(
        vec![CharacterSet::new(vec![SetMember::Range('a'..='é')])],
        vec![
            Opcode::Skip,
            Opcode::ConsumeSet(InstConsumeSet::member_of(0)),
            Opcode::Match(InstMatch::new(false)),
        ],
    );

    assert_eq!(
        Err(RuntimeError::MultiByteRange {
            start: 'a',
            end: 'é'
        }),
        find(&program, "b")
    );
}
