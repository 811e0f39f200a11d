use ere_compiler::compile;
use ere_runtime::*;

/// Compiles `pattern` and returns the text and offsets of the first match
/// in `input`.
fn first_match(pattern: &str, input: &str) -> Option<(String, usize, usize)> {
    let program = compile(pattern).expect("pattern should compile");

    find(&program, input)
        .expect("search should not fail")
        .map(|m| (m.as_str().to_string(), m.start(), m.end()))
}

fn expected(text: &str, start: usize, end: usize) -> Option<(String, usize, usize)> {
    Some((text.to_string(), start, end))
}

#[test]
fn should_select_leftmost_longest_match() {
    let input_output = [
        (("a|ab", "xaby"), expected("ab", 1, 3)),
        (("ab|a", "xaby"), expected("ab", 1, 3)),
        (("b|abcd", "abcd"), expected("abcd", 0, 4)),
        (("(a|ab)(c|bcd)", "abcd"), expected("abcd", 0, 4)),
        (("x*", "abc"), expected("", 0, 0)),
        // a later non-empty match is preferred over an earlier empty one.
        (("[0-9]*", "ab12"), expected("12", 2, 4)),
        (("[0-9]+", "ab12"), expected("12", 2, 4)),
    ];

    for (test_id, ((pattern, input), expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, expected), (test_id, first_match(pattern, input)));
    }
}

#[test]
fn should_respect_anchors() {
    let input_output = [
        (("^abc$", "abc"), expected("abc", 0, 3)),
        (("^abc$", "abcd"), None),
        (("^abc$", "xabc"), None),
        (("^abc", "abcd"), expected("abc", 0, 3)),
        (("abc$", "abcabc"), expected("abc", 3, 6)),
        (("^$", ""), expected("", 0, 0)),
        // anchors constrain every alternative.
        (("^a|b$", "b"), expected("b", 0, 1)),
        (("^a|b$", "xb"), None),
        (("^a|b$", "ab"), None),
    ];

    for (test_id, ((pattern, input), expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, expected), (test_id, first_match(pattern, input)));
    }
}

#[test]
fn should_match_bracket_expressions() {
    let input_output = [
        (("[^a-c]", "abcd"), expected("d", 3, 4)),
        (("[[:digit:]]+", "ab123c"), expected("123", 2, 5)),
        (("[[:upper:][:digit:]]+", "abC4d"), expected("C4", 2, 4)),
        (("[]x]+", "a]x]b"), expected("]x]", 1, 4)),
        (("[a-]+", "x-a-y"), expected("-a-", 1, 4)),
        (("[^[:space:]]+", "  word "), expected("word", 2, 6)),
        (("[\\.]", "a\\b"), expected("\\", 1, 2)),
    ];

    for (test_id, ((pattern, input), expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, expected), (test_id, first_match(pattern, input)));
    }
}

#[test]
fn should_bound_repetitions() {
    let input_output = [
        (("a{2,3}", "aaaa"), expected("aaa", 0, 3)),
        (("a{2,3}", "a"), None),
        (("a{2}", "aaa"), expected("aa", 0, 2)),
        (("^a{2,}", "aaaaab"), expected("aaaaa", 0, 5)),
        (("ba{0,2}", "baaa"), expected("baa", 0, 3)),
        (("(a|b){2,}c", "xababc"), expected("ababc", 1, 6)),
        (("(a|){2}", "aa"), expected("aa", 0, 2)),
        (("(ab){1,2}c", "xababc"), expected("ababc", 1, 6)),
        // a failed earlier start overlaps the winning one.
        (("a{2}b", "aaab"), expected("aab", 1, 4)),
        (("a{2}b", "aaaab"), expected("aab", 2, 5)),
        (("[0-9]{2}-", "123-"), expected("23-", 1, 4)),
        (("(ab){1,2}c", "abababc"), expected("ababc", 2, 7)),
        (("x{2,3}y", "xxxxy"), expected("xxxy", 1, 5)),
    ];

    for (test_id, ((pattern, input), expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, expected), (test_id, first_match(pattern, input)));
    }
}

#[test]
fn should_treat_escaped_and_wildcard_characters() {
    let input_output = [
        (("a\\.b", "axb a.b"), expected("a.b", 4, 7)),
        (("a.b", "axb a.b"), expected("axb", 0, 3)),
        (("\\(x\\)", "f(x)"), expected("(x)", 1, 4)),
        // offsets are in bytes.
        ((".", "é"), expected("é", 0, 2)),
        (("b", "éb"), expected("b", 2, 3)),
    ];

    for (test_id, ((pattern, input), expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, expected), (test_id, first_match(pattern, input)));
    }
}

#[test]
fn should_report_submatches() {
    let program = compile("([a-z]+)@([a-z]+)").expect("pattern should compile");
    let found = find(&program, "mail: user@example today")
        .expect("search should not fail")
        .expect("pattern should match");

    let groups = found
        .iter()
        .map(|group| group.map(|g| (g.as_str(), g.start(), g.end())))
        .collect::<Vec<_>>();

    assert_eq!(
        vec![
            Some(("user@example", 6, 18)),
            Some(("user", 6, 10)),
            Some(("example", 11, 18)),
        ],
        groups
    );
}

#[test]
fn should_leave_non_participating_groups_absent() {
    let program = compile("(a)|(b)").expect("pattern should compile");
    let found = find(&program, "b")
        .expect("search should not fail")
        .expect("pattern should match");

    assert_eq!(3, found.len());
    assert_eq!(None, found.get(1));
    assert_eq!(Some("b"), found.get(2).map(|g| g.as_str()));
}

#[test]
fn should_keep_last_iteration_of_repeated_group() {
    let program = compile("(a|b){2,}c").expect("pattern should compile");
    let found = find(&program, "xababc")
        .expect("search should not fail")
        .expect("pattern should match");

    assert_eq!(Some(("b", 4, 5)), found.get(1).map(|g| (g.as_str(), g.start(), g.end())));
}

#[test]
fn should_find_all_non_overlapping_matches() {
    let input_output = [
        (("a", "aaa"), Some(vec![("a", 0, 1), ("a", 1, 2), ("a", 2, 3)])),
        (("ab|a", "abaab"), Some(vec![("ab", 0, 2), ("a", 2, 3), ("ab", 3, 5)])),
        (("x*", "ab"), Some(vec![("", 0, 0), ("", 1, 1)])),
        (("[0-9]+", "a1b22c333"), Some(vec![("1", 1, 2), ("22", 3, 5), ("333", 6, 9)])),
        // anchored programs only match at the start of input.
        (("^a", "aaa"), Some(vec![("a", 0, 1)])),
        (("z", "aaa"), None),
    ];

    for (test_id, ((pattern, input), expected)) in input_output.into_iter().enumerate() {
        let program = compile(pattern).expect("pattern should compile");
        let found = find_all(&program, input).expect("search should not fail");
        let spans = found.map(|matches| {
            matches
                .iter()
                .map(|m| (m.as_str(), m.start(), m.end()))
                .collect::<Vec<_>>()
        });

        assert_eq!((test_id, expected), (test_id, spans));
    }
}

#[test]
fn should_search_from_offset() {
    let program = compile("ab").expect("pattern should compile");

    let found = search(&program, "abxab", 1, &MatchConfig::default())
        .expect("search should not fail")
        .map(|m| (m.start(), m.end()));

    assert_eq!(Some((3, 5)), found);
}

#[test]
fn should_return_identical_results_across_runs() {
    let program = compile("(a|ab)(c|bcd)(d*)").expect("pattern should compile");

    let first = find(&program, "abcd").expect("search should not fail");
    let second = find(&program, "abcd").expect("search should not fail");

    assert_eq!(first, second);
}

#[test]
fn should_share_program_between_threads() {
    let program = std::sync::Arc::new(compile("[a-z]+[0-9]").expect("pattern should compile"));

    let handles = ["ab1", "--xyz9", "q7"]
        .into_iter()
        .map(|input| {
            let program = program.clone();
            std::thread::spawn(move || {
                find(&program, input)
                    .ok()
                    .flatten()
                    .map(|m| m.as_str().to_string())
            })
        })
        .collect::<Vec<_>>();

    let found = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread should not panic"))
        .collect::<Vec<_>>();

    assert_eq!(
        vec![
            Some("ab1".to_string()),
            Some("xyz9".to_string()),
            Some("q7".to_string()),
        ],
        found
    );
}
