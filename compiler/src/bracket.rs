//! Parses bracket expressions, i.e. `[a-z_]`, `[^[:space:]]` or `[]x]`.
use ere_runtime::{CharacterSet, PosixClass, SetMember, SetMembership};

use crate::CompileError;

/// A parsed bracket expression and the number of characters it spanned
/// following the opening `[`.
#[derive(Debug, PartialEq)]
pub(crate) struct BracketExpression {
    pub(crate) set: CharacterSet,
    pub(crate) membership: SetMembership,
    pub(crate) consumed: usize,
}

/// Parses the members of a bracket expression. `input` begins immediately
/// after the opening `[`, found at `open_offset`.
///
/// A `]` is literal when it is the first member, after any leading `^`, and
/// a `-` is literal when it is the first or last member. A backslash has no
/// special meaning within brackets.
pub(crate) fn parse(
    input: &[(usize, char)],
    open_offset: usize,
) -> Result<BracketExpression, CompileError> {
    let unterminated = CompileError::UnterminatedBracket {
        offset: open_offset,
    };

    let (membership, first) = match input.first() {
        Some((_, '^')) => (SetMembership::Exclusive, 1),
        _ => (SetMembership::Inclusive, 0),
    };

    let mut members = vec![];
    let mut pos = first;
    loop {
        let &(offset, c) = input.get(pos).ok_or_else(|| unterminated.clone())?;

        match (c, input.get(pos + 1), input.get(pos + 2)) {
            (']', ..) if pos != first => {
                return Ok(BracketExpression {
                    set: CharacterSet::new(members),
                    membership,
                    consumed: pos + 1,
                })
            }
            ('[', Some((_, ':')), _) => {
                let name_start = pos + 2;
                let name_end = input[name_start..]
                    .windows(2)
                    .position(|pair| matches!(pair, [(_, ':'), (_, ']')]))
                    .map(|len| name_start + len)
                    .ok_or_else(|| unterminated.clone())?;
                let name: String = input[name_start..name_end].iter().map(|(_, c)| c).collect();
                let class = PosixClass::from_name(&name)
                    .ok_or(CompileError::UnknownClass { name, offset })?;

                members.push(SetMember::Class(class));
                pos = name_end + 2;
            }
            (start, Some((_, '-')), Some(&(_, end))) if end != ']' => {
                if !(start.is_ascii() && end.is_ascii()) {
                    return Err(CompileError::MultiByteRange { offset });
                }
                if end < start {
                    return Err(CompileError::InvalidRange { start, end, offset });
                }

                members.push(SetMember::Range(start..=end));
                pos += 3;
            }
            (c, ..) => {
                members.push(SetMember::Char(c));
                pos += 1;
            }
        }
    }
}
