use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::RuntimeError;

/// Represents a type that can be used as a comparative character set.
trait CharacterSetVerifiable {
    fn in_set(&self, value: char) -> bool;
}

impl CharacterSetVerifiable for RangeInclusive<char> {
    fn in_set(&self, value: char) -> bool {
        self.contains(&value)
    }
}

impl CharacterSetVerifiable for char {
    fn in_set(&self, value: char) -> bool {
        *self == value
    }
}

/// The named POSIX character classes usable as `[:name:]` within a bracket
/// expression. All classes are restricted to ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosixClass {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Xdigit,
}

impl PosixClass {
    /// Looks up a class by the name used between `[:` and `:]`.
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "alnum" => Self::Alnum,
            "alpha" => Self::Alpha,
            "blank" => Self::Blank,
            "cntrl" => Self::Cntrl,
            "digit" => Self::Digit,
            "graph" => Self::Graph,
            "lower" => Self::Lower,
            "print" => Self::Print,
            "punct" => Self::Punct,
            "space" => Self::Space,
            "upper" => Self::Upper,
            "xdigit" => Self::Xdigit,
            _ => return None,
        };

        Some(class)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Alnum => "alnum",
            Self::Alpha => "alpha",
            Self::Blank => "blank",
            Self::Cntrl => "cntrl",
            Self::Digit => "digit",
            Self::Graph => "graph",
            Self::Lower => "lower",
            Self::Print => "print",
            Self::Punct => "punct",
            Self::Space => "space",
            Self::Upper => "upper",
            Self::Xdigit => "xdigit",
        }
    }
}

impl CharacterSetVerifiable for PosixClass {
    fn in_set(&self, value: char) -> bool {
        match self {
            Self::Alnum => value.is_ascii_alphanumeric(),
            Self::Alpha => value.is_ascii_alphabetic(),
            Self::Blank => value == ' ' || value == '\t',
            Self::Cntrl => value.is_ascii_control(),
            Self::Digit => value.is_ascii_digit(),
            Self::Graph => value.is_ascii_graphic(),
            Self::Lower => value.is_ascii_lowercase(),
            Self::Print => value.is_ascii_graphic() || value == ' ',
            Self::Punct => value.is_ascii_punctuation(),
            // POSIX includes vertical tab, which `is_ascii_whitespace` omits.
            Self::Space => value.is_ascii_whitespace() || value == '\x0b',
            Self::Upper => value.is_ascii_uppercase(),
            Self::Xdigit => value.is_ascii_hexdigit(),
        }
    }
}

impl Display for PosixClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[:{}:]", self.name())
    }
}

/// A single member of a bracket expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SetMember {
    /// An explicit character, i.e. `a` in `[abc]`.
    Char(char),
    /// An inclusive range of single-byte characters, i.e. `a-z`.
    Range(RangeInclusive<char>),
    /// A named class, i.e. `[:digit:]`.
    Class(PosixClass),
}

impl Display for SetMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetMember::Char(c) => write!(f, "{}", c),
            SetMember::Range(r) => write!(f, "{}-{}", r.start(), r.end()),
            SetMember::Class(class) => Display::fmt(class, f),
        }
    }
}

/// Denotes whether a given set is inclusive or exclusive to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMembership {
    /// States that a set is inclusive of a value, i.e. the value is a member of
    /// the set.
    Inclusive,
    /// States that a set is exclusive of a value, i.e. the value is not a
    /// member of the set.
    Exclusive,
}

impl SetMembership {
    /// Returns whether a character is accepted given whether it is a member
    /// of the set.
    pub fn admits(&self, is_member: bool) -> bool {
        match self {
            SetMembership::Inclusive => is_member,
            SetMembership::Exclusive => !is_member,
        }
    }
}

/// An ordered collection of members compiled from one bracket expression.
/// Polarity is carried by the instruction referencing the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterSet {
    members: Vec<SetMember>,
}

impl CharacterSet {
    pub fn new(members: Vec<SetMember>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[SetMember] {
        &self.members
    }

    /// Returns whether `value` is a member of the set.
    ///
    /// Ranges are only defined over single-byte characters. Encountering a
    /// range with a multi-byte bound is an error.
    pub fn contains(&self, value: char) -> Result<bool, RuntimeError> {
        for member in self.members.iter() {
            let found = match member {
                SetMember::Char(c) => c.in_set(value),
                SetMember::Range(r) if !(r.start().is_ascii() && r.end().is_ascii()) => {
                    return Err(RuntimeError::MultiByteRange {
                        start: *r.start(),
                        end: *r.end(),
                    })
                }
                SetMember::Range(r) => r.in_set(value),
                SetMember::Class(class) => class.in_set(value),
            };

            if found {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl Display for CharacterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for member in self.members.iter() {
            Display::fmt(member, f)?;
        }
        write!(f, "]")
    }
}
