//! Provides the program representation and thread scheduler for POSIX
//! extended regular expressions.
//!
//! A [`Program`] is a flat sequence of [`Opcode`]s paired with a table of
//! [`CharacterSet`]s. Programs are normally produced by the `ere-compiler`
//! crate, but may be assembled by hand as below.
//!
//! # Example
//!
//! ```
//! use ere_runtime::*;
//!
//! // approximate to `^a(b)`
//! let program = Program::default().with_opcodes(vec![
//!     Opcode::Consume(InstConsume::new('a')),
//!     Opcode::StartGroup(InstStartGroup::new(1)),
//!     Opcode::Consume(InstConsume::new('b')),
//!     Opcode::EndGroup(InstEndGroup::new(1)),
//!     Opcode::Match(InstMatch::new(false)),
//! ]);
//!
//! let found = find(&program, "abc").unwrap().unwrap();
//!
//! // group 0 is always the whole match.
//! assert_eq!(Some("ab"), found.get(0).map(|group| group.as_str()));
//! assert_eq!(Some((1, 2)), found.get(1).map(|group| (group.start(), group.end())));
//! ```
use std::fmt::{Debug, Display};

mod captures;
mod charset;
mod config;
mod error;
mod sparse_set;
mod vm;

pub use captures::{Match, MatchGroup};
pub use charset::{CharacterSet, PosixClass, SetMember, SetMembership};
pub use config::{MatchConfig, TieBreak};
pub use error::RuntimeError;
pub use vm::{find, find_all, find_all_with, find_with, search};

/// A compiled, immutable regular expression program.
///
/// A program may be shared freely between any number of concurrent
/// searches; all mutable execution state is owned by each search call.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Program {
    sets: Vec<CharacterSet>,
    program: Vec<Instruction>,
    repeat_slots: usize,
    capture_groups: usize,
}

impl Program {
    #[must_use]
    pub fn new(sets: Vec<CharacterSet>, program: Vec<Opcode>) -> Self {
        Self::default().with_sets(sets).with_opcodes(program)
    }

    /// Replaces the instructions of a program, recomputing the number of
    /// repeat counters and capture groups a thread must carry.
    pub fn with_opcodes(self, program: Vec<Opcode>) -> Self {
        let repeat_slots = program
            .iter()
            .filter_map(|opcode| match opcode {
                Opcode::Repeat(InstRepeat { id, .. }) => Some(id + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let capture_groups = program
            .iter()
            .filter_map(|opcode| match opcode {
                Opcode::StartGroup(InstStartGroup { slot })
                | Opcode::EndGroup(InstEndGroup { slot }) => Some(*slot),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        Self {
            sets: self.sets,
            program: program
                .into_iter()
                .enumerate()
                .map(|(id, opcode)| Instruction::new(id, opcode))
                .collect(),
            repeat_slots,
            capture_groups,
        }
    }

    pub fn with_sets(self, sets: Vec<CharacterSet>) -> Self {
        Self { sets, ..self }
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sets(&self) -> &[CharacterSet] {
        &self.sets
    }

    /// The number of distinct bounded repetition counters in the program.
    pub fn repeat_slots(&self) -> usize {
        self.repeat_slots
    }

    /// The number of capturing groups, not counting the whole match.
    pub fn capture_groups(&self) -> usize {
        self.capture_groups
    }

    /// Returns `true` if matches may only begin at the start of the input,
    /// signified by the absence of a leading `Skip`.
    pub fn is_start_anchored(&self) -> bool {
        !matches!(self.get(InstIndex::from(0)), Some(Opcode::Skip))
    }

    /// Returns the opcode at a given index, if one exists.
    pub fn get(&self, index: InstIndex) -> Option<&Opcode> {
        self.program.get(index.as_usize()).map(|inst| &inst.opcode)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for inst in self.program.iter() {
            writeln!(f, "{}", inst)?
        }

        for (idx, set) in self.sets.iter().enumerate() {
            writeln!(f, "{{{:04}}}: {}", idx, set)?
        }

        Ok(())
    }
}

impl std::ops::Index<InstIndex> for Program {
    type Output = Opcode;

    fn index(&self, index: InstIndex) -> &Self::Output {
        let idx = index.as_usize();
        &self.program[idx].opcode
    }
}

impl AsRef<[Instruction]> for Program {
    fn as_ref(&self) -> &[Instruction] {
        &self.program
    }
}

/// An absolute index into a program's instructions.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstIndex(u32);

impl InstIndex {
    #[inline]
    fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for InstIndex {
    fn from(ptr: u32) -> Self {
        Self(ptr)
    }
}

impl std::ops::Add<u32> for InstIndex {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        let new_ptr = self.0 + rhs;

        InstIndex::from(new_ptr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    id: usize,
    opcode: Opcode,
}

impl Instruction {
    #[must_use]
    pub fn new(id: usize, opcode: Opcode) -> Self {
        Self { id, opcode }
    }

    pub fn opcode(&self) -> &Opcode {
        &self.opcode
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}: {}", self.id, self.opcode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    /// Fixes the start of a match at the current offset while leaving a
    /// thread behind to attempt a match at the next offset.
    Skip,
    Any,
    Consume(InstConsume),
    ConsumeSet(InstConsumeSet),
    Split(InstSplit),
    Jmp(InstJmp),
    Repeat(InstRepeat),
    StartGroup(InstStartGroup),
    EndGroup(InstEndGroup),
    Match(InstMatch),
}

impl Opcode {
    /// Returns `true` if the opcode consumes a character of input.
    pub fn is_consuming(&self) -> bool {
        matches!(self, Opcode::Any | Opcode::Consume(_) | Opcode::ConsumeSet(_))
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Skip => write!(f, "Skip"),
            Opcode::Any => write!(f, "Any"),
            Opcode::Consume(i) => Display::fmt(&i, f),
            Opcode::ConsumeSet(i) => Display::fmt(&i, f),
            Opcode::Split(i) => Display::fmt(&i, f),
            Opcode::Jmp(i) => Display::fmt(&i, f),
            Opcode::Repeat(i) => Display::fmt(&i, f),
            Opcode::StartGroup(i) => Display::fmt(&i, f),
            Opcode::EndGroup(i) => Display::fmt(&i, f),
            Opcode::Match(i) => Display::fmt(&i, f),
        }
    }
}

/// Terminates a thread successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstMatch {
    /// A match is only valid at the end of input when set.
    pub anchored: bool,
}

impl InstMatch {
    #[must_use]
    pub const fn new(anchored: bool) -> Self {
        Self { anchored }
    }
}

impl Display for InstMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.anchored {
            true => write!(f, "Match$"),
            false => write!(f, "Match"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstConsume {
    pub value: char,
}

impl InstConsume {
    #[must_use]
    pub fn new(value: char) -> Self {
        Self { value }
    }
}

impl Display for InstConsume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Consume: {:?}", self.value)
    }
}

/// ConsumeSet matches a single character against an entry in the program's
/// set table, either requiring or forbidding membership.
#[derive(Debug, Clone, PartialEq)]
pub struct InstConsumeSet {
    pub idx: usize,
    pub membership: SetMembership,
}

impl InstConsumeSet {
    pub fn new(idx: usize, membership: SetMembership) -> Self {
        Self { idx, membership }
    }

    pub fn member_of(idx: usize) -> Self {
        Self::new(idx, SetMembership::Inclusive)
    }

    pub fn not_member_of(idx: usize) -> Self {
        Self::new(idx, SetMembership::Exclusive)
    }
}

impl Display for InstConsumeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.membership {
            SetMembership::Inclusive => write!(f, "ConsumeSet: {{{:04}}}", self.idx),
            SetMembership::Exclusive => write!(f, "ConsumeSet: ^{{{:04}}}", self.idx),
        }
    }
}

/// Forks execution, pursuing both branches. The `x` branch has priority.
#[derive(Debug, Clone, PartialEq)]
pub struct InstSplit {
    pub x_branch: InstIndex,
    pub y_branch: InstIndex,
}

impl InstSplit {
    #[must_use]
    pub fn new(x: InstIndex, y: InstIndex) -> Self {
        Self {
            x_branch: x,
            y_branch: y,
        }
    }
}

impl Display for InstSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Split: ({:04}), ({:04})",
            self.x_branch.as_u32(),
            self.y_branch.as_u32()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstJmp {
    pub next: InstIndex,
}

impl InstJmp {
    pub fn new(next: InstIndex) -> Self {
        Self { next }
    }
}

impl Display for InstJmp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JumpAbs: ({:04})", self.next.as_u32())
    }
}

/// Closes one iteration of a bounded repetition whose body begins at
/// `origin`.
///
/// Each pass increments the thread's counter for `id`. While the count is
/// below `max` the thread loops back to `origin`; once it reaches `min` it
/// may also continue past the instruction, resetting the counter. An absent
/// `max` is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct InstRepeat {
    pub id: usize,
    pub origin: InstIndex,
    pub min: usize,
    pub max: Option<usize>,
}

impl InstRepeat {
    #[must_use]
    pub fn new(id: usize, origin: InstIndex, min: usize, max: Option<usize>) -> Self {
        Self {
            id,
            origin,
            min,
            max,
        }
    }
}

impl Display for InstRepeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repeat[{:04}]: ({:04}) {{{},",
            self.id,
            self.origin.as_u32(),
            self.min
        )?;

        match self.max {
            Some(max) => write!(f, "{}}}", max),
            None => write!(f, "}}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstStartGroup {
    pub slot: usize,
}

impl InstStartGroup {
    #[must_use]
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }
}

impl Display for InstStartGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StartGroup[{:04}]", self.slot)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstEndGroup {
    pub slot: usize,
}

impl InstEndGroup {
    #[must_use]
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }
}

impl Display for InstEndGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EndGroup[{:04}]", self.slot)
    }
}
