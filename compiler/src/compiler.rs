//! Provides methods and types to facilitate the compilation of a pattern
//! into a runtime program.
//!
//! Patterns are compiled in a single left-to-right scan without an
//! intermediate tree. Operators that apply to what came before them,
//! alternation and quantifiers, are implemented by inserting a split ahead
//! of the affected instructions. Branch targets are kept relative while
//! compiling so insertions never need to revisit earlier targets, and are
//! resolved to absolute indices in a final linking pass.
//!
//! # Example
//!
//! ```
//! use ere_runtime::*;
//! use ere_compiler::compile;
//!
//! assert_eq!(
//!     Ok(Program::default().with_opcodes(vec![
//!         Opcode::Skip,
//!         Opcode::Split(InstSplit::new(InstIndex::from(2), InstIndex::from(4))),
//!         Opcode::Consume(InstConsume::new('a')),
//!         Opcode::Jmp(InstJmp::new(InstIndex::from(5))),
//!         Opcode::Consume(InstConsume::new('b')),
//!         Opcode::Match(InstMatch::new(false)),
//!     ])),
//!     compile("a|b")
//! )
//! ```
use ere_runtime::*;
use log::{debug, trace};

use crate::{bracket, repetition, CompileError};

/// A internal representation of the `ere_runtime::Opcode` type, with relative
/// addressing.
///
/// ## Note
/// This type is meant to exist only internally and should be
/// refined to the `ere_runtime::Opcode` type.
#[derive(Debug, Clone, PartialEq)]
enum RelativeOpcode {
    Skip,
    Any,
    Consume(char),
    ConsumeSet(CharacterSet, SetMembership),
    Split(isize),
    /// An alternation's jump remains unresolved until its group closes.
    Jmp(Option<isize>),
    Repeat {
        id: usize,
        origin: isize,
        min: usize,
        max: Option<usize>,
    },
    StartGroup(usize),
    EndGroup(usize),
    Match(bool),
}

impl RelativeOpcode {
    fn is_consuming(&self) -> bool {
        matches!(
            self,
            RelativeOpcode::Any | RelativeOpcode::Consume(_) | RelativeOpcode::ConsumeSet(..)
        )
    }

    fn into_opcode_with_index(self, sets: &mut Vec<CharacterSet>, idx: usize) -> Opcode {
        match self {
            RelativeOpcode::Skip => Opcode::Skip,
            RelativeOpcode::Any => Opcode::Any,
            RelativeOpcode::Consume(c) => Opcode::Consume(InstConsume::new(c)),
            RelativeOpcode::Split(rel_y) => Opcode::Split(InstSplit::new(
                absolute(idx, 1),
                absolute(idx, rel_y),
            )),
            // every jump is resolved before linking.
            RelativeOpcode::Jmp(rel_jmp_to) => {
                Opcode::Jmp(InstJmp::new(absolute(idx, rel_jmp_to.unwrap_or(1))))
            }
            RelativeOpcode::Repeat {
                id,
                origin,
                min,
                max,
            } => Opcode::Repeat(InstRepeat::new(id, absolute(idx, origin), min, max)),
            RelativeOpcode::StartGroup(slot) => Opcode::StartGroup(InstStartGroup::new(slot)),
            RelativeOpcode::EndGroup(slot) => Opcode::EndGroup(InstEndGroup::new(slot)),
            RelativeOpcode::Match(anchored) => Opcode::Match(InstMatch::new(anchored)),
            RelativeOpcode::ConsumeSet(char_set, membership) => {
                let found = sets.iter().position(|set| set == &char_set);
                let set_idx = match found {
                    Some(set_idx) => set_idx,
                    None => {
                        let set_idx = sets.len();
                        sets.push(char_set);
                        set_idx
                    }
                };

                Opcode::ConsumeSet(InstConsumeSet::new(set_idx, membership))
            }
        }
    }
}

fn absolute(idx: usize, rel: isize) -> InstIndex {
    InstIndex::from(idx.wrapping_add_signed(rel) as u32)
}

fn relative(from: usize, to: usize) -> isize {
    to as isize - from as isize
}

/// Reports whether the instructions of a complete term can be passed
/// without consuming input.
fn can_match_empty(term: &[RelativeOpcode]) -> bool {
    let mut visited = vec![false; term.len()];
    let mut pending = vec![0isize];

    while let Some(idx) = pending.pop() {
        let idx = match usize::try_from(idx) {
            Ok(idx) if idx >= term.len() => return true,
            Ok(idx) => idx,
            Err(_) => continue,
        };
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let next = idx as isize + 1;
        match &term[idx] {
            RelativeOpcode::Split(rel) => pending.extend([next, idx as isize + rel]),
            RelativeOpcode::Jmp(Some(rel)) => pending.push(idx as isize + rel),
            // reaching a repeat implies its own body was passed empty.
            RelativeOpcode::Repeat { .. }
            | RelativeOpcode::StartGroup(_)
            | RelativeOpcode::EndGroup(_) => pending.push(next),
            _ => {}
        }
    }

    false
}

/// Tracks the program under construction.
#[derive(Debug)]
struct Compiler {
    ops: Vec<RelativeOpcode>,
    /// The index of each unclosed `StartGroup` with its slot and the pattern
    /// offset of its `(`.
    open_groups: Vec<(usize, usize, usize)>,
    /// Where a top-level alternation inserts its split.
    base: usize,
    next_slot: usize,
    next_repeat_id: usize,
    /// Whether the last item compiled may take a quantifier.
    quantifiable: bool,
}

impl Compiler {
    fn new(start_anchored: bool) -> Self {
        let ops = match start_anchored {
            true => vec![],
            false => vec![RelativeOpcode::Skip],
        };

        Self {
            base: ops.len(),
            ops,
            open_groups: vec![],
            next_slot: 1,
            next_repeat_id: 0,
            quantifiable: false,
        }
    }

    fn push_term(&mut self, op: RelativeOpcode) {
        self.ops.push(op);
        self.quantifiable = true;
    }

    fn open_group(&mut self, offset: usize) {
        let slot = self.next_slot;
        self.next_slot += 1;

        self.open_groups.push((self.ops.len(), slot, offset));
        self.ops.push(RelativeOpcode::StartGroup(slot));
        self.quantifiable = false;
    }

    fn close_group(&mut self, offset: usize) -> Result<(), CompileError> {
        let (start, slot, _) = self
            .open_groups
            .pop()
            .ok_or(CompileError::UnmatchedCloseParen { offset })?;

        self.patch_alternations(start);
        self.push_term(RelativeOpcode::EndGroup(slot));
        Ok(())
    }

    /// Resolves every unresolved jump at or after `from` to the next
    /// instruction to be emitted.
    fn patch_alternations(&mut self, from: usize) {
        let target = self.ops.len();

        for (idx, op) in self.ops.iter_mut().enumerate().skip(from) {
            if let RelativeOpcode::Jmp(rel @ None) = op {
                *rel = Some(relative(idx, target));
            }
        }
    }

    /// Splits between everything compiled so far in the current group and
    /// everything that follows.
    fn alternate(&mut self) {
        let at = self
            .open_groups
            .last()
            .map_or(self.base, |&(start, ..)| start + 1);

        self.ops.push(RelativeOpcode::Jmp(None));
        // the jump shifts forward by one once the split is inserted.
        let past_jmp = self.ops.len() + 1;
        self.ops
            .insert(at, RelativeOpcode::Split(relative(at, past_jmp)));
        self.quantifiable = false;

        trace!("alternation split inserted at {}", at);
    }

    /// Returns the index of the first instruction of the term a quantifier
    /// at `offset` applies to.
    fn term_start(&self, offset: usize) -> Result<usize, CompileError> {
        let nothing_to_repeat = CompileError::NothingToRepeat { offset };
        if !self.quantifiable {
            return Err(nothing_to_repeat);
        }

        match self.ops.last() {
            Some(op) if op.is_consuming() => Ok(self.ops.len() - 1),
            Some(RelativeOpcode::EndGroup(slot)) => {
                let start = self
                    .ops
                    .iter()
                    .rposition(|op| op == &RelativeOpcode::StartGroup(*slot))
                    .ok_or(nothing_to_repeat)?;

                match self.ops[start..].iter().any(RelativeOpcode::is_consuming) {
                    true => Ok(start),
                    false => Err(CompileError::EmptyGroupRepetition { offset }),
                }
            }
            _ => Err(nothing_to_repeat),
        }
    }

    /// `?`
    fn zero_or_one(&mut self, offset: usize) -> Result<(), CompileError> {
        let start = self.term_start(offset)?;
        let past_term = self.ops.len() + 1;

        self.ops
            .insert(start, RelativeOpcode::Split(relative(start, past_term)));
        self.quantifiable = false;
        Ok(())
    }

    /// `*`
    fn zero_or_more(&mut self, offset: usize) -> Result<(), CompileError> {
        let start = self.term_start(offset)?;
        let jmp = self.ops.len() + 1;

        self.ops
            .insert(start, RelativeOpcode::Split(relative(start, jmp + 1)));
        self.ops.push(RelativeOpcode::Jmp(Some(relative(jmp, start))));
        self.quantifiable = false;
        Ok(())
    }

    /// `+`
    fn one_or_more(&mut self, offset: usize) -> Result<(), CompileError> {
        let start = self.term_start(offset)?;
        let split = self.ops.len();

        self.ops.push(RelativeOpcode::Split(relative(split, start)));
        self.quantifiable = false;
        Ok(())
    }

    /// `{m}`, `{m,}` and `{m,n}`
    fn repeat(&mut self, bounds: repetition::Bounds, offset: usize) -> Result<(), CompileError> {
        let mut start = self.term_start(offset)?;
        let id = self.next_repeat_id;
        self.next_repeat_id += 1;

        // iterations that consume nothing would be lost to deduplication,
        // a body that can match empty never needs them.
        let min = match can_match_empty(&self.ops[start..]) {
            true => 0,
            false => bounds.min,
        };

        if min == 0 {
            // the repeat lands one past the shifted term.
            let past_repeat = self.ops.len() + 2;
            self.ops
                .insert(start, RelativeOpcode::Split(relative(start, past_repeat)));
            start += 1;
        }

        let repeat = self.ops.len();
        self.ops.push(RelativeOpcode::Repeat {
            id,
            origin: relative(repeat, start),
            min,
            max: bounds.max,
        });
        self.quantifiable = false;

        trace!(
            "repeat {} over {}..{} with bounds {:?}",
            id,
            start,
            repeat,
            bounds
        );
        Ok(())
    }

    fn finish(mut self, end_anchored: bool) -> Result<Program, CompileError> {
        if let Some(&(_, _, offset)) = self.open_groups.last() {
            return Err(CompileError::UnterminatedGroup { offset });
        }

        self.patch_alternations(0);
        self.ops.push(RelativeOpcode::Match(end_anchored));

        let (sets, opcodes) = self.ops.into_iter().enumerate().fold(
            (vec![], vec![]),
            |(mut sets, mut insts), (idx, opcode)| {
                insts.push(opcode.into_opcode_with_index(&mut sets, idx));

                (sets, insts)
            },
        );

        Ok(Program::new(sets, opcodes))
    }
}

/// Compiles a POSIX extended regular expression into a runnable program
/// for use with the ere-runtime crate.
///
/// # Example
///
/// ```
/// use ere_compiler::compile;
/// use ere_runtime::find;
///
/// let program = compile("([a-z]+)@([a-z]+)").unwrap();
/// let found = find(&program, "mail user@host now").unwrap().unwrap();
///
/// assert_eq!(Some("user@host"), found.get(0).map(|g| g.as_str()));
/// assert_eq!(Some("user"), found.get(1).map(|g| g.as_str()));
/// assert_eq!(Some("host"), found.get(2).map(|g| g.as_str()));
/// ```
pub fn compile(pattern: &str) -> Result<Program, CompileError> {
    let chars = pattern.char_indices().collect::<Vec<_>>();
    let start_anchored = matches!(chars.first(), Some((_, '^')));

    let mut compiler = Compiler::new(start_anchored);
    let mut end_anchored = false;
    let mut pos = usize::from(start_anchored);

    while let Some(&(offset, c)) = chars.get(pos) {
        pos += 1;

        match c {
            '\\' => {
                let &(_, escaped) = chars
                    .get(pos)
                    .ok_or(CompileError::DanglingEscape { offset })?;
                pos += 1;
                compiler.push_term(RelativeOpcode::Consume(escaped));
            }
            '.' => compiler.push_term(RelativeOpcode::Any),
            '$' if pos == chars.len() => end_anchored = true,
            '^' | '$' => return Err(CompileError::MisplacedAnchor { anchor: c, offset }),
            ':' => return Err(CompileError::StrayClassDelimiter { offset }),
            '(' => compiler.open_group(offset),
            ')' => compiler.close_group(offset)?,
            '|' => compiler.alternate(),
            '[' => {
                let bracket = bracket::parse(&chars[pos..], offset)?;
                pos += bracket.consumed;
                compiler.push_term(RelativeOpcode::ConsumeSet(bracket.set, bracket.membership));
            }
            '?' => compiler.zero_or_one(offset)?,
            '*' => compiler.zero_or_more(offset)?,
            '+' => compiler.one_or_more(offset)?,
            '{' => {
                let (bounds, consumed) = repetition::parse(&chars[pos - 1..], offset)?;
                pos += consumed - 1;
                compiler.repeat(bounds, offset)?;
            }
            c => compiler.push_term(RelativeOpcode::Consume(c)),
        }
    }

    let program = compiler.finish(end_anchored)?;
    debug!("compiled {:?} into:\n{}", pattern, program);

    Ok(program)
}
