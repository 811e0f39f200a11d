//! A breadth-first thread scheduler over compiled programs.
//!
//! Input is consumed one character at a time. At each offset every live
//! thread is advanced through all non-consuming instructions before any
//! character is tested. Threads are deduplicated by program counter paired
//! with their repetition counters, so at most one thread occupies a given
//! instruction and iteration count per step. Threads are kept in priority
//! order, earliest match start first, so the surviving thread for a given
//! state is always the one that started earliest.
use std::collections::HashSet;

use log::{debug, trace};

use crate::sparse_set::SparseSet;
use crate::{
    InstConsume, InstConsumeSet, InstEndGroup, InstIndex, InstJmp, InstMatch, InstRepeat,
    InstSplit, InstStartGroup, Match, MatchConfig, MatchGroup, Opcode, Program, RuntimeError,
    TieBreak,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
struct Thread {
    inst: InstIndex,
    /// Offset the match began at, `None` until a `Skip` fixes it.
    start: Option<usize>,
    /// Completed captures indexed by group slot, less one.
    groups: Vec<Option<Span>>,
    /// The slot and start offset of the currently open group.
    open_group: Option<(usize, usize)>,
    counters: Vec<usize>,
}

impl Thread {
    fn new(inst: InstIndex, start: Option<usize>, program: &Program) -> Self {
        Self {
            inst,
            start,
            groups: vec![None; program.capture_groups()],
            open_group: None,
            counters: vec![0; program.repeat_slots()],
        }
    }

    fn at(self, inst: InstIndex) -> Self {
        Self { inst, ..self }
    }
}

/// A thread that reached a `Match` instruction.
#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    end: usize,
    groups: Vec<Option<Span>>,
}

impl Candidate {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn captured(&self) -> usize {
        self.groups.iter().filter(|group| group.is_some()).count()
    }

    /// Returns `true` if `self` should be selected over `other`.
    fn beats(&self, other: &Self, tie_break: TieBreak) -> bool {
        match self.len().cmp(&other.len()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                tie_break == TieBreak::MostGroups && self.captured() > other.captured()
            }
        }
    }

    fn into_match(self, input: &str) -> Match<'_> {
        let whole = MatchGroup::new(input, self.start, self.end);
        let submatches = self
            .groups
            .into_iter()
            .map(|group| group.map(|Span { start, end }| MatchGroup::new(input, start, end)))
            .collect();

        Match::new(whole, submatches)
    }
}

#[derive(Debug)]
struct Threads {
    /// Program counters visited by threads outside of any repetition.
    gen: SparseSet,
    /// Program counters visited by threads mid-repetition, keyed with their
    /// counters.
    counted: HashSet<(usize, Vec<usize>)>,
    threads: Vec<Thread>,
    matches: Vec<Candidate>,
}

impl Threads {
    fn with_set_size(set_capacity: usize) -> Self {
        Self {
            gen: SparseSet::new(set_capacity),
            counted: HashSet::new(),
            threads: vec![],
            matches: vec![],
        }
    }

    /// Marks `pc` visited for a thread holding `counters`, returning `false`
    /// if an equivalent thread already visited it this step.
    fn visit(&mut self, pc: usize, counters: &[usize]) -> bool {
        if counters.iter().all(|&count| count == 0) {
            let unvisited = !self.gen.contains(&pc);
            self.gen.insert(pc);
            unvisited
        } else {
            self.counted.insert((pc, counters.to_vec()))
        }
    }

    fn visited(&self) -> usize {
        self.gen.len() + self.counted.len()
    }

    fn clear(&mut self) {
        self.gen.clear();
        self.counted.clear();
        self.threads.clear();
        self.matches.clear();
    }
}

/// Follows every non-consuming instruction reachable from `t` at input
/// offset `sp`, queueing the threads that end on a consuming instruction and
/// recording those that reach a `Match`.
fn add_thread(
    program: &Program,
    thread_list: &mut Threads,
    mut t: Thread,
    sp: usize,
    input: &str,
) -> Result<(), RuntimeError> {
    let inst_idx = t.inst;
    let default_next_inst_idx = inst_idx + 1;

    let opcode = match program.get(inst_idx) {
        // if it's the end of the program without a match instruction, return.
        None => return Ok(()),
        // matches are never deduplicated, every candidate is recorded.
        Some(Opcode::Match(InstMatch { anchored })) => {
            let satisfied = !anchored || sp == input.len();
            if let (true, Some(start)) = (satisfied, t.start) {
                thread_list.matches.push(Candidate {
                    start,
                    end: sp,
                    groups: t.groups,
                });
            }
            return Ok(());
        }
        // Don't visit states we've already added.
        Some(_) if !thread_list.visit(inst_idx.as_usize(), &t.counters) => return Ok(()),
        Some(opcode) => opcode,
    };

    match opcode {
        // A thread that has not yet started begins a match here and is
        // parked on the skip to try again at the following offset.
        Opcode::Skip if t.start.is_none() => {
            let started = Thread {
                start: Some(sp),
                ..t.clone()
            };
            add_thread(
                program,
                thread_list,
                started.at(default_next_inst_idx),
                sp,
                input,
            )?;
            thread_list.threads.push(t);
            Ok(())
        }
        Opcode::Skip => add_thread(program, thread_list, t.at(default_next_inst_idx), sp, input),
        Opcode::Split(InstSplit { x_branch, y_branch }) => {
            add_thread(program, thread_list, t.clone().at(*x_branch), sp, input)?;
            add_thread(program, thread_list, t.at(*y_branch), sp, input)
        }
        Opcode::Jmp(InstJmp { next }) => add_thread(program, thread_list, t.at(*next), sp, input),
        Opcode::StartGroup(InstStartGroup { slot }) => {
            if t.open_group.is_some() {
                return Err(RuntimeError::NestedGroup {
                    pc: inst_idx.as_usize(),
                });
            }

            t.open_group = Some((*slot, sp));
            add_thread(program, thread_list, t.at(default_next_inst_idx), sp, input)
        }
        Opcode::EndGroup(InstEndGroup { .. }) => {
            if let Some((slot, start)) = t.open_group.take() {
                if let Some(group) = slot.checked_sub(1).and_then(|idx| t.groups.get_mut(idx)) {
                    *group = Some(Span { start, end: sp });
                }
            }

            add_thread(program, thread_list, t.at(default_next_inst_idx), sp, input)
        }
        Opcode::Repeat(InstRepeat {
            id,
            origin,
            min,
            max,
        }) => {
            let count = t.counters.get(*id).copied().unwrap_or(0) + 1;
            let may_loop = max.map_or(true, |max| count < max);
            let may_exit = count >= *min && max.map_or(true, |max| count <= max);

            if may_loop {
                let mut looped = t.clone();
                if let Some(counter) = looped.counters.get_mut(*id) {
                    // unbounded repetitions only need to count up to their minimum.
                    *counter = match max {
                        Some(_) => count,
                        None => count.min(*min),
                    };
                }
                add_thread(program, thread_list, looped.at(*origin), sp, input)?;
            }

            if may_exit {
                if let Some(counter) = t.counters.get_mut(*id) {
                    *counter = 0;
                }
                add_thread(program, thread_list, t.at(default_next_inst_idx), sp, input)?;
            }

            Ok(())
        }
        Opcode::Any | Opcode::Consume(_) | Opcode::ConsumeSet(_) => {
            thread_list.threads.push(t);
            Ok(())
        }
        // handled prior to deduplication.
        Opcode::Match(_) => Ok(()),
    }
}

/// Moves newly found candidates into the pool, applying leftmost pruning.
///
/// Once a non-empty match is known, nothing starting after it can be
/// selected, so `leftmost` only ever moves earlier.
fn record_matches(
    found: &mut Vec<Candidate>,
    candidates: &mut Vec<Candidate>,
    leftmost: &mut Option<usize>,
    tie_break: TieBreak,
) {
    for candidate in found.drain(..) {
        if leftmost.map_or(false, |leftmost| candidate.start > leftmost) {
            continue;
        }

        if candidate.is_empty() {
            // an empty match only matters if it beats everything recorded.
            if candidates
                .iter()
                .any(|recorded| !candidate.beats(recorded, tie_break))
            {
                continue;
            }
        } else {
            let start = leftmost.map_or(candidate.start, |leftmost| leftmost.min(candidate.start));
            *leftmost = Some(start);
            candidates.retain(|recorded| recorded.start <= start);
        }

        debug!(
            "candidate match {}..{} with {} group(s)",
            candidate.start,
            candidate.end,
            candidate.captured()
        );
        candidates.push(candidate);
    }
}

/// Picks the longest candidate, resolving ties per `tie_break`. Remaining
/// ties favor the earliest recorded candidate.
fn select(candidates: Vec<Candidate>, tie_break: TieBreak) -> Option<Candidate> {
    candidates
        .into_iter()
        .fold(None, |best: Option<Candidate>, candidate| match best {
            Some(best) if !candidate.beats(&best, tie_break) => Some(best),
            _ => Some(candidate),
        })
}

/// Advances every thread in `current` across `next_char`, found at
/// `input_idx`, adding the survivors to `next`.
fn step(
    program: &Program,
    current: &mut Threads,
    next: &mut Threads,
    input_idx: usize,
    next_char: char,
    input: &str,
) -> Result<(), RuntimeError> {
    let next_idx = input_idx + next_char.len_utf8();

    for thread in current.threads.drain(..) {
        let inst_idx = thread.inst;
        let next_inst = match program.get(inst_idx) {
            // a parked thread stays on the skip for the next offset.
            Some(Opcode::Skip) => Some(inst_idx),
            Some(Opcode::Any) => Some(inst_idx + 1),
            Some(Opcode::Consume(InstConsume { value })) if *value == next_char => {
                Some(inst_idx + 1)
            }
            Some(Opcode::ConsumeSet(InstConsumeSet { idx, membership })) => {
                let is_member = match program.sets.get(*idx) {
                    Some(set) => set.contains(next_char)?,
                    None => false,
                };

                membership.admits(is_member).then_some(inst_idx + 1)
            }
            _ => None,
        };

        if let Some(next_inst) = next_inst {
            add_thread(program, next, thread.at(next_inst), next_idx, input)?;
        }
    }

    Ok(())
}

/// Executes a program against `input`, considering only matches beginning at
/// or after byte offset `from`.
///
/// Returns the leftmost-longest match, `None` if there is no match, or an
/// error if the program hits an unsupported construct while executing.
/// Programs anchored to the start of input only match when `from` is 0.
///
/// A `from` that falls inside a multi-byte character is rounded up to the
/// start of the following character. A `from` past the end of `input`
/// never matches.
pub fn search<'t>(
    program: &Program,
    input: &'t str,
    from: usize,
    config: &MatchConfig,
) -> Result<Option<Match<'t>>, RuntimeError> {
    use core::mem::swap;

    let from = match (from..=input.len()).find(|&idx| input.is_char_boundary(idx)) {
        Some(from) => from,
        None => return Ok(None),
    };

    let start = match (program.is_start_anchored(), from) {
        (true, 0) => Some(0),
        (true, _) => return Ok(None),
        (false, _) => None,
    };

    let program_len = program.len();
    let mut current_thread_list = Threads::with_set_size(program_len);
    let mut next_thread_list = Threads::with_set_size(program_len);
    let mut candidates = vec![];
    let mut leftmost = None;

    add_thread(
        program,
        &mut current_thread_list,
        Thread::new(InstIndex::from(0), start, program),
        from,
        input,
    )?;

    let mut input_idx = from;
    loop {
        record_matches(
            &mut current_thread_list.matches,
            &mut candidates,
            &mut leftmost,
            config.tie_break,
        );
        if let Some(leftmost) = leftmost {
            current_thread_list
                .threads
                .retain(|t| t.start.map_or(false, |start| start <= leftmost));
        }

        trace!(
            "offset {}: {} live thread(s) over {} instruction(s)",
            input_idx,
            current_thread_list.threads.len(),
            current_thread_list.visited()
        );

        if current_thread_list.threads.is_empty() {
            break;
        }

        // at the end of input every consuming instruction fails.
        let next_char = match input[input_idx..].chars().next() {
            Some(c) => c,
            None => break,
        };
        step(
            program,
            &mut current_thread_list,
            &mut next_thread_list,
            input_idx,
            next_char,
            input,
        )?;

        input_idx += next_char.len_utf8();
        swap(&mut current_thread_list, &mut next_thread_list);
        next_thread_list.clear();
    }

    let selected = select(candidates, config.tie_break);
    if let Some(candidate) = &selected {
        debug!("selected match {}..{}", candidate.start, candidate.end);
    }

    Ok(selected.map(|candidate| candidate.into_match(input)))
}

/// Returns the leftmost-longest match of `program` in `input`.
///
/// # Example
///
/// ```
/// use ere_runtime::*;
///
/// // approximate to `a|ab`
/// let program = Program::default().with_opcodes(vec![
///     Opcode::Skip,
///     Opcode::Split(InstSplit::new(InstIndex::from(2), InstIndex::from(4))),
///     Opcode::Consume(InstConsume::new('a')),
///     Opcode::Jmp(InstJmp::new(InstIndex::from(6))),
///     Opcode::Consume(InstConsume::new('a')),
///     Opcode::Consume(InstConsume::new('b')),
///     Opcode::Match(InstMatch::new(false)),
/// ]);
///
/// let found = find(&program, "xaby").unwrap().unwrap();
/// assert_eq!(("ab", 1, 3), (found.as_str(), found.start(), found.end()));
/// ```
pub fn find<'t>(program: &Program, input: &'t str) -> Result<Option<Match<'t>>, RuntimeError> {
    find_with(program, input, &MatchConfig::default())
}

pub fn find_with<'t>(
    program: &Program,
    input: &'t str,
    config: &MatchConfig,
) -> Result<Option<Match<'t>>, RuntimeError> {
    search(program, input, 0, config)
}

/// Returns every non-overlapping match of `program` in `input`, left to
/// right, or `None` if there are none.
pub fn find_all<'t>(
    program: &Program,
    input: &'t str,
) -> Result<Option<Vec<Match<'t>>>, RuntimeError> {
    find_all_with(program, input, &MatchConfig::default())
}

pub fn find_all_with<'t>(
    program: &Program,
    input: &'t str,
    config: &MatchConfig,
) -> Result<Option<Vec<Match<'t>>>, RuntimeError> {
    let mut found = vec![];
    let mut input_idx = 0;

    while let Some(m) = search(program, input, input_idx, config)? {
        // always advance at least one character past an empty match.
        input_idx = match input[m.end()..].chars().next() {
            Some(c) if m.start() == m.end() => m.end() + c.len_utf8(),
            _ => m.end(),
        };
        found.push(m);

        if input_idx >= input.len() {
            break;
        }
    }

    Ok((!found.is_empty()).then_some(found))
}
