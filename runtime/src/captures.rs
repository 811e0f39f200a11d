use std::ops::Range;

/// A resolved capture: the matched text and its byte offsets within the
/// searched input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchGroup<'t> {
    content: &'t str,
    start: usize,
    end: usize,
}

impl<'t> MatchGroup<'t> {
    pub(crate) fn new(input: &'t str, start: usize, end: usize) -> Self {
        Self {
            content: &input[start..end],
            start,
            end,
        }
    }

    pub fn as_str(&self) -> &'t str {
        self.content
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A successful match. Index 0 is the whole match, followed by each
/// capturing group in the order its `(` appeared in the pattern. Groups that
/// did not participate in the match are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    whole: MatchGroup<'t>,
    submatches: Vec<Option<MatchGroup<'t>>>,
}

impl<'t> Match<'t> {
    pub(crate) fn new(whole: MatchGroup<'t>, submatches: Vec<Option<MatchGroup<'t>>>) -> Self {
        Self { whole, submatches }
    }

    /// Returns the group at `idx`, if it exists and participated.
    pub fn get(&self, idx: usize) -> Option<&MatchGroup<'t>> {
        match idx {
            0 => Some(&self.whole),
            _ => self.submatches.get(idx - 1).and_then(Option::as_ref),
        }
    }

    /// The number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.submatches.len() + 1
    }

    /// Always `false`, group 0 is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&MatchGroup<'t>>> + '_ {
        std::iter::once(Some(&self.whole)).chain(self.submatches.iter().map(Option::as_ref))
    }

    pub fn as_str(&self) -> &'t str {
        self.whole.as_str()
    }

    pub fn start(&self) -> usize {
        self.whole.start()
    }

    pub fn end(&self) -> usize {
        self.whole.end()
    }
}
