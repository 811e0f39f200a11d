//! Provides a SparseSet of program counters, cleared between input steps.

/// A set of `usize` values bounded by an expected maximum, supporting
/// constant time insertion, lookup and clearing.
pub(crate) struct SparseSet {
    dense: Vec<usize>,
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Initializes a new set taking a value representing the maximum size
    /// of the set.
    #[must_use]
    pub(crate) fn new(max_len: usize) -> Self {
        Self {
            dense: Vec::with_capacity(max_len),
            sparse: vec![0; max_len],
        }
    }

    /// Returns the number of elements in the set.
    pub(crate) fn len(&self) -> usize {
        self.dense.len()
    }

    /// Inserts a value into the set.
    pub(crate) fn insert(&mut self, val: usize) {
        if self.contains(&val) {
            return;
        }

        if self.sparse.len() <= val {
            // double the size.
            self.resize((val + 1) * 2)
        }

        self.sparse[val] = self.dense.len();
        self.dense.push(val);
    }

    /// Returns `true` if the set contains a value.
    pub(crate) fn contains(&self, val: &usize) -> bool {
        self.sparse
            .get(*val)
            .map(|&dense_idx| self.dense.get(dense_idx) == Some(val))
            // if none, the bounds of the set are exceeded and thus doesn't
            // contain the value.
            .unwrap_or(false)
    }

    /// Clears the set, removing all values.
    pub(crate) fn clear(&mut self) {
        self.dense.clear();
    }

    fn resize(&mut self, new_len: usize) {
        self.sparse.resize(new_len, 0)
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SparseSet({:?})", &self.dense)
    }
}
