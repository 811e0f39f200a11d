/// Selects how equal-length matches starting at the same offset are
/// disambiguated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Prefer the candidate that captured more groups. This goes beyond
    /// what POSIX mandates.
    #[default]
    MostGroups,
    /// Prefer the earliest recorded candidate, i.e. the highest priority
    /// thread.
    FirstFound,
}

/// Options applied to a single search.
///
/// # Example
///
/// ```
/// use ere_runtime::{MatchConfig, TieBreak};
///
/// let config = MatchConfig::default().with_tie_break(TieBreak::FirstFound);
/// assert_eq!(TieBreak::FirstFound, config.tie_break);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub tie_break: TieBreak,
}

impl MatchConfig {
    #[must_use]
    pub fn with_tie_break(self, tie_break: TieBreak) -> Self {
        Self { tie_break }
    }
}
