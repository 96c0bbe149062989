//! Permutation budget shared by every generation stage.

use serde::{Deserialize, Serialize};

/// Upper bound on the number of results a strategy may return.
///
/// Configured as `max_permutations`; any value `<= 0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Budget(Option<usize>);

impl Budget {
    /// Budget that never truncates.
    pub const fn unbounded() -> Self {
        Self(None)
    }

    /// Budget of at most `n` results; `0` is treated as unbounded.
    pub const fn at_most(n: usize) -> Self {
        if n == 0 {
            Self(None)
        } else {
            Self(Some(n))
        }
    }

    /// Interprets a `max_permutations` setting.
    pub fn from_max_permutations(max_permutations: i64) -> Self {
        if max_permutations <= 0 {
            Self(None)
        } else {
            Self::at_most(usize::try_from(max_permutations).unwrap_or(usize::MAX))
        }
    }

    /// The positive limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.0
    }

    /// Number of results to keep out of `available`.
    pub fn cap(&self, available: usize) -> usize {
        self.0.map_or(available, |limit| limit.min(available))
    }

    /// True once `produced` results exhaust the budget.
    pub fn is_exhausted(&self, produced: usize) -> bool {
        self.0.is_some_and(|limit| produced >= limit)
    }

    /// Keeps the first [`Budget::cap`] items of `items`.
    pub fn truncate<T>(&self, mut items: Vec<T>) -> Vec<T> {
        items.truncate(self.cap(items.len()));
        items
    }
}

impl From<i64> for Budget {
    fn from(value: i64) -> Self {
        Self::from_max_permutations(value)
    }
}

impl From<Budget> for i64 {
    fn from(budget: Budget) -> Self {
        budget
            .0
            .map_or(0, |limit| i64::try_from(limit).unwrap_or(i64::MAX))
    }
}
