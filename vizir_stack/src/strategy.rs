// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack strategies.

use core::fmt;

/// Policy deciding which earlier series in a group a value stacks onto.
///
/// Sign-aware strategies scan earlier series from the most recent backwards and stack onto the
/// first one whose already-stacked value passes [`includes`](Self::includes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StackStrategy {
    /// Positive values stack on positive values, negative on negative.
    #[default]
    SameSign,
    /// Stack onto the previous series regardless of sign.
    All,
    /// Only stack onto positive values.
    Positive,
    /// Only stack onto negative values.
    Negative,
    /// Normalize each row so the group's cumulative values reach 100.
    Percent,
}

impl StackStrategy {
    /// Parses a strategy option.
    ///
    /// Absent and unrecognized strings fall back to [`StackStrategy::SameSign`].
    pub fn from_option(option: Option<&str>) -> Self {
        option.map_or(Self::SameSign, Self::from)
    }

    /// Returns the option string for this strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SameSign => "samesign",
            Self::All => "all",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Percent => "percent",
        }
    }

    /// Returns `true` if a value with running sum `sum` may stack onto the stacked value `val`.
    ///
    /// [`StackStrategy::Percent`] never stacks onto another value this way.
    pub fn includes(self, sum: f64, val: f64) -> bool {
        match self {
            Self::All => true,
            Self::Positive => val > 0.0,
            Self::Negative => val < 0.0,
            Self::SameSign => (sum >= 0.0 && val > 0.0) || (sum <= 0.0 && val < 0.0),
            Self::Percent => false,
        }
    }
}

impl From<&str> for StackStrategy {
    fn from(value: &str) -> Self {
        match value {
            "all" => Self::All,
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "percent" => Self::Percent,
            _ => Self::SameSign,
        }
    }
}

impl fmt::Display for StackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
