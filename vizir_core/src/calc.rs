// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed calculation info carried by a [`SeriesData`](crate::SeriesData).

use crate::{ColId, SeriesId};

/// Per-store metadata shared between pipeline stages.
///
/// Calculation info is distinct from the data itself: it records which dimensions play which
/// role for derived computations, and hints for downstream consumers. Stages that produce it
/// (for example a stack-dimension helper) and stages that read it (the stacking pass, axis
/// extent computation) agree on these fields instead of free-form string keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CalculationInfo {
    /// Dimension holding the raw value to stack.
    pub stacked_dimension: Option<ColId>,
    /// Key dimension used to align rows across series by value.
    pub stacked_by_dimension: Option<ColId>,
    /// Align rows across series by raw row index instead of by a key dimension.
    ///
    /// Takes precedence over [`stacked_by_dimension`](Self::stacked_by_dimension).
    pub is_stacked_by_index: bool,
    /// Output dimension receiving the cumulative stacked value.
    pub stack_result_dimension: Option<ColId>,
    /// Output dimension receiving the baseline beneath the stacked value.
    pub stacked_over_dimension: Option<ColId>,
    /// The series this one is stacked on, if any.
    ///
    /// Navigational only; the stacking computation does not read it.
    pub stacked_on_series: Option<SeriesId>,
    /// The authoritative value dimension for extent and layout computation.
    pub value_dimension: Option<ColId>,
}

impl CalculationInfo {
    /// Returns `true` when both stack output dimensions are bound.
    pub fn has_stack_outputs(&self) -> bool {
        self.stack_result_dimension.is_some() && self.stacked_over_dimension.is_some()
    }
}
