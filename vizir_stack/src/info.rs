// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-series stack descriptors.

use vizir_core::{ColId, SeriesData, SeriesId, SeriesModel};

use crate::StackStrategy;

/// How rows are aligned across the series of a stack group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackedBy {
    /// Rows sharing a raw index are the same logical position.
    Index,
    /// Rows whose value in the given key dimension is equal are the same logical position.
    ///
    /// Lookups go through the store's inverted index on that dimension.
    Dimension(ColId),
}

/// A series' stack bindings, resolved once per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackInfo {
    /// Position of the series in the slice handed to the pass.
    pub series: usize,
    /// Identifier of the series.
    pub series_id: SeriesId,
    /// Dimension holding the raw value to stack.
    pub stacked_dimension: ColId,
    /// Row alignment rule.
    pub stacked_by: StackedBy,
    /// Output dimension for the cumulative value.
    pub stack_result_dimension: ColId,
    /// Output dimension for the baseline beneath it.
    pub stacked_over_dimension: ColId,
    /// Parsed stack strategy.
    pub strategy: StackStrategy,
}

impl StackInfo {
    /// Builds a descriptor from a series' calculation info and strategy option.
    ///
    /// Returns `None` when the series cannot be stacked: no stacked dimension, no alignment
    /// rule, or output dimensions that are missing or not writable.
    pub fn from_series(index: usize, series: &SeriesModel) -> Option<Self> {
        let data = &series.data;
        let info = data.calculation_info();
        let stacked_dimension = info.stacked_dimension?;
        let stacked_by = if info.is_stacked_by_index {
            StackedBy::Index
        } else {
            StackedBy::Dimension(info.stacked_by_dimension?)
        };
        let stack_result_dimension = writable(data, info.stack_result_dimension?)?;
        let stacked_over_dimension = writable(data, info.stacked_over_dimension?)?;

        Some(Self {
            series: index,
            series_id: series.id,
            stacked_dimension,
            stacked_by,
            stack_result_dimension,
            stacked_over_dimension,
            strategy: StackStrategy::from_option(series.stack_strategy.as_deref()),
        })
    }

    /// Output dimensions in write order: `[result, stacked_over]`.
    pub fn output_dimensions(&self) -> [ColId; 2] {
        [self.stack_result_dimension, self.stacked_over_dimension]
    }
}

fn writable(data: &SeriesData, col: ColId) -> Option<ColId> {
    data.is_calculation_dimension(col).then_some(col)
}
