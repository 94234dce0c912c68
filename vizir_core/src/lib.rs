// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `vizir_core`: columnar series stores for derived-value pipelines.
//!
//! This crate provides:
//! - stable identifiers for columns ([`ColId`]) and series ([`SeriesId`]),
//! - a numeric columnar store ([`SeriesData`]) whose visible rows are a view over raw rows,
//! - typed per-store metadata ([`CalculationInfo`]) used to carry dimension bindings between
//!   pipeline stages, and
//! - the per-series configuration record ([`SeriesModel`]) that pipeline stages iterate.
//!
//! It intentionally does NOT compute anything: stages such as stacking read raw dimensions and
//! write calculation dimensions through the store API.
//!
//! Conceptually, a chart frontend can:
//! - load each series' values into a [`SeriesData`] (one column per dimension),
//! - mark key columns as indexed so other stages can look rows up by value,
//! - add calculation dimensions for derived outputs, and
//! - hand the [`SeriesModel`] list to the processing stages in order.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod calc;
mod data;
mod series;

pub use calc::CalculationInfo;
pub use data::{SeriesData, SeriesDataError};
pub use series::SeriesModel;

/// Stable identifier for a column (dimension) of a [`SeriesData`].
///
/// Column ids are positional: the `n`-th dimension added to a store has id `ColId(n)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColId(pub u32);

impl ColId {
    /// Returns the column position inside its store.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable identifier for a series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub u32);
