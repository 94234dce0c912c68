// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked series values for `vizir_core` stores.
//!
//! This crate derives, for every series that shares a stack key with others:
//! - a cumulative "stack result" value per row, and
//! - the "stacked over" baseline directly beneath it,
//!
//! written into calculation dimensions of each series' [`SeriesData`](vizir_core::SeriesData).
//!
//! A pass ([`data_stack`]) groups series by stack key in encounter order, then computes each
//! group independently. Sign-aware strategies ([`StackStrategy`]) stack each row onto the most
//! recent earlier series whose stacked value qualifies; the percent strategy rescales a group
//! so each row's cumulative values reach 100. Every summation goes through [`add_safe`].
//!
//! Stores are prepared with [`enable_data_stack`], which binds the dimensions a pass reads and
//! writes. Nothing here fails at runtime: series that cannot be stacked are skipped and missing
//! values propagate as `NaN`.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(not(feature = "std"))]
mod float;
mod group;
mod helper;
mod info;
mod number;
mod percent;
mod stack;
mod strategy;

pub use group::{StackGroup, data_stack, group_series};
pub use helper::{StackDimensions, enable_data_stack, is_dimension_stacked, stacked_dimension_for};
pub use info::{StackInfo, StackedBy};
pub use number::{ROUND_SUPPORTED_PRECISION_MAX, add_safe, precision};
pub use percent::calculate_percent_stack;
pub use stack::calculate_stack;
pub use strategy::StackStrategy;
