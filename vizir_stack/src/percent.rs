// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Percent normalization of one group.
//!
//! Every member's share of a row needs that row's total, so totals are accumulated over the
//! whole group before any member is written. Members then add their share to a running
//! per-row percentage, so the last member of a row with a nonzero total ends at 100.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use vizir_core::SeriesModel;

use crate::stack::write_outputs;
use crate::{StackInfo, add_safe};

/// Normalizes a group so its cumulative values reach 100 at each row.
///
/// `data_len` is the row count of the group's first member. Each member's result is the running
/// percentage after its own share, and its baseline the running percentage before it. `NaN`
/// values write `NaN` to both outputs and do not count towards totals. A zero total yields a
/// zero share.
pub fn calculate_percent_stack(group: &[StackInfo], series: &mut [SeriesModel], data_len: usize) {
    let totals = accumulate_totals(group, series, data_len);
    let mut cumulative = vec![0.0_f64; data_len];

    for target in group {
        let data = &series[target.series].data;
        let values: Vec<[f64; 2]> = (0..data.count())
            .map(|row| {
                let sum = data.get(target.stacked_dimension, row);
                let (Some(&total), Some(running)) = (totals.get(row), cumulative.get_mut(row))
                else {
                    return [f64::NAN, f64::NAN];
                };
                if sum.is_nan() {
                    return [f64::NAN, f64::NAN];
                }
                let percent = if total == 0.0 {
                    0.0
                } else {
                    sum / total * 100.0
                };
                let stacked_over = *running;
                *running = add_safe(stacked_over, percent);
                [*running, stacked_over]
            })
            .collect();
        write_outputs(target, &mut series[target.series].data, &values);
    }
}

/// Sums each row's stacked values across the group, skipping `NaN`.
fn accumulate_totals(group: &[StackInfo], series: &[SeriesModel], data_len: usize) -> Vec<f64> {
    let mut totals = vec![0.0_f64; data_len];
    for info in group {
        let data = &series[info.series].data;
        for (row, total) in totals.iter_mut().enumerate() {
            let v = data.get(info.stacked_dimension, row);
            if !v.is_nan() {
                *total = add_safe(*total, v);
            }
        }
    }
    totals
}
