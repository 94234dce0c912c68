// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sign-aware stacking of one group.

extern crate alloc;

use alloc::vec::Vec;

use vizir_core::{SeriesData, SeriesModel};

use crate::percent::calculate_percent_stack;
use crate::{StackInfo, StackStrategy, StackedBy, add_safe};

/// Computes stacked values for one stack group.
///
/// `group` lists the group's descriptors in stacking order; each descriptor's `series` indexes
/// into `series`. When any member uses [`StackStrategy::Percent`], the whole group is
/// normalized by [`calculate_percent_stack`]. Otherwise every member is stacked with its own
/// sign-aware strategy, in group order, so later members see earlier members' results.
///
/// Afterwards each member's value dimension is its stack result dimension.
///
/// `group` must not be empty.
pub fn calculate_stack(group: &[StackInfo], series: &mut [SeriesModel]) {
    debug_assert!(!group.is_empty(), "stack groups are never empty");
    let Some(first) = group.first() else {
        return;
    };
    let data_len = series[first.series].data.count();

    if group.iter().any(|i| i.strategy == StackStrategy::Percent) {
        log::trace!(
            "percent stacking {} series over {data_len} rows",
            group.len()
        );
        calculate_percent_stack(group, series, data_len);
    } else {
        log::trace!("stacking {} series over {data_len} rows", group.len());
        for (idx, target) in group.iter().enumerate() {
            let values = stack_rows(target, &group[..idx], series);
            write_outputs(target, &mut series[target.series].data, &values);
        }
    }

    mark_value_dimension(group, series);
}

/// Computes `[result, stacked_over]` for every visible row of `target`.
///
/// `below` holds the members preceding `target`, whose results are already written.
fn stack_rows(target: &StackInfo, below: &[StackInfo], series: &[SeriesModel]) -> Vec<[f64; 2]> {
    let data = &series[target.series].data;
    (0..data.count())
        .map(|row| {
            let sum = data.get(target.stacked_dimension, row);
            // NaN outputs let area marks detect gaps.
            if sum.is_nan() {
                return [f64::NAN, f64::NAN];
            }
            stack_value(target, below, series, row, sum)
        })
        .collect()
}

fn stack_value(
    target: &StackInfo,
    below: &[StackInfo],
    series: &[SeriesModel],
    row: usize,
    mut sum: f64,
) -> [f64; 2] {
    let data = &series[target.series].data;
    let by_value = match target.stacked_by {
        StackedBy::Index => f64::NAN,
        StackedBy::Dimension(col) => data.get(col, row),
    };

    // NaN renders as "starts from the baseline".
    let mut stacked_over = f64::NAN;
    for info in below.iter().rev() {
        let below_data = &series[info.series].data;
        let Some(raw) = aligned_raw_index(target, data, info, below_data, row, by_value) else {
            continue;
        };
        let val = below_data.get_by_raw_index(info.stack_result_dimension, raw);
        if target.strategy.includes(sum, val) {
            sum = add_safe(sum, val);
            stacked_over = val;
            break;
        }
    }
    [sum, stacked_over]
}

/// Resolves the raw row in `below_data` at the same logical position as `row` of `data`.
fn aligned_raw_index(
    target: &StackInfo,
    data: &SeriesData,
    below: &StackInfo,
    below_data: &SeriesData,
    row: usize,
    by_value: f64,
) -> Option<usize> {
    match (target.stacked_by, below.stacked_by) {
        // Past the end of `below_data` the aligned value reads as NaN.
        (StackedBy::Index, _) => data.raw_index(row),
        (StackedBy::Dimension(_), StackedBy::Dimension(col)) => {
            below_data.raw_index_of(col, by_value)
        }
        // A below series aligned by index has no key dimension to look the value up in.
        (StackedBy::Dimension(_), StackedBy::Index) => None,
    }
}

pub(crate) fn write_outputs(target: &StackInfo, data: &mut SeriesData, values: &[[f64; 2]]) {
    if let Err(err) = data.modify(target.output_dimensions(), values) {
        log::warn!(
            "failed to write stack outputs for series {:?}: {err:?}",
            target.series_id
        );
    }
}

fn mark_value_dimension(group: &[StackInfo], series: &mut [SeriesModel]) {
    for info in group {
        series[info.series]
            .data
            .calculation_info_mut()
            .value_dimension = Some(info.stack_result_dimension);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use vizir_core::{ColId, SeriesData, SeriesId, SeriesModel};

    use super::*;
    use crate::enable_data_stack;

    fn series(id: u32, values: Vec<f64>, strategy: &str) -> SeriesModel {
        let n = values.len();
        let mut data = SeriesData::from_columns([
            ("x", (0..n).map(|i| i as f64).collect()),
            ("y", values),
        ])
        .unwrap();
        enable_data_stack(&mut data, ColId(1), None).unwrap();
        SeriesModel::new(SeriesId(id), data)
            .with_stack("s")
            .with_stack_strategy(strategy)
    }

    fn group(series: &[SeriesModel]) -> Vec<StackInfo> {
        series
            .iter()
            .enumerate()
            .map(|(i, s)| StackInfo::from_series(i, s).unwrap())
            .collect()
    }

    fn outputs(s: &SeriesModel) -> (Vec<f64>, Vec<f64>) {
        let info = s.data.calculation_info();
        (
            s.data.column(info.stack_result_dimension.unwrap()),
            s.data.column(info.stacked_over_dimension.unwrap()),
        )
    }

    #[test]
    fn first_member_has_no_baseline() {
        let mut s = vec![series(1, vec![3.0, -2.0], "samesign")];
        let g = group(&s);
        calculate_stack(&g, &mut s);
        let (result, over) = outputs(&s[0]);
        assert_eq!(result, vec![3.0, -2.0]);
        assert!(over.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn all_strategy_stacks_across_signs() {
        let mut s = vec![
            series(1, vec![5.0], "all"),
            series(2, vec![-2.0], "all"),
        ];
        let g = group(&s);
        calculate_stack(&g, &mut s);
        assert_eq!(outputs(&s[1]), (vec![3.0], vec![5.0]));
    }

    #[test]
    fn positive_strategy_only_stacks_onto_positive_values() {
        let mut s = vec![
            series(1, vec![5.0, -4.0], "positive"),
            series(2, vec![-2.0, 1.0], "positive"),
        ];
        let g = group(&s);
        calculate_stack(&g, &mut s);
        let (result, over) = outputs(&s[1]);
        assert_eq!(result[0], 3.0);
        assert_eq!(over[0], 5.0);
        assert_eq!(result[1], 1.0);
        assert!(over[1].is_nan());
    }

    #[test]
    fn negative_strategy_only_stacks_onto_negative_values() {
        let mut s = vec![
            series(1, vec![5.0, -4.0], "negative"),
            series(2, vec![2.0, 1.0], "negative"),
        ];
        let g = group(&s);
        calculate_stack(&g, &mut s);
        let (result, over) = outputs(&s[1]);
        assert_eq!(result[0], 2.0);
        assert!(over[0].is_nan());
        assert_eq!(result[1], -3.0);
        assert_eq!(over[1], -4.0);
    }

    #[test]
    fn each_member_uses_its_own_strategy() {
        let mut s = vec![
            series(1, vec![5.0], "samesign"),
            series(2, vec![-2.0], "samesign"),
            series(3, vec![-1.0], "all"),
        ];
        let g = group(&s);
        calculate_stack(&g, &mut s);
        // Series 2 does not stack on 5 under samesign.
        assert_eq!(outputs(&s[1]).0, vec![-2.0]);
        // Series 3 stacks on its immediate predecessor under `all`.
        assert_eq!(outputs(&s[2]), (vec![-3.0], vec![-2.0]));
    }

    #[test]
    fn sets_value_dimension() {
        let mut s = vec![series(1, vec![1.0], "samesign")];
        let g = group(&s);
        calculate_stack(&g, &mut s);
        let info = s[0].data.calculation_info();
        assert_eq!(info.value_dimension, info.stack_result_dimension);
    }
}
