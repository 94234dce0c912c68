// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping series by stack key and running one stacking pass.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;
use vizir_core::SeriesModel;

use crate::{StackInfo, calculate_stack};

/// Members of one stack group, in encounter order.
pub type StackGroup = SmallVec<[StackInfo; 4]>;

/// Partitions series into stack groups.
///
/// Series are visited in slice order. A series joins the group of its non-empty stack key if
/// its calculation info describes a stackable dimension (see [`StackInfo::from_series`]);
/// otherwise it is skipped. Each joining series gets a `stacked_on_series` link to the member
/// that joined the group before it, and loses any link from a previous pass otherwise.
///
/// Groups are returned in the order their keys were first seen.
pub fn group_series(series: &mut [SeriesModel]) -> Vec<StackGroup> {
    let mut keys: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<StackGroup> = Vec::new();

    for idx in 0..series.len() {
        let model = &series[idx];
        let Some(key) = model.stack_key() else {
            continue;
        };
        let group = match keys.get(key) {
            Some(&g) => g,
            None => {
                keys.insert(String::from(key), groups.len());
                groups.push(StackGroup::new());
                groups.len() - 1
            }
        };

        let Some(info) = StackInfo::from_series(idx, model) else {
            log::debug!(
                "series {:?} has stack key {key:?} but no stackable dimension; skipping",
                model.id
            );
            continue;
        };

        let members = &mut groups[group];
        let stacked_on = members.last().map(|prev| prev.series_id);
        series[idx].data.calculation_info_mut().stacked_on_series = stacked_on;
        members.push(info);
    }

    // A key whose series were all skipped leaves an empty group behind.
    groups.retain(|g| !g.is_empty());
    groups
}

/// Runs one stacking pass over all series.
///
/// Groups series by stack key and computes every group independently. Output dimensions and
/// calculation info are overwritten on each pass; raw dimensions are only read.
pub fn data_stack(series: &mut [SeriesModel]) {
    for group in group_series(series) {
        calculate_stack(&group, series);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use vizir_core::{ColId, SeriesData, SeriesId};

    use super::*;
    use crate::enable_data_stack;

    fn stackable(id: u32) -> SeriesModel {
        let mut data = SeriesData::from_columns([("y", vec![1.0, 2.0])]).unwrap();
        enable_data_stack(&mut data, ColId(0), None).unwrap();
        SeriesModel::new(SeriesId(id), data)
    }

    fn unstackable(id: u32) -> SeriesModel {
        SeriesModel::new(
            SeriesId(id),
            SeriesData::from_columns([("y", vec![1.0, 2.0])]).unwrap(),
        )
    }

    #[test]
    fn groups_by_key_in_encounter_order() {
        let mut s = vec![
            stackable(1).with_stack("b"),
            stackable(2).with_stack("a"),
            stackable(3).with_stack("b"),
            stackable(4),
            stackable(5).with_stack(""),
        ];
        let groups = group_series(&mut s);
        assert_eq!(groups.len(), 2);
        let ids = |g: &StackGroup| g.iter().map(|i| i.series_id.0).collect::<Vec<_>>();
        assert_eq!(ids(&groups[0]), vec![1, 3]);
        assert_eq!(ids(&groups[1]), vec![2]);
    }

    #[test]
    fn links_each_member_to_previous_valid_member() {
        let mut s = vec![
            stackable(1).with_stack("s"),
            unstackable(2).with_stack("s"),
            stackable(3).with_stack("s"),
        ];
        let groups = group_series(&mut s);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(s[0].data.calculation_info().stacked_on_series, None);
        assert_eq!(s[1].data.calculation_info().stacked_on_series, None);
        assert_eq!(
            s[2].data.calculation_info().stacked_on_series,
            Some(SeriesId(1))
        );
    }

    #[test]
    fn clears_stale_links_when_regrouped() {
        let mut s = vec![stackable(1).with_stack("s"), stackable(2).with_stack("s")];
        group_series(&mut s);
        assert_eq!(
            s[1].data.calculation_info().stacked_on_series,
            Some(SeriesId(1))
        );

        s[0].stack = Some("other".into());
        group_series(&mut s);
        assert_eq!(s[1].data.calculation_info().stacked_on_series, None);
    }

    #[test]
    fn drops_groups_without_valid_members() {
        let mut s = vec![unstackable(1).with_stack("s")];
        assert!(group_series(&mut s).is_empty());
    }

    #[test]
    fn missing_alignment_excludes_series() {
        let mut s = vec![stackable(1).with_stack("s")];
        let info = s[0].data.calculation_info_mut();
        info.is_stacked_by_index = false;
        info.stacked_by_dimension = None;
        assert!(group_series(&mut s).is_empty());
    }

    #[test]
    fn unstacked_series_outputs_are_untouched() {
        let mut s = vec![stackable(1), stackable(2).with_stack("s")];
        data_stack(&mut s);
        let info = s[0].data.calculation_info();
        assert_eq!(info.value_dimension, None);
        let result = s[0].data.column(info.stack_result_dimension.unwrap());
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
