// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Preparing stores for stacking, and stacked-dimension queries for consumers.

extern crate alloc;

use alloc::format;

use vizir_core::{ColId, SeriesData, SeriesDataError};

/// Dimension bindings written by [`enable_data_stack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackDimensions {
    /// Dimension holding the raw value to stack.
    pub stacked_dimension: ColId,
    /// Key dimension for value alignment; `None` means rows align by index.
    pub stacked_by_dimension: Option<ColId>,
    /// Calculation dimension receiving the cumulative value.
    pub stack_result_dimension: ColId,
    /// Calculation dimension receiving the baseline beneath it.
    pub stacked_over_dimension: ColId,
}

/// Prepares a store so its series can take part in stacking.
///
/// Adds the two output calculation dimensions (named after the stacked dimension), builds the
/// inverted index for `stacked_by` when one is given, and records the bindings in the store's
/// calculation info. Without `stacked_by`, rows align across series by index.
///
/// Calling this again with the same arguments reuses the existing output dimensions.
pub fn enable_data_stack(
    data: &mut SeriesData,
    stacked: ColId,
    stacked_by: Option<ColId>,
) -> Result<StackDimensions, SeriesDataError> {
    let name = data
        .dimension_name(stacked)
        .ok_or(SeriesDataError::UnknownDimension(stacked))?;
    let result_name = format!("__stack_result__{name}");
    let over_name = format!("__stacked_over__{name}");

    if let Some(by) = stacked_by
        && !data.has_inverted_index(by)
    {
        data.enable_inverted_index(by)?;
    }
    let stack_result_dimension = data.add_calculation_dimension(result_name)?;
    let stacked_over_dimension = data.add_calculation_dimension(over_name)?;

    let info = data.calculation_info_mut();
    info.stacked_dimension = Some(stacked);
    info.stacked_by_dimension = stacked_by;
    info.is_stacked_by_index = stacked_by.is_none();
    info.stack_result_dimension = Some(stack_result_dimension);
    info.stacked_over_dimension = Some(stacked_over_dimension);

    Ok(StackDimensions {
        stacked_dimension: stacked,
        stacked_by_dimension: stacked_by,
        stack_result_dimension,
        stacked_over_dimension,
    })
}

/// Returns `true` if `col` is the dimension a store stacks.
pub fn is_dimension_stacked(data: &SeriesData, col: ColId) -> bool {
    data.calculation_info().stacked_dimension == Some(col)
}

/// Returns the dimension consumers should read in place of `col`.
///
/// For the stacked dimension this is the stack result dimension; every other dimension maps to
/// itself.
pub fn stacked_dimension_for(data: &SeriesData, col: ColId) -> ColId {
    let info = data.calculation_info();
    match info.stack_result_dimension {
        Some(result) if is_dimension_stacked(data, col) => result,
        _ => col,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn data() -> SeriesData {
        SeriesData::from_columns([("x", vec![0.0, 1.0]), ("y", vec![3.0, 4.0])]).unwrap()
    }

    #[test]
    fn enable_by_index_binds_outputs() {
        let mut d = data();
        let x = d.dimension("x").unwrap();
        let y = d.dimension("y").unwrap();
        let dims = enable_data_stack(&mut d, y, None).unwrap();

        let info = d.calculation_info();
        assert!(info.is_stacked_by_index);
        assert_eq!(info.stacked_dimension, Some(y));
        assert_eq!(info.stack_result_dimension, Some(dims.stack_result_dimension));
        assert_eq!(
            d.dimension_name(dims.stack_result_dimension),
            Some("__stack_result__y")
        );
        assert!(d.is_calculation_dimension(dims.stacked_over_dimension));
        assert!(!d.has_inverted_index(x));
    }

    #[test]
    fn enable_by_dimension_indexes_key() {
        let mut d = data();
        let x = d.dimension("x").unwrap();
        let y = d.dimension("y").unwrap();
        enable_data_stack(&mut d, y, Some(x)).unwrap();
        assert!(!d.calculation_info().is_stacked_by_index);
        assert_eq!(d.raw_index_of(x, 1.0), Some(1));
    }

    #[test]
    fn enable_is_repeatable() {
        let mut d = data();
        let y = d.dimension("y").unwrap();
        let a = enable_data_stack(&mut d, y, None).unwrap();
        let b = enable_data_stack(&mut d, y, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(d.dimension_count(), 4);
    }

    #[test]
    fn enable_rejects_unknown_dimension() {
        let mut d = data();
        assert_eq!(
            enable_data_stack(&mut d, ColId(7), None).unwrap_err(),
            SeriesDataError::UnknownDimension(ColId(7))
        );
    }

    #[test]
    fn stacked_dimension_for_maps_only_the_stacked_dimension() {
        let mut d = data();
        let x = d.dimension("x").unwrap();
        let y = d.dimension("y").unwrap();
        assert_eq!(stacked_dimension_for(&d, y), y);

        let dims = enable_data_stack(&mut d, y, Some(x)).unwrap();
        assert!(is_dimension_stacked(&d, y));
        assert!(!is_dimension_stacked(&d, x));
        assert_eq!(stacked_dimension_for(&d, y), dims.stack_result_dimension);
        assert_eq!(stacked_dimension_for(&d, x), x);
    }
}
