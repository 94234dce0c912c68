// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned columnar store for one series.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::{CalculationInfo, ColId};

/// Errors returned when building or writing a [`SeriesData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesDataError {
    /// The requested dimension list is empty.
    EmptyDimensions,
    /// A dimension with the same name already exists.
    DuplicateDimension(String),
    /// More dimensions than a [`ColId`] can address.
    TooManyDimensions,
    /// A column does not have the same length as the others.
    LengthMismatch {
        /// The offending column.
        dimension: ColId,
        /// Expected number of raw rows.
        expected: usize,
        /// Actual number of values.
        got: usize,
    },
    /// A row or value slice does not have the expected length.
    RowMismatch {
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },
    /// The referenced dimension does not exist.
    UnknownDimension(ColId),
    /// A write targeted a raw input dimension.
    NotCalculationDimension(ColId),
}

impl fmt::Display for SeriesDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimensions => f.write_str("no dimensions given"),
            Self::DuplicateDimension(name) => write!(f, "duplicate dimension `{name}`"),
            Self::TooManyDimensions => f.write_str("too many dimensions"),
            Self::LengthMismatch {
                dimension,
                expected,
                got,
            } => write!(
                f,
                "dimension {} has {got} values, expected {expected}",
                dimension.0
            ),
            Self::RowMismatch { expected, got } => {
                write!(f, "expected {expected} entries, got {got}")
            }
            Self::UnknownDimension(col) => write!(f, "unknown dimension {}", col.0),
            Self::NotCalculationDimension(col) => {
                write!(f, "dimension {} is not a calculation dimension", col.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SeriesDataError {}

#[derive(Debug, Clone)]
struct Dimension {
    name: String,
    is_calculation: bool,
}

/// A numeric columnar store holding one series' values.
///
/// Columns are stored by *raw index*: the position a row had when it was loaded. The rows a
/// caller sees (`0..count()`) are a view over raw rows, which filtering can narrow without
/// moving any stored value. Cross-series alignment uses raw indices so it stays stable when a
/// view is filtered.
///
/// Two kinds of dimensions exist:
/// - raw dimensions, loaded with the data and never written afterwards, and
/// - calculation dimensions, added by pipeline stages and written through [`modify`].
///
/// Missing values are represented as `NaN`.
///
/// [`modify`]: Self::modify
#[derive(Debug, Clone)]
pub struct SeriesData {
    dimensions: Vec<Dimension>,
    /// Columnar numeric data by raw index, aligned to `dimensions`.
    columns: Vec<Vec<f64>>,
    raw_count: usize,
    /// Visible row -> raw index. `None` means the identity view.
    indices: Option<Vec<usize>>,
    /// Value (normalized bits) -> first raw index holding it, per indexed dimension.
    inverted: HashMap<ColId, HashMap<u64, usize>>,
    calculation_info: CalculationInfo,
}

impl SeriesData {
    /// Create an empty store with the given raw dimensions.
    pub fn new<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self, SeriesDataError> {
        Self::from_columns(names.into_iter().map(|name| (name, Vec::new())))
    }

    /// Create a store from named raw columns.
    ///
    /// All columns must have the same length.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) -> Result<Self, SeriesDataError> {
        let mut data = Self {
            dimensions: Vec::new(),
            columns: Vec::new(),
            raw_count: 0,
            indices: None,
            inverted: HashMap::new(),
            calculation_info: CalculationInfo::default(),
        };
        for (name, values) in columns {
            let col = data.push_dimension(name.into(), false)?;
            if col.0 == 0 {
                data.raw_count = values.len();
            } else if values.len() != data.raw_count {
                return Err(SeriesDataError::LengthMismatch {
                    dimension: col,
                    expected: data.raw_count,
                    got: values.len(),
                });
            }
            data.columns.push(values);
        }
        if data.dimensions.is_empty() {
            return Err(SeriesDataError::EmptyDimensions);
        }
        Ok(data)
    }

    fn push_dimension(
        &mut self,
        name: String,
        is_calculation: bool,
    ) -> Result<ColId, SeriesDataError> {
        if self.dimension(&name).is_some() {
            return Err(SeriesDataError::DuplicateDimension(name));
        }
        let id = u32::try_from(self.dimensions.len())
            .map_err(|_| SeriesDataError::TooManyDimensions)?;
        self.dimensions.push(Dimension {
            name,
            is_calculation,
        });
        Ok(ColId(id))
    }

    /// Returns the id of the dimension with the given name.
    pub fn dimension(&self, name: &str) -> Option<ColId> {
        let idx = self.dimensions.iter().position(|d| d.name == name)?;
        u32::try_from(idx).ok().map(ColId)
    }

    /// Returns the name of a dimension.
    pub fn dimension_name(&self, col: ColId) -> Option<&str> {
        self.dimensions.get(col.index()).map(|d| d.name.as_str())
    }

    /// Returns the number of dimensions, raw and calculation.
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns `true` if `col` was added by [`add_calculation_dimension`](Self::add_calculation_dimension).
    pub fn is_calculation_dimension(&self, col: ColId) -> bool {
        self.dimensions
            .get(col.index())
            .is_some_and(|d| d.is_calculation)
    }

    /// Add a writable calculation dimension, filled with `NaN`.
    ///
    /// Adding a calculation dimension that already exists returns its id, so stages can call
    /// this on every pass. A raw dimension with the same name is an error.
    pub fn add_calculation_dimension(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ColId, SeriesDataError> {
        let name = name.into();
        if let Some(col) = self.dimension(&name) {
            if self.is_calculation_dimension(col) {
                return Ok(col);
            }
            return Err(SeriesDataError::DuplicateDimension(name));
        }
        let col = self.push_dimension(name, true)?;
        self.columns.push(vec![f64::NAN; self.raw_count]);
        Ok(col)
    }

    /// Build (or rebuild) the inverted index for a dimension.
    ///
    /// When several raw rows hold the same value, the first one is indexed. `NaN` values are
    /// never indexed, and `-0.0` is indexed as `0.0`.
    pub fn enable_inverted_index(&mut self, col: ColId) -> Result<(), SeriesDataError> {
        let column = self
            .columns
            .get(col.index())
            .ok_or(SeriesDataError::UnknownDimension(col))?;
        let index = build_index(column);
        self.inverted.insert(col, index);
        Ok(())
    }

    /// Returns `true` if `col` has an inverted index.
    pub fn has_inverted_index(&self, col: ColId) -> bool {
        self.inverted.contains_key(&col)
    }

    /// Append a row of raw values.
    ///
    /// `values` holds one value per raw dimension, in dimension order; calculation dimensions
    /// are filled with `NaN`. The new row is visible even when the view is filtered. Returns the
    /// raw index of the new row.
    pub fn append_row(&mut self, values: &[f64]) -> Result<usize, SeriesDataError> {
        let expected = self.dimensions.iter().filter(|d| !d.is_calculation).count();
        if values.len() != expected {
            return Err(SeriesDataError::RowMismatch {
                expected,
                got: values.len(),
            });
        }

        let raw = self.raw_count;
        let mut next = values.iter();
        for (idx, (dim, column)) in self.dimensions.iter().zip(&mut self.columns).enumerate() {
            let v = if dim.is_calculation {
                f64::NAN
            } else {
                next.next().copied().unwrap_or(f64::NAN)
            };
            column.push(v);
            if let Ok(id) = u32::try_from(idx)
                && let Some(index) = self.inverted.get_mut(&ColId(id))
                && let Some(key) = index_key(v)
            {
                index.entry(key).or_insert(raw);
            }
        }
        self.raw_count += 1;
        if let Some(indices) = &mut self.indices {
            indices.push(raw);
        }
        Ok(raw)
    }

    /// Returns the number of visible rows.
    pub fn count(&self) -> usize {
        self.indices.as_ref().map_or(self.raw_count, Vec::len)
    }

    /// Returns the number of raw rows, visible or not.
    pub fn raw_count(&self) -> usize {
        self.raw_count
    }

    /// Translates a visible row into its raw index.
    pub fn raw_index(&self, row: usize) -> Option<usize> {
        match &self.indices {
            Some(indices) => indices.get(row).copied(),
            None => (row < self.raw_count).then_some(row),
        }
    }

    /// Gets a value for a visible row.
    ///
    /// Returns `NaN` if the row or the dimension does not exist.
    pub fn get(&self, col: ColId, row: usize) -> f64 {
        self.raw_index(row)
            .map_or(f64::NAN, |raw| self.get_by_raw_index(col, raw))
    }

    /// Gets a value by raw index, whether or not that row is visible.
    ///
    /// Returns `NaN` if the raw row or the dimension does not exist.
    pub fn get_by_raw_index(&self, col: ColId, raw: usize) -> f64 {
        self.columns
            .get(col.index())
            .and_then(|c| c.get(raw))
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Looks up the raw index of the row whose `col` value equals `value`.
    ///
    /// Requires an inverted index on `col` (see [`enable_inverted_index`]); returns `None`
    /// without one, for `NaN`, and when no row holds the value.
    ///
    /// [`enable_inverted_index`]: Self::enable_inverted_index
    pub fn raw_index_of(&self, col: ColId, value: f64) -> Option<usize> {
        let index = self.inverted.get(&col)?;
        index.get(&index_key(value)?).copied()
    }

    /// Writes calculation dimensions for every visible row.
    ///
    /// `values[row]` holds the values for `dims` at visible row `row`. Writes go to the raw
    /// index behind each row; raw rows hidden by a filter keep their previous values. Raw input
    /// dimensions are never writable. Inverted indices on written dimensions are rebuilt.
    pub fn modify<const N: usize>(
        &mut self,
        dims: [ColId; N],
        values: &[[f64; N]],
    ) -> Result<(), SeriesDataError> {
        for col in dims {
            if col.index() >= self.columns.len() {
                return Err(SeriesDataError::UnknownDimension(col));
            }
            if !self.is_calculation_dimension(col) {
                return Err(SeriesDataError::NotCalculationDimension(col));
            }
        }
        let count = self.count();
        if values.len() != count {
            return Err(SeriesDataError::RowMismatch {
                expected: count,
                got: values.len(),
            });
        }

        for (row, row_values) in values.iter().enumerate() {
            let Some(raw) = self.raw_index(row) else {
                continue;
            };
            for (col, &v) in dims.iter().zip(row_values) {
                self.columns[col.index()][raw] = v;
            }
        }
        for col in dims {
            if let Some(index) = self.inverted.get_mut(&col) {
                *index = build_index(&self.columns[col.index()]);
            }
        }
        Ok(())
    }

    /// Narrows the visible rows to those for which `keep` returns `true`.
    ///
    /// `keep` receives the store and a visible row index. Filtering composes: only currently
    /// visible rows are considered. Returns the new visible row count.
    pub fn filter_self(&mut self, mut keep: impl FnMut(&Self, usize) -> bool) -> usize {
        let kept: Vec<usize> = (0..self.count())
            .filter(|&row| keep(self, row))
            .filter_map(|row| self.raw_index(row))
            .collect();
        let n = kept.len();
        self.indices = Some(kept);
        n
    }

    /// Makes every raw row visible again.
    pub fn reset_filter(&mut self) {
        self.indices = None;
    }

    /// Returns the calculation info.
    pub fn calculation_info(&self) -> &CalculationInfo {
        &self.calculation_info
    }

    /// Returns the calculation info for update.
    pub fn calculation_info_mut(&mut self) -> &mut CalculationInfo {
        &mut self.calculation_info
    }

    /// Returns a copy of a dimension over the visible rows.
    pub fn column(&self, col: ColId) -> Vec<f64> {
        (0..self.count()).map(|row| self.get(col, row)).collect()
    }
}

fn build_index(column: &[f64]) -> HashMap<u64, usize> {
    let mut index = HashMap::with_capacity(column.len());
    for (raw, &v) in column.iter().enumerate() {
        if let Some(key) = index_key(v) {
            index.entry(key).or_insert(raw);
        }
    }
    index
}

/// Normalized hash key for inverted lookups.
fn index_key(v: f64) -> Option<u64> {
    if v.is_nan() {
        None
    } else if v == 0.0 {
        Some(0.0_f64.to_bits())
    } else {
        Some(v.to_bits())
    }
}
