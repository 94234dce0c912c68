// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-series configuration record.

extern crate alloc;

use alloc::string::String;

use crate::{SeriesData, SeriesId};

/// A series as seen by processing stages: identity, stack configuration and its data.
///
/// Stack configuration is kept as plain strings, the way it arrives from chart options. Stages
/// interpret it: an absent or empty `stack` means "no stacking", and strategy strings are parsed
/// by the stacking stage.
#[derive(Clone, Debug)]
pub struct SeriesModel {
    /// Stable series identifier.
    pub id: SeriesId,
    /// Optional display name.
    pub name: Option<String>,
    /// Stack key. Series sharing a non-empty key are stacked together.
    pub stack: Option<String>,
    /// Stack strategy (`"samesign"`, `"all"`, `"positive"`, `"negative"` or `"percent"`).
    pub stack_strategy: Option<String>,
    /// The series' value store.
    pub data: SeriesData,
}

impl SeriesModel {
    /// Creates an unstacked series.
    pub fn new(id: SeriesId, data: SeriesData) -> Self {
        Self {
            id,
            name: None,
            stack: None,
            stack_strategy: None,
            data,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack key.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Sets the stack strategy string.
    pub fn with_stack_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.stack_strategy = Some(strategy.into());
        self
    }

    /// Returns the stack key if stacking is enabled for this series.
    pub fn stack_key(&self) -> Option<&str> {
        self.stack.as_deref().filter(|s| !s.is_empty())
    }
}
