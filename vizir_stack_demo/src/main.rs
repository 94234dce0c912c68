// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `vizir_stack`.
//!
//! Run with `RUST_LOG=trace` to see skipped series and per-group modes.

use env_logger::Env;
use vizir_core::{SeriesData, SeriesDataError, SeriesId, SeriesModel};
use vizir_stack::{data_stack, enable_data_stack, stacked_dimension_for};

fn main() -> Result<(), SeriesDataError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let quarters = vec![0.0, 1.0, 2.0, 3.0];
    let mut series = vec![
        keyed(1, "north", &quarters, vec![12.0, -3.5, 8.25, f64::NAN])?.with_stack("sales"),
        keyed(2, "south", &[3.0, 0.0, 1.0, 2.0], vec![4.0, -1.5, 2.5, 6.0])?
            .with_stack("sales"),
        keyed(3, "east", &quarters, vec![-2.0, 5.0, 0.1, 0.2])?.with_stack("sales"),
        indexed(4, "web", vec![30.0, 45.0, 10.0, 0.0])?
            .with_stack("share")
            .with_stack_strategy("percent"),
        indexed(5, "retail", vec![70.0, 15.0, 30.0, 0.0])?
            .with_stack("share")
            .with_stack_strategy("percent"),
        // Has a stack key but was never prepared for stacking.
        SeriesModel::new(SeriesId(6), SeriesData::from_columns([("y", vec![1.0; 4])])?)
            .with_name("unprepared")
            .with_stack("sales"),
    ];

    data_stack(&mut series);
    log::info!("stacked {} series", series.len());

    for s in &series {
        print_series(s);
    }
    Ok(())
}

fn keyed(
    id: u32,
    name: &str,
    x: &[f64],
    y: Vec<f64>,
) -> Result<SeriesModel, SeriesDataError> {
    let mut data = SeriesData::from_columns([("x", x.to_vec()), ("y", y)])?;
    let x = data.dimension("x").ok_or(SeriesDataError::EmptyDimensions)?;
    let y = data.dimension("y").ok_or(SeriesDataError::EmptyDimensions)?;
    enable_data_stack(&mut data, y, Some(x))?;
    Ok(SeriesModel::new(SeriesId(id), data).with_name(name))
}

fn indexed(id: u32, name: &str, y: Vec<f64>) -> Result<SeriesModel, SeriesDataError> {
    let mut data = SeriesData::from_columns([("y", y)])?;
    let y = data.dimension("y").ok_or(SeriesDataError::EmptyDimensions)?;
    enable_data_stack(&mut data, y, None)?;
    Ok(SeriesModel::new(SeriesId(id), data).with_name(name))
}

fn print_series(s: &SeriesModel) {
    let name = s.name.as_deref().unwrap_or("?");
    let info = s.data.calculation_info();
    let (Some(result), Some(over)) = (info.stack_result_dimension, info.stacked_over_dimension)
    else {
        println!("{name}: not stackable");
        return;
    };
    let stacked_on = info
        .stacked_on_series
        .map_or_else(|| String::from("-"), |id| format!("{}", id.0));
    let value_dim = info
        .stacked_dimension
        .map(|dim| stacked_dimension_for(&s.data, dim));
    println!(
        "{name} (stack {:?}, on {stacked_on}, value dim {value_dim:?})",
        s.stack_key().unwrap_or("")
    );
    for row in 0..s.data.count() {
        println!(
            "  row {row}: result={:>8.3} over={:>8.3}",
            s.data.get(result, row),
            s.data.get(over, row)
        );
    }
}
