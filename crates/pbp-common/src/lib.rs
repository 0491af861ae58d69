//! Shared utilities for the play-by-play crates.
//!
//! This crate provides Polars `AnyValue` conversions and typed column
//! extraction used by both the ingest and transform stages.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_opt, f32_column, format_numeric,
    i32_column, parse_f64, parse_i64, string_column,
};
