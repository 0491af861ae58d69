//! Shift chart decoding.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use pbp_model::RawShift;

use crate::error::{IngestError, Result};

const PAYLOAD: &str = "shift chart";

/// Upstream wraps the shift list in `{"data": [...], "total": n}`; a bare list
/// is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum ShiftChartPayload {
    Wrapped {
        #[serde(default)]
        data: Vec<RawShift>,
    },
    Bare(Vec<RawShift>),
}

/// Decode a shift chart JSON document into raw shift records.
pub fn parse_shift_chart(json: &str) -> Result<Vec<RawShift>> {
    let payload: ShiftChartPayload =
        serde_json::from_str(json).map_err(|source| IngestError::Json {
            what: PAYLOAD,
            source,
        })?;
    let shifts = match payload {
        ShiftChartPayload::Wrapped { data } => data,
        ShiftChartPayload::Bare(data) => data,
    };
    debug!(records = shifts.len(), "decoded shift chart");
    Ok(shifts)
}

/// Read a shift chart JSON file from disk.
pub fn read_shift_chart(path: &Path) -> Result<Vec<RawShift>> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_shift_chart(&json)
}
