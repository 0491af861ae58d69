//! Flattening of a nested play-by-play payload into one raw row per play.
//!
//! Game-level fields are broadcast onto every play, `periodDescriptor` and
//! `details` are unnested, and the detail map is restricted to the known
//! detail keys. Expected upstream keys the event table has no use for are
//! skipped quietly; anything else in `details` is reported, not kept.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use polars::prelude::{Column, DataFrame};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use pbp_model::GameId;

use crate::error::{IngestError, Result};
use crate::frame::json_column;

/// Detail keys carried into the raw frame. `typeCode` here is the penalty
/// type and is renamed to `penaltyTypeCode` on flattening.
pub const KNOWN_DETAIL_KEYS: [&str; 26] = [
    "descKey",
    "reason",
    "secondaryReason",
    "shotType",
    "xCoord",
    "yCoord",
    "zoneCode",
    "homeScore",
    "awayScore",
    "eventOwnerTeamId",
    "goalieInNetId",
    "scoringPlayerId",
    "assist1PlayerId",
    "assist2PlayerId",
    "shootingPlayerId",
    "blockingPlayerId",
    "winningPlayerId",
    "losingPlayerId",
    "hittingPlayerId",
    "hitteePlayerId",
    "playerId",
    "typeCode",
    "committedByPlayerId",
    "drawnByPlayerId",
    "servedByPlayerId",
    "duration",
];

/// Detail keys that are part of the upstream payload but not carried:
/// running totals the event table does not use.
pub const IGNORED_DETAIL_KEYS: [&str; 5] = [
    "homeSOG",
    "awaySOG",
    "scoringPlayerTotal",
    "assist1PlayerTotal",
    "assist2PlayerTotal",
];

/// Play-level and `periodDescriptor` keys that are expected but not carried.
pub const IGNORED_PLAY_KEYS: [&str; 3] =
    ["pptReplayUrl", "maxRegulationPeriods", "otherPeriodType"];

const PAYLOAD: &str = "play-by-play";

/// One game's plays as a raw, loosely-typed frame.
#[derive(Debug, Clone)]
pub struct RawGame {
    pub game_id: GameId,
    pub frame: DataFrame,
    /// Detail keys seen in this game that are neither in [`KNOWN_DETAIL_KEYS`]
    /// nor in [`IGNORED_DETAIL_KEYS`].
    pub unknown_detail_keys: BTreeSet<String>,
}

/// Column-ordered row accumulator. Columns appear in first-seen order and rows
/// that lack a column read as null.
#[derive(Default)]
struct RowSink {
    names: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<Value>>,
    rows: usize,
}

impl RowSink {
    fn push_row(&mut self, row: Vec<(String, Value)>) {
        for (name, value) in row {
            let slot = match self.index.get(&name) {
                Some(&slot) => slot,
                None => {
                    let slot = self.names.len();
                    self.index.insert(name.clone(), slot);
                    self.names.push(name);
                    self.values.push(vec![Value::Null; self.rows]);
                    slot
                }
            };
            let column = &mut self.values[slot];
            // A key repeated within one row keeps its last value.
            if column.len() > self.rows {
                column[self.rows] = value;
            } else {
                column.push(value);
            }
        }
        self.rows += 1;
        for column in &mut self.values {
            column.resize(self.rows, Value::Null);
        }
    }

    fn into_frame(self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .names
            .iter()
            .zip(self.values.iter())
            .map(|(name, values)| json_column(name, values))
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

/// Localised names arrive as `{"default": "..."}`; unwrap them to the scalar.
fn scalar(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Object(map)) => map.get("default").cloned().unwrap_or(Value::Null),
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

fn game_fields(payload: &Map<String, Value>) -> Vec<(String, Value)> {
    let team = |side: &str, field: &str| {
        scalar(
            payload
                .get(side)
                .and_then(Value::as_object)
                .and_then(|team| team.get(field)),
        )
    };
    vec![
        ("id".to_string(), scalar(payload.get("id"))),
        ("season".to_string(), scalar(payload.get("season"))),
        ("gameDate".to_string(), scalar(payload.get("gameDate"))),
        ("gameType".to_string(), scalar(payload.get("gameType"))),
        ("awayTeam.id".to_string(), team("awayTeam", "id")),
        ("awayTeam.abbrev".to_string(), team("awayTeam", "abbrev")),
        ("homeTeam.id".to_string(), team("homeTeam", "id")),
        ("homeTeam.abbrev".to_string(), team("homeTeam", "abbrev")),
    ]
}

/// Flatten nested objects with dotted names, the way a JSON normaliser would.
fn flatten_into(prefix: &str, value: &Value, row: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{prefix}.{key}"), nested, row);
            }
        }
        other => row.push((prefix.to_string(), other.clone())),
    }
}

fn flatten_play(
    play: &Map<String, Value>,
    game: &[(String, Value)],
    unknown_detail_keys: &mut BTreeSet<String>,
) -> Vec<(String, Value)> {
    let mut row: Vec<(String, Value)> = game.to_vec();

    for (key, value) in play {
        match key.as_str() {
            "details" | "periodDescriptor" => {}
            ignored if IGNORED_PLAY_KEYS.contains(&ignored) => {}
            _ => flatten_into(key, value, &mut row),
        }
    }

    if let Some(descriptor) = play.get("periodDescriptor").and_then(Value::as_object) {
        for (key, value) in descriptor {
            if IGNORED_PLAY_KEYS.contains(&key.as_str()) {
                continue;
            }
            let name = if key == "number" { "period" } else { key.as_str() };
            row.push((name.to_string(), value.clone()));
        }
    }

    let details = play.get("details").and_then(Value::as_object);
    for key in KNOWN_DETAIL_KEYS {
        let value = details
            .and_then(|details| details.get(key))
            .cloned()
            .unwrap_or(Value::Null);
        let name = if key == "typeCode" {
            "penaltyTypeCode"
        } else {
            key
        };
        row.push((name.to_string(), value));
    }
    if let Some(details) = details {
        for key in details.keys() {
            let key_str = key.as_str();
            if !KNOWN_DETAIL_KEYS.contains(&key_str) && !IGNORED_DETAIL_KEYS.contains(&key_str) {
                unknown_detail_keys.insert(key.clone());
            }
        }
    }
    row
}

/// Flatten a decoded play-by-play payload.
pub fn flatten_play_by_play(payload: &Value) -> Result<RawGame> {
    let root = payload
        .as_object()
        .ok_or_else(|| IngestError::InvalidPayload {
            what: PAYLOAD,
            reason: "top level is not an object".to_string(),
        })?;
    let game_id = root
        .get("id")
        .and_then(Value::as_i64)
        .map(GameId::new)
        .ok_or_else(|| IngestError::InvalidPayload {
            what: PAYLOAD,
            reason: "missing integer game id".to_string(),
        })?;

    let game = game_fields(root);
    let plays: &[Value] = match root.get("plays") {
        Some(Value::Array(plays)) => plays.as_slice(),
        Some(Value::Null) | None => &[],
        Some(_) => {
            return Err(IngestError::InvalidPayload {
                what: PAYLOAD,
                reason: "plays is not a list".to_string(),
            });
        }
    };

    let mut sink = RowSink::default();
    let mut unknown_detail_keys = BTreeSet::new();
    for play in plays {
        let Some(play) = play.as_object() else {
            debug!(game_id = %game_id, "skipping non-object play entry");
            continue;
        };
        sink.push_row(flatten_play(play, &game, &mut unknown_detail_keys));
    }

    if !unknown_detail_keys.is_empty() {
        warn!(
            game_id = %game_id,
            keys = ?unknown_detail_keys,
            "extra keys in play details"
        );
    }

    let frame = sink.into_frame()?;
    debug!(game_id = %game_id, rows = frame.height(), columns = frame.width(), "flattened plays");
    Ok(RawGame {
        game_id,
        frame,
        unknown_detail_keys,
    })
}

/// Parse and flatten a play-by-play JSON document.
pub fn parse_play_by_play(json: &str) -> Result<RawGame> {
    let payload: Value = serde_json::from_str(json).map_err(|source| IngestError::Json {
        what: PAYLOAD,
        source,
    })?;
    flatten_play_by_play(&payload)
}

/// Read a play-by-play JSON file from disk.
pub fn read_play_by_play(path: &Path) -> Result<RawGame> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_play_by_play(&json)
}
