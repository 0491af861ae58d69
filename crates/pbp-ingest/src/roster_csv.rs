//! Roster lookup loading from a flat CSV export.
//!
//! Expected columns: `player_id, first_name, last_name, hand_R, hand_L,
//! pos_F, pos_D, pos_G`. Flag columns hold `1`/`0` (or `1.0`/`0.0`).

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use pbp_common::parse_i64;
use pbp_model::{Hand, PlayerId, PositionClass, RosterEntry, RosterLookup};

use crate::error::{IngestError, Result};

const REQUIRED_COLUMNS: [&str; 2] = ["player_id", "pos_G"];

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn flag(value: Option<&str>) -> bool {
    value.and_then(parse_i64) == Some(1)
}

/// `FIRST.LAST`, upper-cased.
fn player_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let first = first.map(str::trim).filter(|s| !s.is_empty());
    let last = last.map(str::trim).filter(|s| !s.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => Some(format!("{first}.{last}").to_uppercase()),
        (Some(only), None) | (None, Some(only)) => Some(only.to_uppercase()),
        (None, None) => None,
    }
}

/// Load a roster CSV into a lookup keyed by player id.
pub fn read_roster_csv(path: &Path) -> Result<RosterLookup> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == required) {
            return Err(IngestError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    let column = |name: &str| headers.iter().position(|header| header == name);
    let player_idx = column("player_id");
    let first_idx = column("first_name");
    let last_idx = column("last_name");
    let hand_r_idx = column("hand_R");
    let hand_l_idx = column("hand_L");
    let goalie_idx = column("pos_G");

    let mut lookup = RosterLookup::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cell = |idx: Option<usize>| idx.and_then(|idx| record.get(idx)).map(str::trim);

        let Some(raw_id) = cell(player_idx).filter(|value| !value.is_empty()) else {
            debug!(path = %path.display(), "skipping roster row without player id");
            continue;
        };
        let player_id = parse_i64(raw_id).map(PlayerId::new).ok_or_else(|| {
            IngestError::InvalidValue {
                field: "player_id".to_string(),
                value: raw_id.to_string(),
                path: path.to_path_buf(),
            }
        })?;

        let position = if flag(cell(goalie_idx)) {
            PositionClass::Goalie
        } else {
            PositionClass::Skater
        };
        let hand = if flag(cell(hand_r_idx)) {
            Some(Hand::Right)
        } else if flag(cell(hand_l_idx)) {
            Some(Hand::Left)
        } else {
            None
        };
        if lookup.get(player_id).is_some() {
            warn!(player_id = %player_id, "duplicate roster row, keeping the last one");
        }
        lookup.insert(RosterEntry {
            player_id,
            name: player_name(cell(first_idx), cell(last_idx)),
            position,
            hand,
        });
    }

    debug!(path = %path.display(), players = lookup.len(), "loaded roster");
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_dotted_and_upper_cased() {
        assert_eq!(
            player_name(Some("Auston"), Some("Matthews")).as_deref(),
            Some("AUSTON.MATTHEWS")
        );
        assert_eq!(player_name(None, Some("Sebastian")).as_deref(), Some("SEBASTIAN"));
        assert_eq!(player_name(Some(" "), None), None);
    }

    #[test]
    fn flags_accept_decimal_ones() {
        assert!(flag(Some("1")));
        assert!(flag(Some("1.0")));
        assert!(!flag(Some("0")));
        assert!(!flag(None));
    }
}
