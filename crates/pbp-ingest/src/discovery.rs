//! Discovery of downloaded game payloads in a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

pub const PLAY_BY_PLAY_SUFFIX: &str = ".pbp.json";
pub const SHIFT_CHART_SUFFIX: &str = ".shifts.json";

/// The payload files for one game, keyed by the shared file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFiles {
    /// File name without the payload suffix (usually the game id).
    pub stem: String,
    pub play_by_play: PathBuf,
    /// Missing shift chart means the game is reconciled without on-ice rosters.
    pub shift_chart: Option<PathBuf>,
}

/// Pairs `<stem>.pbp.json` with `<stem>.shifts.json` files in a directory.
///
/// Returns games sorted by stem. Shift charts without a play-by-play file are
/// ignored.
pub fn discover_games(dir: &Path) -> Result<Vec<GameFiles>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut play_by_play: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut shifts: BTreeMap<String, PathBuf> = BTreeMap::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let lowered = name.to_ascii_lowercase();
        if lowered.ends_with(PLAY_BY_PLAY_SUFFIX) {
            let stem = name[..name.len() - PLAY_BY_PLAY_SUFFIX.len()].to_string();
            play_by_play.insert(stem, path);
        } else if lowered.ends_with(SHIFT_CHART_SUFFIX) {
            let stem = name[..name.len() - SHIFT_CHART_SUFFIX.len()].to_string();
            shifts.insert(stem, path);
        }
    }

    Ok(play_by_play
        .into_iter()
        .map(|(stem, path)| GameFiles {
            shift_chart: shifts.remove(&stem),
            stem,
            play_by_play: path,
        })
        .collect())
}
