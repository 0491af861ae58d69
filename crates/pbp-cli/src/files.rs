//! Local file plumbing: options, per-game payload loading, CSV output.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{debug, warn};

use pbp_core::{GameInput, GameOutput};
use pbp_ingest::{GameFiles, read_play_by_play, read_shift_chart};
use pbp_model::{GameId, ReconcileOptions, SkippedGame};

/// Load options from an optional JSON file. Fields absent from the file keep
/// their defaults; `strict` forces `strict_taxonomy` on.
pub fn load_options(path: Option<&Path>, strict: bool) -> Result<ReconcileOptions> {
    let mut options = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str::<ReconcileOptions>(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => ReconcileOptions::default(),
    };
    if strict {
        options.strict_taxonomy = true;
    }
    debug!(?options, "reconciliation options");
    Ok(options)
}

/// Read one game's payloads. A game without a shift chart gets no shifts.
pub fn load_game(files: &GameFiles) -> Result<GameInput> {
    let raw = read_play_by_play(&files.play_by_play)
        .with_context(|| format!("load play-by-play {}", files.play_by_play.display()))?;
    let shifts = match &files.shift_chart {
        Some(path) => {
            read_shift_chart(path).with_context(|| format!("load shifts {}", path.display()))?
        }
        None => {
            warn!(game = %files.stem, "no shift chart, on-ice columns will be empty");
            Vec::new()
        }
    };
    Ok(GameInput::new(raw, shifts))
}

/// `<dir>/<game id>.csv`
pub fn output_path(dir: &Path, game_id: GameId) -> PathBuf {
    dir.join(format!("{game_id}.csv"))
}

/// Write one game's event table as CSV with a header row.
pub fn write_game_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut frame = frame.clone();
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write every game's table into `dir`. A failed write skips that game only;
/// the remaining games are still written.
pub fn write_game_outputs(
    games: &[GameOutput],
    dir: &Path,
    progress: &ProgressBar,
) -> Vec<SkippedGame> {
    let mut skipped = Vec::new();
    for game in games {
        let path = output_path(dir, game.game_id);
        if let Err(error) = write_game_csv(&game.frame, &path) {
            let reason = format!("{error:#}");
            warn!(game_id = %game.game_id, error = %reason, "failed to write game output");
            skipped.push(SkippedGame {
                game_id: game.game_id,
                reason,
            });
        }
        progress.inc(1);
    }
    skipped
}
