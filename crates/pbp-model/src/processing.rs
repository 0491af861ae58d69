use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::GameId;
use crate::issues::{GameDiagnostics, IssueKind};

/// A game whose pipeline failed; its output is skipped and the id kept for retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGame {
    pub game_id: GameId,
    pub reason: String,
}

/// Row counts and issue tallies for one reconciled game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: Option<GameId>,
    pub raw_events: usize,
    pub events: usize,
    pub shift_intervals: usize,
    pub schema_drift: usize,
    pub malformed_durations: usize,
    pub unresolved_attributions: usize,
    pub ambiguous_coordinates: usize,
    pub degenerate_shifts: usize,
}

impl GameSummary {
    pub fn from_diagnostics(diagnostics: &GameDiagnostics) -> Self {
        Self {
            game_id: diagnostics.game_id,
            schema_drift: diagnostics.count(IssueKind::SchemaDriftWarning),
            malformed_durations: diagnostics.count(IssueKind::MalformedDuration),
            unresolved_attributions: diagnostics.count(IssueKind::UnresolvedAttribution),
            ambiguous_coordinates: diagnostics.count(IssueKind::AmbiguousCoordinateFrame),
            degenerate_shifts: diagnostics.count(IssueKind::DegenerateShiftInterval),
            ..Self::default()
        }
    }
}

/// Outcome of a multi-game batch.
///
/// Every failure is a value in `skipped`; one game's failure never affects
/// another game's entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport<T> {
    pub games: Vec<T>,
    pub skipped: Vec<SkippedGame>,
    pub completed_at: DateTime<Utc>,
}

impl<T> BatchReport<T> {
    pub fn new(games: Vec<T>, skipped: Vec<SkippedGame>) -> Self {
        Self {
            games,
            skipped,
            completed_at: Utc::now(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.games.len()
    }

    pub fn failed(&self) -> usize {
        self.skipped.len()
    }

    pub fn skipped_ids(&self) -> Vec<GameId> {
        self.skipped.iter().map(|skip| skip.game_id).collect()
    }
}
