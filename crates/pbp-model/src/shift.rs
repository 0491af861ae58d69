//! Shift records.

use serde::{Deserialize, Serialize};

use crate::enums::{PositionClass, TeamSide};
use crate::ids::{GameId, PlayerId, TeamId};

/// One row of an upstream shift chart, before any parsing.
///
/// Unknown keys in the payload are ignored; every field is optional because
/// upstream emits goal markers and placeholder rows through the same list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawShift {
    pub game_id: Option<GameId>,
    pub player_id: Option<PlayerId>,
    pub team_id: Option<TeamId>,
    pub team_abbrev: Option<String>,
    pub period: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RawShift {
    /// `"FIRST LAST"` upper-cased, when both halves are known.
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.trim().is_empty() && !last.trim().is_empty() => {
                Some(format!("{} {}", first.trim(), last.trim()).to_uppercase())
            }
            _ => None,
        }
    }
}

/// One continuous on-ice presence for one player in one period.
///
/// Invariant: `period_start < period_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftInterval {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub side: TeamSide,
    pub player_id: PlayerId,
    pub position: PositionClass,
    pub period: i32,
    pub period_start: i32,
    pub period_end: i32,
    pub game_start: i32,
    pub game_end: i32,
}

impl ShiftInterval {
    pub fn duration(&self) -> i32 {
        self.period_end - self.period_start
    }

    /// Strict containment: `start < second < end`.
    pub fn contains(&self, second: i32) -> bool {
        self.period_start < second && second < self.period_end
    }
}
