//! Event records.
//!
//! An [`Event`] is an immutable value: every reconciliation stage takes a set
//! of events and returns a new, derived set.

use serde::{Deserialize, Serialize};

use crate::enums::{
    CoordinateSource, EventType, ParticipantRole, RinkSide, SeasonType, TeamSide, Zone,
};
use crate::ids::{GameId, PlayerId, TeamId};

/// Home and away team identity for a game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameTeams {
    pub home_id: Option<TeamId>,
    pub home_abbrev: Option<String>,
    pub away_id: Option<TeamId>,
    pub away_abbrev: Option<String>,
}

impl GameTeams {
    /// Resolve which side a team id plays for in this game.
    pub fn side_of(&self, team: TeamId) -> Option<TeamSide> {
        if self.home_id == Some(team) {
            Some(TeamSide::Home)
        } else if self.away_id == Some(team) {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn abbrev_of(&self, side: TeamSide) -> Option<&str> {
        match side {
            TeamSide::Home => self.home_abbrev.as_deref(),
            TeamSide::Away => self.away_abbrev.as_deref(),
        }
    }
}

/// Derived clock measures for an event, all in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    pub period_seconds: i32,
    pub period_seconds_remaining: i32,
    pub game_seconds: i32,
    pub game_seconds_remaining: i32,
}

/// Parsed 4-digit situation code: away empty net, away skaters, home skaters,
/// home empty net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    pub away_empty_net: u8,
    pub away_skaters: u8,
    pub home_skaters: u8,
    pub home_empty_net: u8,
}

impl Situation {
    /// Strength state label, home skaters first (`"5v4"`).
    pub fn strength_state(&self) -> String {
        format!("{}v{}", self.home_skaters, self.away_skaters)
    }
}

/// Raw participant identifier fields as they arrive in the event detail map.
///
/// These are inputs to participant attribution only; the finalized table
/// exposes the four role-tagged slots instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawParticipants {
    pub winning: Option<PlayerId>,
    pub losing: Option<PlayerId>,
    pub hitting: Option<PlayerId>,
    pub hittee: Option<PlayerId>,
    pub scoring: Option<PlayerId>,
    pub shooting: Option<PlayerId>,
    pub goalie_in_net: Option<PlayerId>,
    pub blocking: Option<PlayerId>,
    pub committed_by: Option<PlayerId>,
    pub drawn_by: Option<PlayerId>,
    pub served_by: Option<PlayerId>,
    pub assist_1: Option<PlayerId>,
    pub assist_2: Option<PlayerId>,
    pub player: Option<PlayerId>,
}

/// One role-tagged participant slot. Both halves may be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Participant {
    pub id: Option<PlayerId>,
    pub role: Option<ParticipantRole>,
}

impl Participant {
    pub const EMPTY: Participant = Participant {
        id: None,
        role: None,
    };

    pub fn new(id: Option<PlayerId>, role: ParticipantRole) -> Self {
        Self {
            id,
            role: Some(role),
        }
    }
}

/// Coordinates in the attacking frame plus derived shot geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCoordinates {
    pub x: f32,
    pub y: f32,
    pub distance: f32,
    pub angle: f32,
    pub source: CoordinateSource,
}

/// One in-game occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub game_id: GameId,
    pub season: Option<i32>,
    pub game_date: Option<String>,
    pub season_type: SeasonType,
    pub teams: GameTeams,
    pub period: i32,
    pub period_type: Option<String>,
    pub clock: GameClock,
    /// Strictly increasing within `(game, period)`; the ordering tie-break.
    pub event_idx: i32,
    pub event_id: Option<i32>,
    pub event_type: EventType,
    pub secondary_type: Option<String>,
    pub reason: Option<String>,
    pub event_team_id: Option<TeamId>,
    pub event_team_side: Option<TeamSide>,
    pub zone: Option<Zone>,
    pub home_defending_side: Option<RinkSide>,
    pub raw_x: Option<f32>,
    pub raw_y: Option<f32>,
    pub coordinates: Option<NormalizedCoordinates>,
    pub situation_code: Option<String>,
    pub situation: Option<Situation>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub penalty_minutes: Option<i32>,
    pub raw_participants: RawParticipants,
    pub participants: [Participant; 4],
}

impl Event {
    pub fn strength_state(&self) -> Option<String> {
        self.situation.as_ref().map(Situation::strength_state)
    }

    pub fn event_team_abbrev(&self) -> Option<&str> {
        self.event_team_side
            .and_then(|side| self.teams.abbrev_of(side))
    }

    /// Sort key `(game, period, period second, event index)`.
    pub fn timeline_key(&self) -> (GameId, i32, i32, i32) {
        (
            self.game_id,
            self.period,
            self.clock.period_seconds,
            self.event_idx,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_state_is_home_first() {
        let situation = Situation {
            away_empty_net: 1,
            away_skaters: 4,
            home_skaters: 5,
            home_empty_net: 0,
        };
        assert_eq!(situation.strength_state(), "5v4");
    }

    #[test]
    fn team_side_lookup() {
        let teams = GameTeams {
            home_id: Some(TeamId::new(10)),
            home_abbrev: Some("TOR".to_string()),
            away_id: Some(TeamId::new(8)),
            away_abbrev: Some("MTL".to_string()),
        };
        assert_eq!(teams.side_of(TeamId::new(10)), Some(TeamSide::Home));
        assert_eq!(teams.side_of(TeamId::new(8)), Some(TeamSide::Away));
        assert_eq!(teams.side_of(TeamId::new(1)), None);
        assert_eq!(teams.abbrev_of(TeamSide::Away), Some("MTL"));
    }
}
