//! Type-safe enumerations for play-by-play concepts.
//!
//! Upstream payloads represent all of these as loose strings or integer codes;
//! parsing happens once at the edge and everything downstream matches on these.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical event type.
///
/// The taxonomy is open: upstream tokens that do not map to a canonical value
/// are kept verbatim in [`EventType::Other`] so new upstream event kinds flow
/// through instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Faceoff,
    Shot,
    BlockedShot,
    MissedShot,
    Goal,
    Hit,
    Giveaway,
    Takeaway,
    Penalty,
    Stoppage,
    PeriodStart,
    PeriodEnd,
    DelayedPenalty,
    GameEnd,
    ShootoutComplete,
    FailedShot,
    /// Unknown upstream token, passed through unchanged.
    Other(String),
}

impl EventType {
    /// Every canonical (non-`Other`) event type.
    pub const CANONICAL: [EventType; 16] = [
        EventType::Faceoff,
        EventType::Shot,
        EventType::BlockedShot,
        EventType::MissedShot,
        EventType::Goal,
        EventType::Hit,
        EventType::Giveaway,
        EventType::Takeaway,
        EventType::Penalty,
        EventType::Stoppage,
        EventType::PeriodStart,
        EventType::PeriodEnd,
        EventType::DelayedPenalty,
        EventType::GameEnd,
        EventType::ShootoutComplete,
        EventType::FailedShot,
    ];

    /// Map a raw upstream token (`"shot-on-goal"`) to its canonical value.
    ///
    /// Canonical names (`"SHOT"`) are accepted as well so already-mapped
    /// tables can be fed back through.
    pub fn from_token(token: &str) -> Self {
        let trimmed = token.trim();
        let canonical = match trimmed {
            "faceoff" => Some(EventType::Faceoff),
            "shot-on-goal" => Some(EventType::Shot),
            "blocked-shot" => Some(EventType::BlockedShot),
            "missed-shot" => Some(EventType::MissedShot),
            "goal" => Some(EventType::Goal),
            "hit" => Some(EventType::Hit),
            "giveaway" => Some(EventType::Giveaway),
            "takeaway" => Some(EventType::Takeaway),
            "penalty" => Some(EventType::Penalty),
            "stoppage" => Some(EventType::Stoppage),
            "period-start" => Some(EventType::PeriodStart),
            "period-end" => Some(EventType::PeriodEnd),
            "delayed-penalty" => Some(EventType::DelayedPenalty),
            "game-end" => Some(EventType::GameEnd),
            "shootout-complete" => Some(EventType::ShootoutComplete),
            "failed-shot-attempt" => Some(EventType::FailedShot),
            other => Self::CANONICAL
                .iter()
                .find(|candidate| candidate.as_str() == other)
                .cloned(),
        };
        canonical.unwrap_or_else(|| EventType::Other(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Faceoff => "FACEOFF",
            EventType::Shot => "SHOT",
            EventType::BlockedShot => "BLOCKED_SHOT",
            EventType::MissedShot => "MISSED_SHOT",
            EventType::Goal => "GOAL",
            EventType::Hit => "HIT",
            EventType::Giveaway => "GIVEAWAY",
            EventType::Takeaway => "TAKEAWAY",
            EventType::Penalty => "PENALTY",
            EventType::Stoppage => "STOPPAGE",
            EventType::PeriodStart => "PERIOD_START",
            EventType::PeriodEnd => "PERIOD_END",
            EventType::DelayedPenalty => "DELAYED_PENALTY",
            EventType::GameEnd => "GAME_END",
            EventType::ShootoutComplete => "SHOOTOUT_COMPLETE",
            EventType::FailedShot => "FAILED_SHOT",
            EventType::Other(token) => token,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }

    /// Period and game boundary markers. These never carry an on-ice roster.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            EventType::PeriodStart
                | EventType::PeriodEnd
                | EventType::GameEnd
                | EventType::ShootoutComplete
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season type derived from the upstream game type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonType {
    Regular,
    Playoff,
}

impl SeasonType {
    /// Game type 2 is regular season, 3 is playoffs. Everything else
    /// (preseason, all-star) is outside the reconciled set.
    pub fn from_game_type(code: i64) -> Option<Self> {
        match code {
            2 => Some(SeasonType::Regular),
            3 => Some(SeasonType::Playoff),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SeasonType::Regular => "R",
            SeasonType::Playoff => "P",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of the rink (as drawn by the source) a team defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RinkSide {
    Left,
    Right,
}

impl FromStr for RinkSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(RinkSide::Left),
            "right" => Ok(RinkSide::Right),
            other => Err(format!("unknown rink side: {other}")),
        }
    }
}

/// Zone relative to the event-owning team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Offensive,
    Defensive,
    Neutral,
}

impl Zone {
    pub fn code(&self) -> &'static str {
        match self {
            Zone::Offensive => "O",
            Zone::Defensive => "D",
            Zone::Neutral => "N",
        }
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "O" => Ok(Zone::Offensive),
            "D" => Ok(Zone::Defensive),
            "N" => Ok(Zone::Neutral),
            other => Err(format!("unknown zone code: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionClass {
    Skater,
    Goalie,
}

impl PositionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionClass::Skater => "skater",
            PositionClass::Goalie => "goalie",
        }
    }
}

/// Shooting (skaters) or catching (goalies) hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

/// Role label attached to a participant slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantRole {
    Winner,
    Loser,
    Hitter,
    Hittee,
    Scorer,
    Goalie,
    EmptyNet,
    Assist,
    Shooter,
    Blocker,
    PenaltyOn,
    DrewBy,
    ServedBy,
    PlayerId,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Winner => "Winner",
            ParticipantRole::Loser => "Loser",
            ParticipantRole::Hitter => "Hitter",
            ParticipantRole::Hittee => "Hittee",
            ParticipantRole::Scorer => "Scorer",
            ParticipantRole::Goalie => "Goalie",
            ParticipantRole::EmptyNet => "EmptyNet",
            ParticipantRole::Assist => "Assist",
            ParticipantRole::Shooter => "Shooter",
            ParticipantRole::Blocker => "Blocker",
            ParticipantRole::PenaltyOn => "PenaltyOn",
            ParticipantRole::DrewBy => "DrewBy",
            ParticipantRole::ServedBy => "ServedBy",
            ParticipantRole::PlayerId => "PlayerID",
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced an event's normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSource {
    /// Home defending side known for the period.
    DefendingSide,
    /// Offensive-zone absolute value.
    OffensiveZone,
    /// Defensive-zone negative absolute value.
    DefensiveZone,
    /// Neutral-zone majority vote over the period's offensive-zone events.
    NeutralMajority,
}

impl CoordinateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSource::DefendingSide => "defending_side",
            CoordinateSource::OffensiveZone => "offensive_zone",
            CoordinateSource::DefensiveZone => "defensive_zone",
            CoordinateSource::NeutralMajority => "neutral_majority",
        }
    }
}
