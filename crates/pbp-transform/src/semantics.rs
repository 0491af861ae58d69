//! Event semantics: canonical vocabulary, derived clock fields, strength
//! state, and structural row filtering over a schema-aligned frame.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::{debug, warn};

use pbp_common::{f32_column, i32_column, parse_i64, string_column};
use pbp_model::{
    Event, EventType, GameId, GameTeams, IssueKind, Participant, PlayerId, RawParticipants,
    ReconcileIssue, ReconcileOptions, RinkSide, SeasonType, TeamId, Zone,
};

use crate::clock::{derive_clock, parse_clock};
use crate::situation::{forward_fill_codes, parse_situation_code};

/// Canonical secondary (shot) type labels. Unknown tokens pass through.
pub fn map_shot_type(token: &str) -> String {
    match token {
        "snap" => "Snap",
        "between-legs" => "Between Legs",
        "wrap-around" | "cradle" => "Wrap-Around",
        "tip-in" => "Tip-In",
        "poke" => "Poked",
        "bat" => "Batted",
        "deflected" => "Deflected",
        "wrist" => "Wrist",
        "slap" => "Slap",
        "backhand" => "Backhand",
        other => other,
    }
    .to_string()
}

/// Row counts for one mapping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemanticsStats {
    pub input_rows: usize,
    pub shootout_rows: usize,
    pub out_of_season_rows: usize,
    pub missing_key_rows: usize,
    pub malformed_clock_rows: usize,
    pub degenerate_situation_rows: usize,
    pub forward_filled_codes: usize,
}

#[derive(Debug, Clone)]
pub struct MappedEvents {
    /// Events ordered by `(game, period, event index)`.
    pub events: Vec<Event>,
    pub issues: Vec<ReconcileIssue>,
    pub stats: SemanticsStats,
}

fn parse_player(value: Option<&String>) -> Option<PlayerId> {
    value.and_then(|raw| parse_i64(raw)).map(PlayerId::new)
}

fn parse_team(value: Option<&String>) -> Option<TeamId> {
    value.and_then(|raw| parse_i64(raw)).map(TeamId::new)
}

fn round_score(value: Option<f32>) -> Option<i32> {
    value
        .filter(|score| score.is_finite())
        .map(|score| score.round() as i32)
}

/// Raw participant id columns, in schema order.
struct ParticipantColumns {
    winning: Vec<Option<String>>,
    losing: Vec<Option<String>>,
    hitting: Vec<Option<String>>,
    hittee: Vec<Option<String>>,
    scoring: Vec<Option<String>>,
    shooting: Vec<Option<String>>,
    goalie_in_net: Vec<Option<String>>,
    blocking: Vec<Option<String>>,
    committed_by: Vec<Option<String>>,
    drawn_by: Vec<Option<String>>,
    served_by: Vec<Option<String>>,
    assist_1: Vec<Option<String>>,
    assist_2: Vec<Option<String>>,
    player: Vec<Option<String>>,
}

impl ParticipantColumns {
    fn read(df: &DataFrame) -> Self {
        Self {
            winning: string_column(df, "winningPlayerId"),
            losing: string_column(df, "losingPlayerId"),
            hitting: string_column(df, "hittingPlayerId"),
            hittee: string_column(df, "hitteePlayerId"),
            scoring: string_column(df, "scoringPlayerId"),
            shooting: string_column(df, "shootingPlayerId"),
            goalie_in_net: string_column(df, "goalieInNetId"),
            blocking: string_column(df, "blockingPlayerId"),
            committed_by: string_column(df, "committedByPlayerId"),
            drawn_by: string_column(df, "drawnByPlayerId"),
            served_by: string_column(df, "servedByPlayerId"),
            assist_1: string_column(df, "assist1PlayerId"),
            assist_2: string_column(df, "assist2PlayerId"),
            player: string_column(df, "playerId"),
        }
    }

    fn row(&self, idx: usize) -> RawParticipants {
        RawParticipants {
            winning: parse_player(self.winning[idx].as_ref()),
            losing: parse_player(self.losing[idx].as_ref()),
            hitting: parse_player(self.hitting[idx].as_ref()),
            hittee: parse_player(self.hittee[idx].as_ref()),
            scoring: parse_player(self.scoring[idx].as_ref()),
            shooting: parse_player(self.shooting[idx].as_ref()),
            goalie_in_net: parse_player(self.goalie_in_net[idx].as_ref()),
            blocking: parse_player(self.blocking[idx].as_ref()),
            committed_by: parse_player(self.committed_by[idx].as_ref()),
            drawn_by: parse_player(self.drawn_by[idx].as_ref()),
            served_by: parse_player(self.served_by[idx].as_ref()),
            assist_1: parse_player(self.assist_1[idx].as_ref()),
            assist_2: parse_player(self.assist_2[idx].as_ref()),
            player: parse_player(self.player[idx].as_ref()),
        }
    }
}

/// Map a schema-aligned frame into typed, canonical events.
///
/// Shootout rows, rows outside the regular season and playoffs, rows with an
/// unparseable clock and rows carrying a degenerate situation code are
/// dropped. Participant slots and normalized coordinates are left empty for
/// the later stages.
pub fn map_events(df: &DataFrame, options: &ReconcileOptions) -> Result<MappedEvents> {
    let height = df.height();
    let game_ids = i32_column(df, "id");
    let seasons = i32_column(df, "season");
    let game_dates = string_column(df, "gameDate");
    let game_types = i32_column(df, "gameType");
    let periods = i32_column(df, "period");
    let period_types = string_column(df, "periodType");
    let clocks = string_column(df, "timeInPeriod");
    let situation_codes = string_column(df, "situationCode");
    let defending_sides = string_column(df, "homeTeamDefendingSide");
    let event_teams = string_column(df, "eventOwnerTeamId");
    let away_ids = string_column(df, "awayTeam.id");
    let away_abbrevs = string_column(df, "awayTeam.abbrev");
    let home_ids = string_column(df, "homeTeam.id");
    let home_abbrevs = string_column(df, "homeTeam.abbrev");
    let away_scores = f32_column(df, "awayScore");
    let home_scores = f32_column(df, "homeScore");
    let event_ids = i32_column(df, "eventId");
    let sort_orders = i32_column(df, "sortOrder");
    let type_keys = string_column(df, "typeDescKey");
    let reasons = string_column(df, "reason");
    let shot_types = string_column(df, "shotType");
    let zones = string_column(df, "zoneCode");
    let xs = f32_column(df, "xCoord");
    let ys = f32_column(df, "yCoord");
    let durations = string_column(df, "duration");
    let participants = ParticipantColumns::read(df);

    let mut stats = SemanticsStats {
        input_rows: height,
        ..SemanticsStats::default()
    };
    let mut issues = Vec::new();
    let mut events = Vec::with_capacity(height);

    for idx in 0..height {
        if period_types[idx].as_deref() == Some("SO") {
            stats.shootout_rows += 1;
            continue;
        }
        let Some(season_type) = game_types[idx]
            .map(i64::from)
            .and_then(SeasonType::from_game_type)
        else {
            stats.out_of_season_rows += 1;
            continue;
        };
        let (Some(game_id), Some(period), Some(event_idx)) =
            (game_ids[idx], periods[idx], sort_orders[idx])
        else {
            stats.missing_key_rows += 1;
            debug!(row = idx, "dropping row without game id, period or sort order");
            continue;
        };

        let raw_clock = clocks[idx].as_deref().unwrap_or("");
        let period_seconds = match parse_clock(raw_clock) {
            Ok(seconds) => seconds,
            Err(err) => {
                stats.malformed_clock_rows += 1;
                warn!(game_id, period, event_idx, value = raw_clock, "malformed clock, dropping row");
                issues.push(
                    ReconcileIssue::new(IssueKind::MalformedDuration, err.to_string())
                        .with_field("timeInPeriod")
                        .with_event_idx(event_idx),
                );
                continue;
            }
        };

        let teams = GameTeams {
            home_id: parse_team(home_ids[idx].as_ref()),
            home_abbrev: home_abbrevs[idx].clone(),
            away_id: parse_team(away_ids[idx].as_ref()),
            away_abbrev: away_abbrevs[idx].clone(),
        };
        let event_team_id = parse_team(event_teams[idx].as_ref());
        let event_team_side = event_team_id.and_then(|team| teams.side_of(team));

        events.push(Event {
            game_id: GameId::new(i64::from(game_id)),
            season: seasons[idx],
            game_date: game_dates[idx].clone(),
            season_type,
            teams,
            period,
            period_type: period_types[idx].clone(),
            clock: derive_clock(period, period_seconds, season_type, options),
            event_idx,
            event_id: event_ids[idx],
            event_type: EventType::from_token(type_keys[idx].as_deref().unwrap_or("")),
            secondary_type: shot_types[idx].as_deref().map(map_shot_type),
            reason: reasons[idx].clone(),
            event_team_id,
            event_team_side,
            zone: zones[idx]
                .as_deref()
                .and_then(|code| code.parse::<Zone>().ok()),
            home_defending_side: defending_sides[idx]
                .as_deref()
                .and_then(|side| side.parse::<RinkSide>().ok()),
            raw_x: xs[idx],
            raw_y: ys[idx],
            coordinates: None,
            situation_code: situation_codes[idx].clone(),
            situation: None,
            home_score: round_score(home_scores[idx]),
            away_score: round_score(away_scores[idx]),
            penalty_minutes: durations[idx]
                .as_deref()
                .and_then(parse_i64)
                .and_then(|minutes| i32::try_from(minutes).ok()),
            raw_participants: participants.row(idx),
            participants: [Participant::EMPTY; 4],
        });
    }

    events.sort_by_key(|event| (event.game_id, event.period, event.event_idx));

    let games: Vec<GameId> = events.iter().map(|event| event.game_id).collect();
    let mut codes: Vec<Option<String>> = events
        .iter_mut()
        .map(|event| event.situation_code.take())
        .collect();
    stats.forward_filled_codes = forward_fill_codes(&games, &mut codes);

    let mut kept = Vec::with_capacity(events.len());
    for (mut event, code) in events.into_iter().zip(codes) {
        if let Some(code) = code.as_deref()
            && options.is_degenerate_situation(code)
        {
            stats.degenerate_situation_rows += 1;
            continue;
        }
        event.situation = code.as_deref().and_then(parse_situation_code);
        if event.situation.is_none()
            && let Some(code) = code.as_deref()
        {
            debug!(event_idx = event.event_idx, code, "unparseable situation code");
        }
        event.situation_code = code;
        kept.push(event);
    }

    debug!(
        input = stats.input_rows,
        kept = kept.len(),
        shootout = stats.shootout_rows,
        out_of_season = stats.out_of_season_rows,
        malformed_clock = stats.malformed_clock_rows,
        degenerate = stats.degenerate_situation_rows,
        "mapped event semantics"
    );

    Ok(MappedEvents {
        events: kept,
        issues,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_types_map_and_pass_through() {
        assert_eq!(map_shot_type("cradle"), "Wrap-Around");
        assert_eq!(map_shot_type("between-legs"), "Between Legs");
        assert_eq!(map_shot_type("spinorama"), "spinorama");
    }

    #[test]
    fn scores_round_to_integers() {
        assert_eq!(round_score(Some(2.0)), Some(2));
        assert_eq!(round_score(Some(f32::NAN)), None);
        assert_eq!(round_score(None), None);
    }
}
