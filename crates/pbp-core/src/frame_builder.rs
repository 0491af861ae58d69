//! Finalized per-game event table.
//!
//! One row per reconciled event. On-ice skater slots are padded with nulls up
//! to `max_skaters_per_side`; each id column has a `_name` column beside it.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use pbp_model::{PositionClass, ReconcileOptions, TeamSide};

use crate::on_ice::{OnIcePlayer, TimelineEvent};

/// Ordered column accumulator.
#[derive(Default)]
struct FrameColumns {
    columns: Vec<Column>,
}

impl FrameColumns {
    fn push<T>(&mut self, name: &str, values: Vec<T>)
    where
        Series: NamedFrom<Vec<T>, [T]>,
    {
        self.columns.push(Series::new(name.into(), values).into());
    }

    fn finish(self) -> Result<DataFrame> {
        DataFrame::new(self.columns).context("build event frame")
    }
}

fn map<T>(timeline: &[TimelineEvent], f: impl Fn(&TimelineEvent) -> T) -> Vec<T> {
    timeline.iter().map(f).collect()
}

fn player_at(players: &[OnIcePlayer], slot: usize) -> Option<&OnIcePlayer> {
    players.get(slot)
}

fn push_on_ice(
    columns: &mut FrameColumns,
    timeline: &[TimelineEvent],
    side: TeamSide,
    max_skaters: usize,
) {
    let prefix = side.as_str();
    for slot in 0..max_skaters {
        let n = slot + 1;
        columns.push(
            &format!("{prefix}_{n}_on_id"),
            map(timeline, |row| {
                player_at(row.on_ice.players(side, PositionClass::Skater), slot)
                    .map(|player| player.id.get())
            }),
        );
        columns.push(
            &format!("{prefix}_{n}_on_name"),
            map(timeline, |row| {
                player_at(row.on_ice.players(side, PositionClass::Skater), slot)
                    .and_then(|player| player.name.clone())
            }),
        );
    }
    columns.push(
        &format!("{prefix}_goalie"),
        map(timeline, |row| {
            player_at(row.on_ice.players(side, PositionClass::Goalie), 0)
                .map(|player| player.id.get())
        }),
    );
    columns.push(
        &format!("{prefix}_goalie_name"),
        map(timeline, |row| {
            player_at(row.on_ice.players(side, PositionClass::Goalie), 0)
                .and_then(|player| player.name.clone())
        }),
    );
}

/// Build the finalized event table for one game's timeline.
pub fn build_event_frame(timeline: &[TimelineEvent], options: &ReconcileOptions) -> Result<DataFrame> {
    let max_skaters = options.max_skaters_per_side;
    let overflow = timeline
        .iter()
        .filter(|row| {
            row.on_ice.home_skaters.len() > max_skaters
                || row.on_ice.away_skaters.len() > max_skaters
                || row.on_ice.home_goalies.len() > 1
                || row.on_ice.away_goalies.len() > 1
        })
        .count();
    if overflow > 0 {
        debug!(events = overflow, "on-ice lists longer than the slot count were truncated");
    }

    let mut columns = FrameColumns::default();

    columns.push("game_id", map(timeline, |row| row.event.game_id.get()));
    columns.push("season", map(timeline, |row| row.event.season));
    columns.push("game_date", map(timeline, |row| row.event.game_date.clone()));
    columns.push(
        "season_type",
        map(timeline, |row| row.event.season_type.code().to_string()),
    );
    columns.push("period", map(timeline, |row| row.event.period));
    columns.push("period_type", map(timeline, |row| row.event.period_type.clone()));
    columns.push(
        "period_seconds",
        map(timeline, |row| row.event.clock.period_seconds),
    );
    columns.push(
        "period_seconds_remaining",
        map(timeline, |row| row.event.clock.period_seconds_remaining),
    );
    columns.push("game_seconds", map(timeline, |row| row.event.clock.game_seconds));
    columns.push(
        "game_seconds_remaining",
        map(timeline, |row| row.event.clock.game_seconds_remaining),
    );
    columns.push("event_idx", map(timeline, |row| row.event.event_idx));
    columns.push("event_id", map(timeline, |row| row.event.event_id));
    columns.push(
        "event_type",
        map(timeline, |row| row.event.event_type.as_str().to_string()),
    );
    columns.push(
        "secondary_type",
        map(timeline, |row| row.event.secondary_type.clone()),
    );
    columns.push("reason", map(timeline, |row| row.event.reason.clone()));
    columns.push(
        "event_team_id",
        map(timeline, |row| row.event.event_team_id.map(|team| team.get())),
    );
    columns.push(
        "event_team_abbr",
        map(timeline, |row| row.event.event_team_abbrev().map(str::to_string)),
    );
    columns.push(
        "event_team_type",
        map(timeline, |row| {
            row.event.event_team_side.map(|side| side.as_str().to_string())
        }),
    );
    columns.push(
        "home_id",
        map(timeline, |row| row.event.teams.home_id.map(|team| team.get())),
    );
    columns.push(
        "home_abbreviation",
        map(timeline, |row| row.event.teams.home_abbrev.clone()),
    );
    columns.push(
        "away_id",
        map(timeline, |row| row.event.teams.away_id.map(|team| team.get())),
    );
    columns.push(
        "away_abbreviation",
        map(timeline, |row| row.event.teams.away_abbrev.clone()),
    );
    columns.push("home_score", map(timeline, |row| row.event.home_score));
    columns.push("away_score", map(timeline, |row| row.event.away_score));
    columns.push(
        "penalty_minutes",
        map(timeline, |row| row.event.penalty_minutes),
    );
    columns.push(
        "event_zone",
        map(timeline, |row| row.event.zone.map(|zone| zone.code().to_string())),
    );

    columns.push("x", map(timeline, |row| row.event.raw_x));
    columns.push("y", map(timeline, |row| row.event.raw_y));
    columns.push(
        "x_abs",
        map(timeline, |row| row.event.coordinates.map(|c| c.x)),
    );
    columns.push(
        "y_abs",
        map(timeline, |row| row.event.coordinates.map(|c| c.y)),
    );
    columns.push(
        "event_distance",
        map(timeline, |row| row.event.coordinates.map(|c| c.distance)),
    );
    columns.push(
        "event_angle",
        map(timeline, |row| row.event.coordinates.map(|c| c.angle)),
    );
    columns.push(
        "coordinate_source",
        map(timeline, |row| {
            row.event
                .coordinates
                .map(|c| c.source.as_str().to_string())
        }),
    );

    columns.push(
        "situation_code",
        map(timeline, |row| row.event.situation_code.clone()),
    );
    columns.push(
        "away_en",
        map(timeline, |row| {
            row.event
                .situation
                .map(|s| i32::from(s.away_empty_net))
        }),
    );
    columns.push(
        "away_skaters",
        map(timeline, |row| row.event.situation.map(|s| i32::from(s.away_skaters))),
    );
    columns.push(
        "home_skaters",
        map(timeline, |row| row.event.situation.map(|s| i32::from(s.home_skaters))),
    );
    columns.push(
        "home_en",
        map(timeline, |row| {
            row.event
                .situation
                .map(|s| i32::from(s.home_empty_net))
        }),
    );
    columns.push(
        "strength_state",
        map(timeline, |row| row.event.strength_state()),
    );

    for slot in 0..4 {
        let n = slot + 1;
        columns.push(
            &format!("event_player_{n}_id"),
            map(timeline, |row| row.event.participants[slot].id.map(|id| id.get())),
        );
        columns.push(
            &format!("event_player_{n}_type"),
            map(timeline, |row| {
                row.event.participants[slot]
                    .role
                    .map(|role| role.as_str().to_string())
            }),
        );
    }

    push_on_ice(&mut columns, timeline, TeamSide::Home, max_skaters);
    push_on_ice(&mut columns, timeline, TeamSide::Away, max_skaters);

    columns.finish()
}
