//! Per-game reconciliation.
//!
//! The event stages (align, map, order check, attribute, normalize) and the
//! shift index build share no data, so they run on both halves of a
//! `rayon::join`. The on-ice join waits for both.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use pbp_common::{parse_i64, string_column};
use pbp_ingest::RawGame;
use pbp_model::{
    Event, GameDiagnostics, GameId, GameSummary, GameTeams, IssueKind, RawShift,
    ReconcileIssue, ReconcileOptions, RosterLookup, TeamId,
};
use pbp_transform::{align_and_cast, map_events, raw_event_schema};

use crate::frame_builder::build_event_frame;
use crate::on_ice::{TimelineEvent, join_on_ice};
use crate::pipeline::{PipelineState, build_default_pipeline};
use crate::shift_index::ShiftIndex;

/// Raw inputs for one game.
#[derive(Debug, Clone)]
pub struct GameInput {
    pub game_id: GameId,
    /// Flattened plays, one row per play.
    pub events: DataFrame,
    pub unknown_detail_keys: BTreeSet<String>,
    pub shifts: Vec<RawShift>,
}

impl GameInput {
    pub fn new(raw: RawGame, shifts: Vec<RawShift>) -> Self {
        Self {
            game_id: raw.game_id,
            events: raw.frame,
            unknown_detail_keys: raw.unknown_detail_keys,
            shifts,
        }
    }
}

/// Everything produced for one reconciled game.
#[derive(Debug, Clone)]
pub struct GameOutput {
    pub game_id: GameId,
    pub timeline: Vec<TimelineEvent>,
    pub frame: DataFrame,
    pub diagnostics: GameDiagnostics,
    pub summary: GameSummary,
}

/// Home and away team identity from the broadcast game columns.
///
/// Every row carries the same values; the first row with a home or away id
/// wins.
pub fn game_teams(frame: &DataFrame) -> GameTeams {
    let home_ids = string_column(frame, "homeTeam.id");
    let home_abbrevs = string_column(frame, "homeTeam.abbrev");
    let away_ids = string_column(frame, "awayTeam.id");
    let away_abbrevs = string_column(frame, "awayTeam.abbrev");
    let team = |value: &Option<String>| value.as_deref().and_then(parse_i64).map(TeamId::new);

    (0..frame.height())
        .find(|&idx| home_ids[idx].is_some() || away_ids[idx].is_some())
        .map(|idx| GameTeams {
            home_id: team(&home_ids[idx]),
            home_abbrev: home_abbrevs[idx].clone(),
            away_id: team(&away_ids[idx]),
            away_abbrev: away_abbrevs[idx].clone(),
        })
        .unwrap_or_default()
}

struct EventStages {
    events: Vec<Event>,
    issues: Vec<ReconcileIssue>,
}

fn run_event_stages(input: &GameInput, options: &ReconcileOptions) -> Result<EventStages> {
    let mut issues: Vec<ReconcileIssue> = input
        .unknown_detail_keys
        .iter()
        .map(|key| {
            ReconcileIssue::new(
                IssueKind::SchemaDriftWarning,
                format!("unknown detail key {key}"),
            )
            .with_field(key.clone())
        })
        .collect();

    let aligned = align_and_cast(&input.events, &raw_event_schema())
        .with_context(|| format!("align game {}", input.game_id))?;
    issues.extend(aligned.drift_issues());

    let mapped = map_events(&aligned.frame, options)
        .with_context(|| format!("map events for game {}", input.game_id))?;
    issues.extend(mapped.issues);

    let mut state = PipelineState::new();
    let events = build_default_pipeline()
        .execute_with_state(&mapped.events, options, &mut state)
        .with_context(|| format!("event pipeline for game {}", input.game_id))?;
    issues.extend(state.issues);
    debug!(steps = ?state.executed_steps, events = events.len(), "event stages complete");

    Ok(EventStages { events, issues })
}

/// Reconcile one game: normalize its events, index its shifts, and join.
///
/// Data-quality problems are collected into the output's diagnostics. An
/// `Err` means the whole game must be skipped.
pub fn process_game(
    input: &GameInput,
    roster: &RosterLookup,
    options: &ReconcileOptions,
) -> Result<GameOutput> {
    // Not entered across the join: a blocked worker may steal another game's
    // task, which must not inherit this game's span.
    let game_span = info_span!("game", game_id = %input.game_id);

    let teams = game_teams(&input.events);
    let (stages, (index, shift_issues)) = rayon::join(
        || info_span!(parent: &game_span, "events").in_scope(|| run_event_stages(input, options)),
        || {
            info_span!(parent: &game_span, "shifts").in_scope(|| {
                ShiftIndex::build(&input.shifts, input.game_id, &teams, roster, options)
            })
        },
    );

    game_span.in_scope(|| join_game(input, stages?, &index, shift_issues, options))
}

fn join_game(
    input: &GameInput,
    stages: EventStages,
    index: &ShiftIndex,
    shift_issues: Vec<ReconcileIssue>,
    options: &ReconcileOptions,
) -> Result<GameOutput> {
    let timeline = join_on_ice(&stages.events, index);
    let frame = build_event_frame(&timeline, options)
        .with_context(|| format!("build output frame for game {}", input.game_id))?;

    let mut diagnostics = GameDiagnostics::new(input.game_id);
    diagnostics.extend(stages.issues);
    diagnostics.extend(shift_issues);

    let summary = GameSummary {
        raw_events: input.events.height(),
        events: timeline.len(),
        shift_intervals: index.len(),
        ..GameSummary::from_diagnostics(&diagnostics)
    };

    if summary.schema_drift > 0 {
        warn!(fields = summary.schema_drift, "schema drift in raw plays");
    }
    info!(
        raw_events = summary.raw_events,
        events = summary.events,
        shift_intervals = summary.shift_intervals,
        issues = diagnostics.issues.len(),
        "game reconciled"
    );

    Ok(GameOutput {
        game_id: input.game_id,
        timeline,
        frame,
        diagnostics,
        summary,
    })
}
