use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use proptest::prelude::*;

use pbp_model::{
    CoordinateSource, Event, EventType, GameClock, GameId, GameTeams, IssueKind, Participant,
    ParticipantRole, PlayerId, RawParticipants, ReconcileOptions, RinkSide, SeasonType, TeamId,
    TeamSide, Zone,
};
use pbp_transform::{
    align_and_cast, attribute, attribute_events, map_events, normalize_coordinates,
    raw_event_schema, FieldType, TargetSchema,
};

fn text(name: &str, values: &[Option<&str>]) -> Column {
    Series::new(name.into(), values.to_vec()).into()
}

fn ints(name: &str, values: &[Option<i64>]) -> Column {
    Series::new(name.into(), values.to_vec()).into()
}

fn floats(name: &str, values: &[Option<f64>]) -> Column {
    Series::new(name.into(), values.to_vec()).into()
}

fn event(side: TeamSide, zone: Option<Zone>, defending: Option<RinkSide>, x: f32, y: f32) -> Event {
    Event {
        game_id: GameId::new(2023020001),
        season: Some(20232024),
        game_date: None,
        season_type: SeasonType::Regular,
        teams: GameTeams {
            home_id: Some(TeamId::new(14)),
            home_abbrev: Some("TBL".to_string()),
            away_id: Some(TeamId::new(18)),
            away_abbrev: Some("NSH".to_string()),
        },
        period: 1,
        period_type: Some("REG".to_string()),
        clock: GameClock {
            period_seconds: 0,
            period_seconds_remaining: 1200,
            game_seconds: 0,
            game_seconds_remaining: 3600,
        },
        event_idx: 1,
        event_id: Some(1),
        event_type: EventType::Shot,
        secondary_type: None,
        reason: None,
        event_team_id: None,
        event_team_side: Some(side),
        zone,
        home_defending_side: defending,
        raw_x: Some(x),
        raw_y: Some(y),
        coordinates: None,
        situation_code: None,
        situation: None,
        home_score: None,
        away_score: None,
        penalty_minutes: None,
        raw_participants: RawParticipants::default(),
        participants: [Participant::EMPTY; 4],
    }
}

fn raw_frame() -> DataFrame {
    DataFrame::new(vec![
        ints("id", &[Some(2023020001); 6]),
        ints("gameType", &[Some(2), Some(2), Some(2), Some(1), Some(2), Some(2)]),
        ints("period", &[Some(1), Some(1), Some(5), Some(1), Some(1), Some(1)]),
        text(
            "periodType",
            &[Some("REG"), Some("REG"), Some("SO"), Some("REG"), Some("REG"), Some("REG")],
        ),
        ints("sortOrder", &[Some(12), Some(10), Some(900), Some(14), Some(16), Some(18)]),
        text(
            "timeInPeriod",
            &[Some("01:05"), Some("00:00"), Some("00:00"), Some("02:00"), Some("2:1x"), Some("03:00")],
        ),
        text(
            "situationCode",
            &[None, Some("1550"), Some("1010"), Some("1551"), Some("1551"), Some("0101")],
        ),
        text(
            "typeDescKey",
            &[Some("goal"), Some("faceoff"), Some("shot-on-goal"), Some("hit"), Some("hit"), Some("hit")],
        ),
        text("homeTeam.id", &[Some("14"); 6]),
        text("awayTeam.id", &[Some("18"); 6]),
        text("homeTeam.abbrev", &[Some("TBL"); 6]),
        text("awayTeam.abbrev", &[Some("NSH"); 6]),
        ints("eventOwnerTeamId", &[Some(18), Some(14), Some(14), Some(14), Some(14), Some(14)]),
        ints("scoringPlayerId", &[Some(100), None, None, None, None, None]),
        ints("assist1PlayerId", &[Some(200), None, None, None, None, None]),
        text("shotType", &[Some("cradle"), None, None, None, None, None]),
        floats("homeScore", &[Some(0.0); 6]),
        floats("awayScore", &[Some(1.0); 6]),
        ints("highlightClip", &[Some(1); 6]),
    ])
    .expect("raw frame")
}

#[test]
fn alignment_fills_drops_and_casts() {
    let schema = raw_event_schema();
    let aligned = align_and_cast(&raw_frame(), &schema).expect("align");
    assert_eq!(aligned.frame.width(), 44);
    assert_eq!(aligned.extra_fields, vec!["highlightClip".to_string()]);
    assert!(aligned.missing_fields.contains(&"xCoord".to_string()));

    let owner = aligned.frame.column("eventOwnerTeamId").unwrap();
    assert_eq!(owner.dtype(), &DataType::String);
    assert_eq!(owner.str().unwrap().get(0), Some("18"));
    let x = aligned.frame.column("xCoord").unwrap();
    assert_eq!(x.dtype(), &DataType::Float32);
    assert_eq!(x.null_count(), 6);

    let drift = aligned.drift_issues();
    assert!(drift
        .iter()
        .all(|issue| issue.kind == IssueKind::SchemaDriftWarning));
    assert!(drift
        .iter()
        .any(|issue| issue.field.as_deref() == Some("highlightClip")));
}

#[test]
fn raw_event_schema_layout() {
    let schema = raw_event_schema();
    insta::assert_snapshot!(schema.field_names().join("\n"));
}

#[test]
fn failed_casts_become_row_nulls() {
    let schema = TargetSchema::new().with_field("period", FieldType::Int32);
    let df = DataFrame::new(vec![text("period", &[Some("2"), Some("OT"), None])]).unwrap();
    let aligned = align_and_cast(&df, &schema).expect("align");
    let period = aligned.frame.column("period").unwrap();
    assert_eq!(period.dtype(), &DataType::Int32);
    assert_eq!(period.i32().unwrap().get(0), Some(2));
    assert_eq!(period.i32().unwrap().get(1), None);
}

#[test]
fn semantics_filter_fill_and_derive() {
    let options = ReconcileOptions::default();
    let aligned = align_and_cast(&raw_frame(), &raw_event_schema()).expect("align");
    let mapped = map_events(&aligned.frame, &options).expect("map");

    assert_eq!(mapped.stats.shootout_rows, 1);
    assert_eq!(mapped.stats.out_of_season_rows, 1);
    assert_eq!(mapped.stats.malformed_clock_rows, 1);
    assert_eq!(mapped.stats.degenerate_situation_rows, 1);
    assert_eq!(
        mapped
            .issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::MalformedDuration)
            .count(),
        1
    );

    // Ordered by event index: faceoff (10) then goal (12).
    let types: Vec<&EventType> = mapped.events.iter().map(|e| &e.event_type).collect();
    assert_eq!(types, vec![&EventType::Faceoff, &EventType::Goal]);

    let faceoff = &mapped.events[0];
    let situation = faceoff.situation.expect("situation");
    assert_eq!(situation.away_empty_net, 1);
    assert_eq!(situation.away_skaters, 5);
    assert_eq!(situation.home_skaters, 5);
    assert_eq!(situation.home_empty_net, 0);
    assert_eq!(faceoff.strength_state().as_deref(), Some("5v5"));
    assert_eq!(faceoff.event_team_side, Some(TeamSide::Home));

    let goal = &mapped.events[1];
    // Missing code carried forward from the faceoff.
    assert_eq!(goal.situation_code.as_deref(), Some("1550"));
    assert_eq!(goal.clock.period_seconds, 65);
    assert_eq!(goal.clock.period_seconds_remaining, 1135);
    assert_eq!(goal.clock.game_seconds_remaining, 3535);
    assert_eq!(goal.event_team_abbrev(), Some("NSH"));
    assert_eq!(goal.secondary_type.as_deref(), Some("Wrap-Around"));
    assert_eq!(goal.away_score, Some(1));
    assert_eq!(goal.raw_participants.scoring, Some(PlayerId::new(100)));
}

#[test]
fn goal_without_goalie_is_empty_net() {
    let raw = RawParticipants {
        scoring: Some(PlayerId::new(100)),
        goalie_in_net: None,
        assist_1: Some(PlayerId::new(200)),
        ..RawParticipants::default()
    };
    let slots = attribute(&EventType::from_token("goal"), &raw, true).expect("attribute");
    assert_eq!(
        slots,
        [
            Participant::new(Some(PlayerId::new(100)), ParticipantRole::Scorer),
            Participant::new(None, ParticipantRole::EmptyNet),
            Participant::new(Some(PlayerId::new(200)), ParticipantRole::Assist),
            Participant::EMPTY,
        ]
    );
}

#[test]
fn unresolved_slots_are_reported() {
    let mut faceoff = event(TeamSide::Home, Some(Zone::Neutral), None, 0.0, 0.0);
    faceoff.event_type = EventType::Faceoff;
    faceoff.raw_participants.winning = Some(PlayerId::new(1));
    let attributed = attribute_events(&[faceoff], true).expect("attribute");
    assert_eq!(attributed.issues.len(), 1);
    assert_eq!(attributed.issues[0].kind, IssueKind::UnresolvedAttribution);
    assert_eq!(
        attributed.events[0].participants[1],
        Participant::new(None, ParticipantRole::Loser)
    );
}

#[test]
fn offensive_zone_takes_absolute_value() {
    let options = ReconcileOptions::default();
    let shot = event(TeamSide::Away, Some(Zone::Offensive), None, -70.0, -3.0);
    let normalized = normalize_coordinates(&[shot], &options);
    let coords = normalized.events[0].coordinates.expect("coordinates");
    assert_eq!(coords.x, 70.0);
    assert_eq!(coords.y, 3.0);
    assert_eq!(coords.source, CoordinateSource::OffensiveZone);
    assert!((coords.distance - 19.235_384).abs() < 1e-3);
    assert!(normalized.issues.is_empty());
}

#[test]
fn neutral_zone_uses_period_majority() {
    let options = ReconcileOptions::default();
    let events = vec![
        event(TeamSide::Home, Some(Zone::Offensive), None, -60.0, 5.0),
        event(TeamSide::Home, Some(Zone::Offensive), None, -75.0, 5.0),
        event(TeamSide::Home, Some(Zone::Offensive), None, 80.0, 5.0),
        event(TeamSide::Home, Some(Zone::Neutral), None, 10.0, 2.0),
        event(TeamSide::Away, Some(Zone::Neutral), None, 10.0, 2.0),
    ];
    let normalized = normalize_coordinates(&events, &options);
    let home = normalized.events[3].coordinates.expect("home neutral");
    assert_eq!(home.x, -10.0);
    assert_eq!(home.source, CoordinateSource::NeutralMajority);
    // Away has no evidence of its own and mirrors the home vote.
    let away = normalized.events[4].coordinates.expect("away neutral");
    assert_eq!(away.x, 10.0);
    assert_eq!(
        normalized
            .issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::AmbiguousCoordinateFrame)
            .count(),
        2
    );
}

#[test]
fn neutral_zone_without_evidence_stays_null() {
    let options = ReconcileOptions::default();
    let lone = event(TeamSide::Home, Some(Zone::Neutral), None, 10.0, 2.0);
    let normalized = normalize_coordinates(&[lone], &options);
    assert!(normalized.events[0].coordinates.is_none());
    assert_eq!(normalized.issues.len(), 1);
}

#[test]
fn defending_side_known_for_period_applies_to_every_event() {
    let options = ReconcileOptions::default();
    let events = vec![
        event(TeamSide::Home, Some(Zone::Offensive), Some(RinkSide::Right), -80.0, 4.0),
        event(TeamSide::Away, Some(Zone::Offensive), None, 80.0, 4.0),
    ];
    let normalized = normalize_coordinates(&events, &options);
    assert_eq!(normalized.events[0].coordinates.unwrap().x, 80.0);
    let away = normalized.events[1].coordinates.unwrap();
    assert_eq!(away.x, 80.0);
    assert_eq!(away.source, CoordinateSource::DefendingSide);
}

fn raw_columns() -> impl Strategy<Value = (Vec<Option<i32>>, Vec<Option<f64>>, Vec<Option<String>>)>
{
    (0usize..16).prop_flat_map(|rows| {
        (
            proptest::collection::vec(proptest::option::of(any::<i32>()), rows),
            proptest::collection::vec(proptest::option::of(-100.0f64..100.0), rows),
            proptest::collection::vec(
                proptest::option::of("[0-9]{1,7}|[a-z]{0,3}"),
                rows,
            ),
        )
    })
}

proptest! {
    #[test]
    fn alignment_is_idempotent((ids, xs, players) in raw_columns()) {
        let df = DataFrame::new(vec![
            Series::new("id".into(), ids.clone()).into(),
            Series::new("xCoord".into(), xs).into(),
            Series::new("playerId".into(), players).into(),
            Series::new("extra".into(), ids).into(),
        ])
        .unwrap();
        let schema = raw_event_schema();
        let once = align_and_cast(&df, &schema).unwrap();
        let twice = align_and_cast(&once.frame, &schema).unwrap();
        prop_assert!(once.frame.equals_missing(&twice.frame));
        prop_assert!(twice.extra_fields.is_empty());
        prop_assert!(twice.missing_fields.is_empty());
    }

    #[test]
    fn defending_side_normalization_is_antisymmetric(
        x in -100.0f32..100.0,
        y in -42.0f32..42.0,
        left in any::<bool>(),
        zone in prop_oneof![Just(Zone::Offensive), Just(Zone::Defensive), Just(Zone::Neutral)],
    ) {
        let options = ReconcileOptions::default();
        let side = if left { RinkSide::Left } else { RinkSide::Right };
        let home = event(TeamSide::Home, Some(zone), Some(side), x, y);
        let away = event(TeamSide::Away, Some(zone), Some(side), x, y);
        let normalized = normalize_coordinates(&[home, away], &options);
        let h = normalized.events[0].coordinates.unwrap();
        let a = normalized.events[1].coordinates.unwrap();
        prop_assert_eq!(h.x, -a.x);
        prop_assert_eq!(h.y, -a.y);
    }
}
