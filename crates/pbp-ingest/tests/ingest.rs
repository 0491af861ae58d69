use std::fs;

use polars::prelude::DataType;
use tempfile::TempDir;

use pbp_ingest::{
    discover_games, parse_play_by_play, read_roster_csv, read_shift_chart,
};
use pbp_model::{GameId, Hand, PlayerId, PositionClass};

const PLAY_BY_PLAY: &str = r#"{
  "id": 2023020001,
  "season": 20232024,
  "gameType": 2,
  "gameDate": "2023-10-10",
  "awayTeam": {"id": 18, "abbrev": "NSH", "placeName": {"default": "Nashville"}},
  "homeTeam": {"id": 14, "abbrev": "TBL"},
  "plays": [
    {
      "eventId": 102,
      "periodDescriptor": {"number": 1, "periodType": "REG", "maxRegulationPeriods": 3},
      "timeInPeriod": "00:00",
      "timeRemaining": "20:00",
      "situationCode": "1551",
      "homeTeamDefendingSide": "left",
      "typeCode": 502,
      "typeDescKey": "faceoff",
      "sortOrder": 11,
      "details": {
        "eventOwnerTeamId": 14,
        "losingPlayerId": 8476887,
        "winningPlayerId": 8478010,
        "xCoord": 0,
        "yCoord": 0,
        "zoneCode": "N"
      }
    },
    {
      "eventId": 151,
      "periodDescriptor": {"number": 1, "periodType": "REG", "maxRegulationPeriods": 3},
      "timeInPeriod": "01:10",
      "timeRemaining": "18:50",
      "situationCode": "1551",
      "homeTeamDefendingSide": "left",
      "typeCode": 509,
      "typeDescKey": "penalty",
      "sortOrder": 40,
      "details": {
        "xCoord": -37.5,
        "yCoord": 12,
        "zoneCode": "D",
        "typeCode": "MIN",
        "descKey": "tripping",
        "duration": 2,
        "committedByPlayerId": 8476887,
        "drawnByPlayerId": 8478010,
        "eventOwnerTeamId": 18,
        "homeSOG": 0,
        "awaySOG": 1,
        "highlightClip": 6340000
      }
    }
  ]
}"#;

#[test]
fn flattens_plays_with_game_fields_broadcast() {
    let raw = parse_play_by_play(PLAY_BY_PLAY).expect("parse play-by-play");
    assert_eq!(raw.game_id, GameId::new(2023020001));
    assert_eq!(raw.frame.height(), 2);

    let home = raw.frame.column("homeTeam.abbrev").expect("home abbrev");
    assert_eq!(home.str().unwrap().get(1), Some("TBL"));

    let period = raw.frame.column("period").expect("period");
    assert_eq!(period.dtype(), &DataType::Int64);

    // Penalty type code must not collide with the play's own type code.
    let penalty = raw.frame.column("penaltyTypeCode").expect("penalty type");
    assert_eq!(penalty.str().unwrap().get(1), Some("MIN"));
    let type_code = raw.frame.column("typeCode").expect("type code");
    assert_eq!(type_code.i64().unwrap().get(1), Some(509));

    // Mixed int/float coordinates widen to float.
    let x = raw.frame.column("xCoord").expect("x");
    assert_eq!(x.dtype(), &DataType::Float64);
}

#[test]
fn unknown_detail_keys_are_reported_and_dropped() {
    let raw = parse_play_by_play(PLAY_BY_PLAY).expect("parse play-by-play");
    assert_eq!(
        raw.unknown_detail_keys.iter().collect::<Vec<_>>(),
        vec!["highlightClip"]
    );
    assert!(raw.frame.column("highlightClip").is_err());
    // Expected upstream extras are neither kept nor reported.
    assert!(raw.frame.column("homeSOG").is_err());
    assert!(raw.frame.column("maxRegulationPeriods").is_err());
    // Absent known detail keys are still present as null columns.
    let scorer = raw.frame.column("scoringPlayerId").expect("scorer column");
    assert_eq!(scorer.null_count(), 2);
}

#[test]
fn payload_without_game_id_is_rejected() {
    assert!(parse_play_by_play(r#"{"plays": []}"#).is_err());
    assert!(parse_play_by_play(r#"{"id": 1, "plays": {}}"#).is_err());
}

#[test]
fn game_without_plays_has_no_rows() {
    let raw = parse_play_by_play(r#"{"id": 2023020005}"#).expect("parse");
    assert_eq!(raw.frame.height(), 0);
}

#[test]
fn reads_roster_csv() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("roster.csv");
    fs::write(
        &path,
        "player_id,first_name,last_name,hand_R,hand_L,pos_F,pos_D,pos_G\n\
         8478010,Brayden,Point,1,0,1,0,0\n\
         8476883,Andrei,Vasilevskiy,0,1.0,0,0,1.0\n\
         ,Missing,Id,0,0,0,0,0\n",
    )
    .expect("write roster");

    let roster = read_roster_csv(&path).expect("read roster");
    assert_eq!(roster.len(), 2);
    let point = roster.get(PlayerId::new(8478010)).expect("point");
    assert_eq!(point.position, PositionClass::Skater);
    assert_eq!(point.hand, Some(Hand::Right));
    assert_eq!(point.name.as_deref(), Some("BRAYDEN.POINT"));
    assert_eq!(
        roster.position_of(PlayerId::new(8476883)),
        Some(PositionClass::Goalie)
    );
}

#[test]
fn roster_without_goalie_flag_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("roster.csv");
    fs::write(&path, "player_id,first_name\n1,A\n").expect("write roster");
    assert!(read_roster_csv(&path).is_err());
}

#[test]
fn discovers_paired_payloads() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("2023020002.pbp.json"), "{}").expect("write");
    fs::write(dir.path().join("2023020001.pbp.json"), "{}").expect("write");
    fs::write(dir.path().join("2023020001.shifts.json"), "{}").expect("write");
    fs::write(dir.path().join("2023020003.shifts.json"), "{}").expect("write");
    fs::write(dir.path().join("notes.txt"), "").expect("write");

    let games = discover_games(dir.path()).expect("discover");
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].stem, "2023020001");
    assert!(games[0].shift_chart.is_some());
    assert_eq!(games[1].stem, "2023020002");
    assert!(games[1].shift_chart.is_none());
}

#[test]
fn reads_shift_chart_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("2023020001.shifts.json");
    fs::write(
        &path,
        r#"{"data": [{"gameId": 2023020001, "playerId": 8478010, "teamId": 14,
            "period": 1, "startTime": "00:00", "endTime": "00:48",
            "firstName": "Brayden", "lastName": "Point", "teamAbbrev": "TBL",
            "duration": "00:48", "typeCode": 517}], "total": 1}"#,
    )
    .expect("write shifts");
    let shifts = read_shift_chart(&path).expect("read shifts");
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].end_time.as_deref(), Some("00:48"));
    assert!(read_shift_chart(&dir.path().join("missing.json")).is_err());
}
