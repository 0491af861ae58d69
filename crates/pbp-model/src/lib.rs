pub mod enums;
pub mod error;
pub mod event;
pub mod ids;
pub mod issues;
pub mod options;
pub mod processing;
pub mod roster;
pub mod shift;

pub use enums::{
    CoordinateSource, EventType, Hand, ParticipantRole, PositionClass, RinkSide, SeasonType,
    TeamSide, Zone,
};
pub use error::{PbpError, Result};
pub use event::{
    Event, GameClock, GameTeams, NormalizedCoordinates, Participant, RawParticipants, Situation,
};
pub use ids::{GameId, PlayerId, TeamId};
pub use issues::{GameDiagnostics, IssueKind, ReconcileIssue};
pub use options::ReconcileOptions;
pub use processing::{BatchReport, GameSummary, SkippedGame};
pub use roster::{RosterEntry, RosterLookup};
pub use shift::{RawShift, ShiftInterval};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_count_by_kind() {
        let mut diagnostics = GameDiagnostics::new(GameId::new(2023020001));
        diagnostics.push(ReconcileIssue::new(
            IssueKind::MalformedDuration,
            "bad clock",
        ));
        diagnostics.push(
            ReconcileIssue::new(IssueKind::SchemaDriftWarning, "unexpected key")
                .with_field("highlightClip"),
        );
        diagnostics.push(ReconcileIssue::new(
            IssueKind::MalformedDuration,
            "bad clock",
        ));
        assert_eq!(diagnostics.count(IssueKind::MalformedDuration), 2);
        assert_eq!(diagnostics.count(IssueKind::DegenerateShiftInterval), 0);

        let summary = GameSummary::from_diagnostics(&diagnostics);
        assert_eq!(summary.malformed_durations, 2);
        assert_eq!(summary.schema_drift, 1);
    }

    #[test]
    fn options_fill_missing_fields_from_defaults() {
        let options: ReconcileOptions =
            serde_json::from_str(r#"{"playoff_overtime_seconds": 900}"#).unwrap();
        assert_eq!(options.playoff_overtime_seconds, 900);
        assert_eq!(options.regulation_period_seconds, 1200);
        assert!(options.is_degenerate_situation("0101"));
        assert!(!options.is_degenerate_situation("1551"));
    }

    #[test]
    fn batch_report_serializes() {
        let report: BatchReport<GameSummary> = BatchReport::new(
            vec![GameSummary::default()],
            vec![SkippedGame {
                game_id: GameId::new(2023020002),
                reason: "malformed shift payload".to_string(),
            }],
        );
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: BatchReport<GameSummary> =
            serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round.skipped_ids(), vec![GameId::new(2023020002)]);
        assert_eq!(round.succeeded(), 1);
    }
}
