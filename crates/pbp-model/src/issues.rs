use serde::{Deserialize, Serialize};

use crate::ids::{GameId, PlayerId};

/// Data-quality condition raised during reconciliation.
///
/// None of these abort a game; the affected row or slot is dropped or left
/// null and the issue is recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Raw field outside the target schema (or an unknown detail key).
    SchemaDriftWarning,
    /// Clock string that is not `MM:SS`; the row is dropped.
    MalformedDuration,
    /// An attribution slot whose source field was null.
    UnresolvedAttribution,
    /// Coordinates resolved by the neutral-zone heuristic, or not at all.
    AmbiguousCoordinateFrame,
    /// Zero-length, inverted or unparseable shift; the interval is dropped.
    DegenerateShiftInterval,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SchemaDriftWarning => "SchemaDriftWarning",
            IssueKind::MalformedDuration => "MalformedDuration",
            IssueKind::UnresolvedAttribution => "UnresolvedAttribution",
            IssueKind::AmbiguousCoordinateFrame => "AmbiguousCoordinateFrame",
            IssueKind::DegenerateShiftInterval => "DegenerateShiftInterval",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileIssue {
    pub kind: IssueKind,
    pub message: String,
    /// Offending field or column name (if applicable).
    pub field: Option<String>,
    /// Event index of the affected row (if applicable).
    pub event_idx: Option<i32>,
    /// Player of the affected shift (if applicable).
    pub player_id: Option<PlayerId>,
}

impl ReconcileIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            event_idx: None,
            player_id: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_event_idx(mut self, event_idx: i32) -> Self {
        self.event_idx = Some(event_idx);
        self
    }

    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }
}

/// Issues collected while reconciling one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameDiagnostics {
    pub game_id: Option<GameId>,
    pub issues: Vec<ReconcileIssue>,
}

impl GameDiagnostics {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id: Some(game_id),
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, issue: ReconcileIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ReconcileIssue>) {
        self.issues.extend(issues);
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
