//! Configuration options for reconciliation.

use serde::{Deserialize, Serialize};

use crate::enums::SeasonType;

/// Options controlling clock derivations, filtering and output shape.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Length of a regulation period in seconds.
    pub regulation_period_seconds: i32,

    /// Number of regulation periods in a game.
    pub regulation_periods: i32,

    /// Overtime length in regular-season games.
    pub regular_season_overtime_seconds: i32,

    /// Overtime length in playoff games (full periods).
    pub playoff_overtime_seconds: i32,

    /// Skater slots emitted per side in the finalized table.
    pub max_skaters_per_side: usize,

    /// Situation codes whose rows are placeholders and get dropped.
    pub degenerate_situation_codes: Vec<String>,

    /// x coordinate of the attacking goal line.
    pub goal_line_x: f32,

    /// Fail on event-type tokens outside the canonical taxonomy instead of
    /// attributing them with all-null slots. Meant for development and tests.
    pub strict_taxonomy: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            regulation_period_seconds: 1200,
            regulation_periods: 3,
            regular_season_overtime_seconds: 300,
            playoff_overtime_seconds: 1200,
            max_skaters_per_side: 6,
            degenerate_situation_codes: vec!["0101".to_string(), "1010".to_string()],
            goal_line_x: 89.0,
            strict_taxonomy: false,
        }
    }
}

impl ReconcileOptions {
    /// Options for tests and development runs: unknown event types fail fast.
    pub fn strict() -> Self {
        Self {
            strict_taxonomy: true,
            ..Self::default()
        }
    }

    pub fn is_overtime(&self, period: i32) -> bool {
        period > self.regulation_periods
    }

    pub fn overtime_seconds(&self, season_type: SeasonType) -> i32 {
        match season_type {
            SeasonType::Regular => self.regular_season_overtime_seconds,
            SeasonType::Playoff => self.playoff_overtime_seconds,
        }
    }

    pub fn is_degenerate_situation(&self, code: &str) -> bool {
        self.degenerate_situation_codes
            .iter()
            .any(|candidate| candidate == code)
    }
}
