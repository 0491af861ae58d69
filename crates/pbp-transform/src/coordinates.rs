//! Coordinate frame normalization.
//!
//! Raw coordinates follow whatever direction the source drew the rink in. The
//! normalized frame always has positive x toward the event team's attacking
//! goal, which sits at `(goal_line_x, 0)`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use pbp_model::{
    CoordinateSource, Event, GameId, IssueKind, NormalizedCoordinates, ReconcileIssue,
    ReconcileOptions, RinkSide, TeamSide, Zone,
};

/// Sign applied to raw coordinates when the home team's defending side is
/// known. Home attacks right when it defends left; away the opposite.
pub fn defending_side_sign(home_defending: RinkSide, event_side: TeamSide) -> f32 {
    match (home_defending, event_side) {
        (RinkSide::Left, TeamSide::Home) | (RinkSide::Right, TeamSide::Away) => 1.0,
        (RinkSide::Right, TeamSide::Home) | (RinkSide::Left, TeamSide::Away) => -1.0,
    }
}

/// Distance from a normalized point to the attacking goal.
pub fn shot_distance(x: f32, y: f32, goal_line_x: f32) -> f32 {
    let dx = if x >= 0.0 {
        goal_line_x - x.abs()
    } else {
        x.abs() + goal_line_x
    };
    dx.hypot(y)
}

/// Absolute angle off the goal line axis, in degrees.
///
/// Points behind the goal line are reflected (`180 - angle`). On the goal
/// line itself the angle is 90, or 0 at the goal.
pub fn shot_angle(x: f32, y: f32, goal_line_x: f32) -> f32 {
    let dx = if x >= 0.0 {
        goal_line_x - x.abs()
    } else {
        x.abs() + goal_line_x
    };
    let angle = if dx == 0.0 {
        if y == 0.0 { 0.0 } else { 90.0 }
    } else {
        (y / dx).atan().to_degrees().abs()
    };
    if x > goal_line_x { 180.0 - angle } else { angle }
}

type PeriodKey = (GameId, i32);
type TeamPeriodKey = (GameId, i32, TeamSide);

/// Per-period facts the per-event rules need.
struct PeriodEvidence {
    /// First defending side seen on any event in the period.
    defending: HashMap<PeriodKey, RinkSide>,
    /// Dominant sign of raw x over a team's offensive-zone events.
    offensive_sign: HashMap<TeamPeriodKey, f32>,
}

impl PeriodEvidence {
    fn collect(events: &[Event]) -> Self {
        let mut defending = HashMap::new();
        let mut votes: HashMap<TeamPeriodKey, (u32, u32)> = HashMap::new();
        for event in events {
            if let Some(side) = event.home_defending_side {
                defending.entry((event.game_id, event.period)).or_insert(side);
            }
            if event.zone == Some(Zone::Offensive)
                && let (Some(team), Some(x)) = (event.event_team_side, event.raw_x)
                && x != 0.0
            {
                let tally = votes
                    .entry((event.game_id, event.period, team))
                    .or_insert((0, 0));
                if x > 0.0 {
                    tally.0 += 1;
                } else {
                    tally.1 += 1;
                }
            }
        }
        let offensive_sign = votes
            .into_iter()
            .filter_map(|(key, (positive, negative))| match positive.cmp(&negative) {
                std::cmp::Ordering::Greater => Some((key, 1.0)),
                std::cmp::Ordering::Less => Some((key, -1.0)),
                std::cmp::Ordering::Equal => None,
            })
            .collect();
        Self {
            defending,
            offensive_sign,
        }
    }

    /// Neutral-zone sign for a team: its own evidence, else the opponent's
    /// evidence negated.
    fn neutral_sign(&self, game: GameId, period: i32, team: TeamSide) -> Option<f32> {
        self.offensive_sign
            .get(&(game, period, team))
            .copied()
            .or_else(|| {
                self.offensive_sign
                    .get(&(game, period, team.opponent()))
                    .map(|sign| -sign)
            })
    }
}

/// Outcome of normalizing one event.
enum Resolution {
    Resolved(f32, f32, CoordinateSource),
    /// Nothing to normalize (no raw point).
    NoPoint,
    /// A raw point exists but no rule could orient it.
    Unresolved(&'static str),
}

fn resolve(event: &Event, evidence: &PeriodEvidence) -> Resolution {
    let (Some(x), Some(y)) = (event.raw_x, event.raw_y) else {
        return Resolution::NoPoint;
    };

    let defending = event.home_defending_side.or_else(|| {
        evidence
            .defending
            .get(&(event.game_id, event.period))
            .copied()
    });
    if let (Some(defending), Some(side)) = (defending, event.event_team_side) {
        let sign = defending_side_sign(defending, side);
        return Resolution::Resolved(x * sign, y * sign, CoordinateSource::DefendingSide);
    }

    match event.zone {
        Some(Zone::Offensive) => {
            Resolution::Resolved(x.abs(), y.abs(), CoordinateSource::OffensiveZone)
        }
        Some(Zone::Defensive) => {
            Resolution::Resolved(-x.abs(), -y.abs(), CoordinateSource::DefensiveZone)
        }
        Some(Zone::Neutral) => match event.event_team_side {
            Some(team) => match evidence.neutral_sign(event.game_id, event.period, team) {
                Some(sign) => {
                    Resolution::Resolved(x * sign, y * sign, CoordinateSource::NeutralMajority)
                }
                None => Resolution::Unresolved("no offensive-zone evidence in period"),
            },
            None => Resolution::Unresolved("neutral-zone event without a team side"),
        },
        None => Resolution::Unresolved("no defending side and no zone"),
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedEvents {
    pub events: Vec<Event>,
    pub issues: Vec<ReconcileIssue>,
}

/// Normalize coordinates for every event and derive distance and angle.
pub fn normalize_coordinates(events: &[Event], options: &ReconcileOptions) -> NormalizedEvents {
    let evidence = PeriodEvidence::collect(events);
    let goal_line_x = options.goal_line_x;
    let mut issues = Vec::new();
    let mut unresolved_periods: HashSet<PeriodKey> = HashSet::new();

    let normalized = events
        .iter()
        .map(|event| {
            let mut next = event.clone();
            next.coordinates = match resolve(event, &evidence) {
                Resolution::Resolved(x, y, source) => {
                    if source == CoordinateSource::NeutralMajority {
                        issues.push(
                            ReconcileIssue::new(
                                IssueKind::AmbiguousCoordinateFrame,
                                "neutral-zone coordinates oriented by majority vote",
                            )
                            .with_event_idx(event.event_idx),
                        );
                    }
                    Some(NormalizedCoordinates {
                        x,
                        y,
                        distance: shot_distance(x, y, goal_line_x),
                        angle: shot_angle(x, y, goal_line_x),
                        source,
                    })
                }
                Resolution::NoPoint => None,
                Resolution::Unresolved(reason) => {
                    if unresolved_periods.insert((event.game_id, event.period)) {
                        debug!(
                            game_id = %event.game_id,
                            period = event.period,
                            reason,
                            "coordinates left null"
                        );
                    }
                    issues.push(
                        ReconcileIssue::new(
                            IssueKind::AmbiguousCoordinateFrame,
                            format!("coordinates left null: {reason}"),
                        )
                        .with_event_idx(event.event_idx),
                    );
                    None
                }
            };
            next
        })
        .collect();

    NormalizedEvents {
        events: normalized,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_goal() {
        assert!((shot_distance(70.0, 0.0, 89.0) - 19.0).abs() < 1e-4);
        assert!((shot_distance(-10.0, 0.0, 89.0) - 99.0).abs() < 1e-4);
        assert!((shot_distance(89.0, 5.0, 89.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn angle_edge_cases() {
        assert!((shot_angle(79.0, 10.0, 89.0) - 45.0).abs() < 1e-3);
        assert_eq!(shot_angle(89.0, 4.0, 89.0), 90.0);
        assert_eq!(shot_angle(89.0, 0.0, 89.0), 0.0);
        // Behind the goal line the angle is reflected.
        let behind = shot_angle(99.0, 10.0, 89.0);
        assert!((behind - 135.0).abs() < 1e-3);
    }

    #[test]
    fn defending_side_table() {
        assert_eq!(defending_side_sign(RinkSide::Left, TeamSide::Home), 1.0);
        assert_eq!(defending_side_sign(RinkSide::Right, TeamSide::Home), -1.0);
        assert_eq!(defending_side_sign(RinkSide::Left, TeamSide::Away), -1.0);
        assert_eq!(defending_side_sign(RinkSide::Right, TeamSide::Away), 1.0);
    }
}
