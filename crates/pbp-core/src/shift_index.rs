//! Shift interval index.
//!
//! Raw shift records are parsed, cleaned, merged per player and period, and
//! bucketed by `(game, period, side, position class)`. Each bucket keeps its
//! intervals sorted by start second plus a permutation sorted by end second,
//! so the three point queries are binary searches over sorted slices.

use std::collections::HashMap;

use tracing::debug;

use pbp_model::{
    GameId, GameTeams, IssueKind, PlayerId, PositionClass, RawShift, ReconcileIssue,
    ReconcileOptions, RosterLookup, ShiftInterval, TeamSide,
};
use pbp_transform::{parse_clock, period_offset};

/// Bucket key for the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub game_id: GameId,
    pub period: i32,
    pub side: TeamSide,
    pub position: PositionClass,
}

impl SlotKey {
    pub fn new(game_id: GameId, period: i32, side: TeamSide, position: PositionClass) -> Self {
        Self {
            game_id,
            period,
            side,
            position,
        }
    }
}

/// Intervals parsed out of a raw shift chart, before indexing.
#[derive(Debug, Clone, Default)]
pub struct ParsedShifts {
    pub intervals: Vec<ShiftInterval>,
    /// Display names seen on shift records, keyed by player.
    pub names: HashMap<PlayerId, String>,
    pub issues: Vec<ReconcileIssue>,
    /// Records for teams other than the home and away teams.
    pub foreign_team_records: usize,
}

fn degenerate(raw: &RawShift, message: String) -> ReconcileIssue {
    let issue = ReconcileIssue::new(IssueKind::DegenerateShiftInterval, message);
    match raw.player_id {
        Some(player) => issue.with_player(player),
        None => issue,
    }
}

/// Parse raw shift records into intervals for one game.
///
/// Records with a missing player or period, an unparseable clock, or a start
/// not strictly before the end are degenerate and dropped. Records for a team
/// that is neither home nor away are dropped silently. Players missing from
/// the roster are treated as skaters.
pub fn parse_shifts(
    raw_shifts: &[RawShift],
    game_id: GameId,
    teams: &GameTeams,
    roster: &RosterLookup,
    options: &ReconcileOptions,
) -> ParsedShifts {
    let mut parsed = ParsedShifts::default();
    for raw in raw_shifts {
        if let Some(other) = raw.game_id
            && other != game_id
        {
            debug!(game_id = %game_id, other = %other, "skipping shift from another game");
            continue;
        }
        let Some((team_id, side)) = raw
            .team_id
            .and_then(|team| teams.side_of(team).map(|side| (team, side)))
        else {
            parsed.foreign_team_records += 1;
            continue;
        };
        let (Some(player_id), Some(period)) = (raw.player_id, raw.period) else {
            parsed
                .issues
                .push(degenerate(raw, "shift without player or period".to_string()));
            continue;
        };
        let start = raw.start_time.as_deref().unwrap_or("");
        let end = raw.end_time.as_deref().unwrap_or("");
        let (period_start, period_end) = match (parse_clock(start), parse_clock(end)) {
            (Ok(start), Ok(end)) => (start, end),
            _ => {
                parsed.issues.push(degenerate(
                    raw,
                    format!("unparseable shift clock {start:?}-{end:?}"),
                ));
                continue;
            }
        };
        if period_start >= period_end {
            parsed.issues.push(degenerate(
                raw,
                format!("empty or inverted shift {start}-{end} in period {period}"),
            ));
            continue;
        }

        let position = match roster.position_of(player_id) {
            Some(position) => position,
            None => {
                debug!(player_id = %player_id, "player not in roster, treating as skater");
                PositionClass::Skater
            }
        };
        if let Some(name) = raw.display_name() {
            parsed.names.entry(player_id).or_insert(name);
        }

        let offset = period_offset(period, options);
        parsed.intervals.push(ShiftInterval {
            game_id,
            team_id,
            side,
            player_id,
            position,
            period,
            period_start,
            period_end,
            game_start: period_start + offset,
            game_end: period_end + offset,
        });
    }
    if parsed.foreign_team_records > 0 {
        debug!(
            game_id = %game_id,
            records = parsed.foreign_team_records,
            "dropped shifts for teams outside the game"
        );
    }
    parsed
}

/// Merge intervals of the same player and period that abut or overlap.
///
/// Output is sorted by `(game, period, player, start)`.
pub fn merge_intervals(mut intervals: Vec<ShiftInterval>) -> Vec<ShiftInterval> {
    intervals.sort_by_key(|interval| {
        (
            interval.game_id,
            interval.period,
            interval.player_id,
            interval.side,
            interval.period_start,
            interval.period_end,
        )
    });
    let mut merged: Vec<ShiftInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut()
            && last.game_id == interval.game_id
            && last.period == interval.period
            && last.player_id == interval.player_id
            && last.side == interval.side
            && interval.period_start <= last.period_end
        {
            if interval.period_end > last.period_end {
                last.period_end = interval.period_end;
                last.game_end = interval.game_end;
            }
            continue;
        }
        merged.push(interval);
    }
    merged
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    /// Sorted by `(start, player)`.
    by_start: Vec<ShiftInterval>,
    /// Indices into `by_start`, sorted by `(end, start, player)`.
    by_end: Vec<usize>,
}

impl Bucket {
    fn new(mut intervals: Vec<ShiftInterval>) -> Self {
        intervals.sort_by_key(|interval| (interval.period_start, interval.player_id));
        let mut by_end: Vec<usize> = (0..intervals.len()).collect();
        by_end.sort_by_key(|&idx| {
            let interval = &intervals[idx];
            (interval.period_end, interval.period_start, interval.player_id)
        });
        Self {
            by_start: intervals,
            by_end,
        }
    }

    fn on_ice_at(&self, second: i32) -> Vec<PlayerId> {
        let started = self
            .by_start
            .partition_point(|interval| interval.period_start < second);
        self.by_start[..started]
            .iter()
            .filter(|interval| interval.period_end > second)
            .map(|interval| interval.player_id)
            .collect()
    }

    fn entering_at(&self, second: i32) -> Vec<PlayerId> {
        let lo = self
            .by_start
            .partition_point(|interval| interval.period_start < second);
        let hi = self
            .by_start
            .partition_point(|interval| interval.period_start <= second);
        self.by_start[lo..hi]
            .iter()
            .map(|interval| interval.player_id)
            .collect()
    }

    fn leaving_at(&self, second: i32) -> Vec<PlayerId> {
        let end_of = |idx: &usize| self.by_start[*idx].period_end;
        let lo = self.by_end.partition_point(|idx| end_of(idx) < second);
        let hi = self.by_end.partition_point(|idx| end_of(idx) <= second);
        // Slice is ordered by start then player already, since ends tie.
        self.by_end[lo..hi]
            .iter()
            .map(|&idx| self.by_start[idx].player_id)
            .collect()
    }
}

/// Queryable per-game store of on-ice intervals.
#[derive(Debug, Clone, Default)]
pub struct ShiftIndex {
    buckets: HashMap<SlotKey, Bucket>,
    names: HashMap<PlayerId, String>,
    interval_count: usize,
}

impl ShiftIndex {
    /// Index already-merged intervals.
    pub fn from_intervals(intervals: Vec<ShiftInterval>) -> Self {
        let interval_count = intervals.len();
        let mut grouped: HashMap<SlotKey, Vec<ShiftInterval>> = HashMap::new();
        for interval in intervals {
            let key = SlotKey::new(
                interval.game_id,
                interval.period,
                interval.side,
                interval.position,
            );
            grouped.entry(key).or_default().push(interval);
        }
        let buckets = grouped
            .into_iter()
            .map(|(key, intervals)| (key, Bucket::new(intervals)))
            .collect();
        Self {
            buckets,
            names: HashMap::new(),
            interval_count,
        }
    }

    /// Full build: parse, drop degenerate records, merge, classify, index.
    ///
    /// Names come from the roster first and fall back to the shift records.
    pub fn build(
        raw_shifts: &[RawShift],
        game_id: GameId,
        teams: &GameTeams,
        roster: &RosterLookup,
        options: &ReconcileOptions,
    ) -> (Self, Vec<ReconcileIssue>) {
        let parsed = parse_shifts(raw_shifts, game_id, teams, roster, options);
        let merged = merge_intervals(parsed.intervals);
        let mut index = Self::from_intervals(merged);
        for (player, shift_name) in parsed.names {
            let name = roster
                .name_of(player)
                .map(str::to_string)
                .unwrap_or(shift_name);
            index.names.insert(player, name);
        }
        for bucket in index.buckets.values() {
            for interval in &bucket.by_start {
                if let Some(name) = roster.name_of(interval.player_id) {
                    index
                        .names
                        .entry(interval.player_id)
                        .or_insert_with(|| name.to_string());
                }
            }
        }
        debug!(
            game_id = %game_id,
            intervals = index.interval_count,
            buckets = index.buckets.len(),
            degenerate = parsed.issues.len(),
            "built shift index"
        );
        (index, parsed.issues)
    }

    /// Players whose interval strictly contains `second`.
    pub fn on_ice_at(&self, key: SlotKey, second: i32) -> Vec<PlayerId> {
        self.buckets
            .get(&key)
            .map(|bucket| bucket.on_ice_at(second))
            .unwrap_or_default()
    }

    /// Players whose interval starts exactly at `second`.
    pub fn entering_at(&self, key: SlotKey, second: i32) -> Vec<PlayerId> {
        self.buckets
            .get(&key)
            .map(|bucket| bucket.entering_at(second))
            .unwrap_or_default()
    }

    /// Players whose interval ends exactly at `second`.
    pub fn leaving_at(&self, key: SlotKey, second: i32) -> Vec<PlayerId> {
        self.buckets
            .get(&key)
            .map(|bucket| bucket.leaving_at(second))
            .unwrap_or_default()
    }

    pub fn name_of(&self, player: PlayerId) -> Option<&str> {
        self.names.get(&player).map(String::as_str)
    }

    /// All indexed intervals for one bucket, ordered by start.
    pub fn intervals(&self, key: SlotKey) -> &[ShiftInterval] {
        self.buckets
            .get(&key)
            .map(|bucket| bucket.by_start.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.interval_count
    }

    pub fn is_empty(&self) -> bool {
        self.interval_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbp_model::TeamId;

    fn interval(player: i64, start: i32, end: i32) -> ShiftInterval {
        ShiftInterval {
            game_id: GameId::new(1),
            team_id: TeamId::new(10),
            side: TeamSide::Home,
            player_id: PlayerId::new(player),
            position: PositionClass::Skater,
            period: 1,
            period_start: start,
            period_end: end,
            game_start: start,
            game_end: end,
        }
    }

    fn key() -> SlotKey {
        SlotKey::new(GameId::new(1), 1, TeamSide::Home, PositionClass::Skater)
    }

    #[test]
    fn overlapping_and_duplicate_intervals_collapse() {
        let merged = merge_intervals(vec![
            interval(1, 0, 50),
            interval(1, 0, 50),
            interval(1, 40, 90),
            interval(1, 100, 120),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].period_start, merged[0].period_end), (0, 90));
        assert_eq!((merged[1].period_start, merged[1].period_end), (100, 120));
    }

    #[test]
    fn point_queries() {
        let index = ShiftIndex::from_intervals(vec![
            interval(3, 0, 40),
            interval(1, 40, 80),
            interval(2, 10, 40),
            interval(4, 20, 60),
        ]);
        assert_eq!(index.on_ice_at(key(), 40), vec![PlayerId::new(4)]);
        assert_eq!(index.entering_at(key(), 40), vec![PlayerId::new(1)]);
        assert_eq!(
            index.leaving_at(key(), 40),
            vec![PlayerId::new(3), PlayerId::new(2)]
        );
        assert!(index.on_ice_at(key(), 0).is_empty());
        let other = SlotKey::new(GameId::new(1), 2, TeamSide::Home, PositionClass::Skater);
        assert!(index.on_ice_at(other, 30).is_empty());
    }
}
