//! On-ice roster join.
//!
//! Every event is matched against the shift index at its period second. Shift
//! boundaries are whole seconds, so several events can share a second while a
//! change is in progress: players entering at that second are credited only
//! to the last event there, and players leaving are credited to every earlier
//! one.

use std::collections::HashMap;

use tracing::debug;

use pbp_model::{Event, GameId, PlayerId, PositionClass, TeamSide};

use crate::shift_index::{ShiftIndex, SlotKey};

/// One on-ice player with a resolved display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnIcePlayer {
    pub id: PlayerId,
    pub name: Option<String>,
}

/// Ordered on-ice lists for both sides of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnIceRoster {
    pub home_skaters: Vec<OnIcePlayer>,
    pub home_goalies: Vec<OnIcePlayer>,
    pub away_skaters: Vec<OnIcePlayer>,
    pub away_goalies: Vec<OnIcePlayer>,
}

impl OnIceRoster {
    pub fn players(&self, side: TeamSide, position: PositionClass) -> &[OnIcePlayer] {
        match (side, position) {
            (TeamSide::Home, PositionClass::Skater) => &self.home_skaters,
            (TeamSide::Home, PositionClass::Goalie) => &self.home_goalies,
            (TeamSide::Away, PositionClass::Skater) => &self.away_skaters,
            (TeamSide::Away, PositionClass::Goalie) => &self.away_goalies,
        }
    }

    fn players_mut(&mut self, side: TeamSide, position: PositionClass) -> &mut Vec<OnIcePlayer> {
        match (side, position) {
            (TeamSide::Home, PositionClass::Skater) => &mut self.home_skaters,
            (TeamSide::Home, PositionClass::Goalie) => &mut self.home_goalies,
            (TeamSide::Away, PositionClass::Skater) => &mut self.away_skaters,
            (TeamSide::Away, PositionClass::Goalie) => &mut self.away_goalies,
        }
    }

    pub fn ids(&self, side: TeamSide, position: PositionClass) -> Vec<PlayerId> {
        self.players(side, position)
            .iter()
            .map(|player| player.id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.home_skaters.is_empty()
            && self.home_goalies.is_empty()
            && self.away_skaters.is_empty()
            && self.away_goalies.is_empty()
    }
}

/// A fully reconciled event: the normalized event plus who was on the ice.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub event: Event,
    pub on_ice: OnIceRoster,
}

/// Append `extra` to `base`, skipping ids already present.
fn union(base: &[PlayerId], extra: &[PlayerId]) -> Vec<PlayerId> {
    let mut out = base.to_vec();
    for id in extra {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

/// Choose the active set from the three point queries at one second.
///
/// | non-empty                  | last event at second | earlier events     |
/// |----------------------------|----------------------|--------------------|
/// | current only               | current              | current            |
/// | entering only              | entering             | entering           |
/// | leaving only               | leaving              | leaving            |
/// | current, entering          | current + entering   | current            |
/// | current, leaving           | current              | current + leaving  |
/// | current, entering, leaving | current + entering   | current + leaving  |
/// | entering, leaving          | entering + leaving   | entering + leaving |
pub fn resolve_active(
    current: &[PlayerId],
    entering: &[PlayerId],
    leaving: &[PlayerId],
    is_last_at_second: bool,
) -> Vec<PlayerId> {
    match (
        current.is_empty(),
        entering.is_empty(),
        leaving.is_empty(),
    ) {
        (true, true, true) => Vec::new(),
        (false, true, true) => current.to_vec(),
        (true, false, true) => entering.to_vec(),
        (true, true, false) => leaving.to_vec(),
        (true, false, false) => union(entering, leaving),
        (false, false, _) if is_last_at_second => union(current, entering),
        (false, false, true) => current.to_vec(),
        (false, _, false) if is_last_at_second => current.to_vec(),
        (false, _, false) => union(current, leaving),
    }
}

/// `(game, period, period second)` → largest event index among events that
/// take part in the join.
fn last_event_at_second(events: &[&Event]) -> HashMap<(GameId, i32, i32), i32> {
    let mut last: HashMap<(GameId, i32, i32), i32> = HashMap::new();
    for event in events {
        let key = (event.game_id, event.period, event.clock.period_seconds);
        last.entry(key)
            .and_modify(|idx| *idx = (*idx).max(event.event_idx))
            .or_insert(event.event_idx);
    }
    last
}

const SLOTS: [(TeamSide, PositionClass); 4] = [
    (TeamSide::Home, PositionClass::Skater),
    (TeamSide::Home, PositionClass::Goalie),
    (TeamSide::Away, PositionClass::Skater),
    (TeamSide::Away, PositionClass::Goalie),
];

/// Resolve the on-ice roster for one event.
pub fn roster_at(event: &Event, index: &ShiftIndex, is_last_at_second: bool) -> OnIceRoster {
    let second = event.clock.period_seconds;
    let mut roster = OnIceRoster::default();
    for (side, position) in SLOTS {
        let key = SlotKey::new(event.game_id, event.period, side, position);
        let active = resolve_active(
            &index.on_ice_at(key, second),
            &index.entering_at(key, second),
            &index.leaving_at(key, second),
            is_last_at_second,
        );
        *roster.players_mut(side, position) = active
            .into_iter()
            .map(|id| OnIcePlayer {
                id,
                name: index.name_of(id).map(str::to_string),
            })
            .collect();
    }
    roster
}

/// Join every event with its on-ice roster.
///
/// Output is ordered by `(game, period, period second, event index)`. Period
/// and game boundary markers get an empty roster and are ignored when finding
/// the last event at a second.
pub fn join_on_ice(events: &[Event], index: &ShiftIndex) -> Vec<TimelineEvent> {
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|event| event.timeline_key());

    let joinable: Vec<&Event> = ordered
        .iter()
        .copied()
        .filter(|event| !event.event_type.is_boundary())
        .collect();
    let last = last_event_at_second(&joinable);

    let mut empty_rosters = 0usize;
    let timeline: Vec<TimelineEvent> = ordered
        .into_iter()
        .map(|event| {
            let on_ice = if event.event_type.is_boundary() {
                OnIceRoster::default()
            } else {
                let key = (event.game_id, event.period, event.clock.period_seconds);
                let is_last = last.get(&key) == Some(&event.event_idx);
                let roster = roster_at(event, index, is_last);
                if roster.is_empty() {
                    empty_rosters += 1;
                }
                roster
            };
            TimelineEvent {
                event: event.clone(),
                on_ice,
            }
        })
        .collect();

    if empty_rosters > 0 && !index.is_empty() {
        debug!(events = empty_rosters, "events with no on-ice players");
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<PlayerId> {
        raw.iter().copied().map(PlayerId::new).collect()
    }

    #[test]
    fn single_source_is_used_as_is() {
        let current = ids(&[1, 2]);
        assert_eq!(resolve_active(&current, &[], &[], false), current);
        assert_eq!(resolve_active(&[], &ids(&[3]), &[], false), ids(&[3]));
        assert_eq!(resolve_active(&[], &[], &ids(&[4]), true), ids(&[4]));
        assert!(resolve_active(&[], &[], &[], true).is_empty());
    }

    #[test]
    fn entering_players_count_only_for_last_event() {
        let current = ids(&[1, 2]);
        let entering = ids(&[3]);
        assert_eq!(resolve_active(&current, &entering, &[], false), ids(&[1, 2]));
        assert_eq!(
            resolve_active(&current, &entering, &[], true),
            ids(&[1, 2, 3])
        );
    }

    #[test]
    fn leaving_players_count_until_last_event() {
        let current = ids(&[1, 2]);
        let leaving = ids(&[5]);
        assert_eq!(
            resolve_active(&current, &[], &leaving, false),
            ids(&[1, 2, 5])
        );
        assert_eq!(resolve_active(&current, &[], &leaving, true), ids(&[1, 2]));
    }

    #[test]
    fn full_change_at_one_second() {
        let current = ids(&[1]);
        let entering = ids(&[3]);
        let leaving = ids(&[5]);
        assert_eq!(
            resolve_active(&current, &entering, &leaving, true),
            ids(&[1, 3])
        );
        assert_eq!(
            resolve_active(&current, &entering, &leaving, false),
            ids(&[1, 5])
        );
        assert_eq!(
            resolve_active(&[], &entering, &leaving, false),
            ids(&[3, 5])
        );
    }
}
