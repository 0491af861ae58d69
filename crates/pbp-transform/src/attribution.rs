//! Participant attribution: which raw id fills which role slot, per event type.

use tracing::debug;

use pbp_model::{
    Event, EventType, IssueKind, Participant, ParticipantRole, PbpError, RawParticipants,
    ReconcileIssue,
};

/// The four role-tagged participant slots of one event.
pub type ParticipantSlots = [Participant; 4];

/// A slot filled only when its source id is present.
fn if_present(id: Option<pbp_model::PlayerId>, role: ParticipantRole) -> Participant {
    match id {
        Some(_) => Participant::new(id, role),
        None => Participant::EMPTY,
    }
}

/// Resolve the participant slots for one event.
///
/// Canonical types follow a fixed rule each. Unknown types get all-null
/// slots unless `strict` is set, in which case they are a contract failure.
pub fn attribute(
    event_type: &EventType,
    raw: &RawParticipants,
    strict: bool,
) -> Result<ParticipantSlots, PbpError> {
    use ParticipantRole as Role;

    let empty = Participant::EMPTY;
    let slots = match event_type {
        EventType::Faceoff => [
            Participant::new(raw.winning, Role::Winner),
            Participant::new(raw.losing, Role::Loser),
            empty,
            empty,
        ],
        EventType::Hit => [
            Participant::new(raw.hitting, Role::Hitter),
            Participant::new(raw.hittee, Role::Hittee),
            empty,
            empty,
        ],
        EventType::Goal => {
            let goalie = match raw.goalie_in_net {
                Some(_) => Participant::new(raw.goalie_in_net, Role::Goalie),
                None => Participant::new(None, Role::EmptyNet),
            };
            [
                Participant::new(raw.scoring, Role::Scorer),
                goalie,
                if_present(raw.assist_1, Role::Assist),
                if_present(raw.assist_2, Role::Assist),
            ]
        }
        EventType::Shot | EventType::MissedShot => [
            Participant::new(raw.shooting, Role::Shooter),
            Participant::new(raw.goalie_in_net, Role::Goalie),
            empty,
            empty,
        ],
        EventType::BlockedShot => [
            Participant::new(raw.shooting, Role::Shooter),
            Participant::new(raw.goalie_in_net, Role::Goalie),
            if_present(raw.blocking, Role::Blocker),
            empty,
        ],
        EventType::Penalty => [
            Participant::new(raw.committed_by, Role::PenaltyOn),
            Participant::new(raw.drawn_by, Role::DrewBy),
            if_present(raw.served_by, Role::ServedBy),
            empty,
        ],
        EventType::Giveaway | EventType::Takeaway => [
            Participant::new(raw.player, Role::PlayerId),
            empty,
            empty,
            empty,
        ],
        EventType::Stoppage
        | EventType::PeriodStart
        | EventType::PeriodEnd
        | EventType::DelayedPenalty
        | EventType::GameEnd
        | EventType::ShootoutComplete
        | EventType::FailedShot => [empty; 4],
        EventType::Other(token) => {
            if strict {
                return Err(PbpError::UnmappedEventType {
                    token: token.clone(),
                });
            }
            [empty; 4]
        }
    };
    Ok(slots)
}

/// Slots whose rule names a role but whose source id was null.
///
/// `EmptyNet` is a resolution, not a gap, and is never reported.
pub fn unresolved_slots(slots: &ParticipantSlots) -> Vec<(usize, ParticipantRole)> {
    slots
        .iter()
        .enumerate()
        .filter_map(|(idx, slot)| match (slot.id, slot.role) {
            (None, Some(role)) if role != ParticipantRole::EmptyNet => Some((idx, role)),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct AttributedEvents {
    pub events: Vec<Event>,
    pub issues: Vec<ReconcileIssue>,
}

/// Attribute every event, returning new events with their slots filled.
pub fn attribute_events(events: &[Event], strict: bool) -> Result<AttributedEvents, PbpError> {
    let mut issues = Vec::new();
    let mut attributed = Vec::with_capacity(events.len());
    for event in events {
        let slots = attribute(&event.event_type, &event.raw_participants, strict)?;
        for (idx, role) in unresolved_slots(&slots) {
            debug!(
                event_idx = event.event_idx,
                event_type = %event.event_type,
                slot = idx + 1,
                role = role.as_str(),
                "participant slot left null"
            );
            issues.push(
                ReconcileIssue::new(
                    IssueKind::UnresolvedAttribution,
                    format!(
                        "{} slot {} ({}) has no source id",
                        event.event_type,
                        idx + 1,
                        role
                    ),
                )
                .with_event_idx(event.event_idx),
            );
        }
        let mut next = event.clone();
        next.participants = slots;
        attributed.push(next);
    }
    Ok(AttributedEvents {
        events: attributed,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbp_model::PlayerId;

    fn all_ids() -> RawParticipants {
        let id = |n| Some(PlayerId::new(n));
        RawParticipants {
            winning: id(1),
            losing: id(2),
            hitting: id(3),
            hittee: id(4),
            scoring: id(5),
            shooting: id(6),
            goalie_in_net: id(7),
            blocking: id(8),
            committed_by: id(9),
            drawn_by: id(10),
            served_by: id(11),
            assist_1: id(12),
            assist_2: id(13),
            player: id(14),
        }
    }

    #[test]
    fn table_is_total_over_canonical_types() {
        for event_type in EventType::CANONICAL {
            assert!(
                attribute(&event_type, &all_ids(), true).is_ok(),
                "{event_type} has no rule"
            );
        }
    }

    #[test]
    fn unknown_type_fails_only_when_strict() {
        let other = EventType::Other("video-review".to_string());
        assert!(matches!(
            attribute(&other, &all_ids(), true),
            Err(PbpError::UnmappedEventType { .. })
        ));
        assert_eq!(
            attribute(&other, &all_ids(), false).unwrap(),
            [Participant::EMPTY; 4]
        );
    }

    #[test]
    fn unrelated_ids_never_leak_into_slots() {
        let slots = attribute(&EventType::Hit, &all_ids(), true).unwrap();
        assert_eq!(slots[0].id, Some(PlayerId::new(3)));
        assert_eq!(slots[1].id, Some(PlayerId::new(4)));
        assert_eq!(slots[2], Participant::EMPTY);
        assert_eq!(slots[3], Participant::EMPTY);
    }

    #[test]
    fn giveaway_uses_acting_player_only() {
        let slots = attribute(&EventType::Takeaway, &all_ids(), true).unwrap();
        assert_eq!(
            slots[0],
            Participant::new(Some(PlayerId::new(14)), ParticipantRole::PlayerId)
        );
        assert_eq!(slots[1..], [Participant::EMPTY; 3]);
    }
}
