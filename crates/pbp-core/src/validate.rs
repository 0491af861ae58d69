//! Event ordering checks.

use pbp_model::{Event, PbpError};

/// Check that event indices strictly increase within each `(game, period)`.
///
/// Events are expected in `(game, period, event index)` order, which is how
/// the semantics mapper emits them. The first repeated or decreasing index is
/// reported.
pub fn validate_event_order(events: &[Event]) -> Result<(), PbpError> {
    for pair in events.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.game_id == next.game_id
            && prev.period == next.period
            && next.event_idx <= prev.event_idx
        {
            return Err(PbpError::EventOrderViolation {
                game_id: next.game_id.get(),
                period: next.period,
                event_idx: next.event_idx,
            });
        }
    }
    Ok(())
}
