//! Clock parsing and derived time measures.

use pbp_model::{GameClock, PbpError, ReconcileOptions, SeasonType};

/// Parse an `MM:SS` or `M:SS` clock string into whole seconds.
///
/// The string must split on `:` into exactly two all-digit components.
pub fn parse_clock(value: &str) -> Result<i32, PbpError> {
    let malformed = || PbpError::MalformedDuration {
        value: value.to_string(),
    };
    let mut parts = value.trim().split(':');
    let (Some(minutes), Some(seconds), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let numeric = |part: &str| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            None
        } else {
            part.parse::<i32>().ok()
        }
    };
    match (numeric(minutes), numeric(seconds)) {
        (Some(minutes), Some(seconds)) => minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(malformed),
        _ => Err(malformed()),
    }
}

/// Length of the given period in seconds.
///
/// Regulation periods use the regulation length; overtime periods use the
/// season-type-specific overtime length.
pub fn period_length(period: i32, season_type: SeasonType, options: &ReconcileOptions) -> i32 {
    if options.is_overtime(period) {
        options.overtime_seconds(season_type)
    } else {
        options.regulation_period_seconds
    }
}

/// Seconds elapsed in the game at the start of `period`.
pub fn period_offset(period: i32, options: &ReconcileOptions) -> i32 {
    (period - 1).max(0) * options.regulation_period_seconds
}

/// Derive all clock measures from a period and the seconds elapsed in it.
///
/// In regulation, game seconds remaining counts the rest of regulation. In
/// overtime it counts down the overtime period alone and never goes negative.
pub fn derive_clock(
    period: i32,
    period_seconds: i32,
    season_type: SeasonType,
    options: &ReconcileOptions,
) -> GameClock {
    let length = period_length(period, season_type, options);
    let period_seconds_remaining = (length - period_seconds).max(0);
    let game_seconds_remaining = if options.is_overtime(period) {
        period_seconds_remaining
    } else {
        (options.regulation_periods - period) * options.regulation_period_seconds
            + (options.regulation_period_seconds - period_seconds)
    };
    GameClock {
        period_seconds,
        period_seconds_remaining,
        game_seconds: period_seconds + period_offset(period, options),
        game_seconds_remaining,
    }
}
