//! Situation code parsing.

use pbp_model::Situation;

/// Parse a 4-digit situation code: away empty net, away skaters, home
/// skaters, home empty net. Anything that is not exactly four ASCII digits
/// yields `None`.
pub fn parse_situation_code(code: &str) -> Option<Situation> {
    let bytes = code.trim().as_bytes();
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let digit = |idx: usize| bytes[idx] - b'0';
    Some(Situation {
        away_empty_net: digit(0),
        away_skaters: digit(1),
        home_skaters: digit(2),
        home_empty_net: digit(3),
    })
}

/// Forward-fill missing codes from the previous value in the same group.
///
/// `groups` and `codes` are parallel and already in timeline order; a group
/// change resets the carried value.
pub fn forward_fill_codes<G: PartialEq + Copy>(
    groups: &[G],
    codes: &mut [Option<String>],
) -> usize {
    let mut filled = 0;
    let mut carried: Option<(G, String)> = None;
    for (group, code) in groups.iter().zip(codes.iter_mut()) {
        match code {
            Some(value) => carried = Some((*group, value.clone())),
            None => {
                if let Some((carried_group, value)) = &carried
                    && carried_group == group
                {
                    *code = Some(value.clone());
                    filled += 1;
                }
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_power_play_code() {
        let situation = parse_situation_code("1451").unwrap();
        assert_eq!(situation.away_empty_net, 1);
        assert_eq!(situation.away_skaters, 4);
        assert_eq!(situation.home_skaters, 5);
        assert_eq!(situation.home_empty_net, 1);
        assert_eq!(situation.strength_state(), "5v4");
    }

    #[test]
    fn rejects_short_or_non_numeric_codes() {
        assert!(parse_situation_code("155").is_none());
        assert!(parse_situation_code("15a1").is_none());
        assert!(parse_situation_code("").is_none());
    }

    #[test]
    fn forward_fill_stops_at_group_boundary() {
        let groups = [1, 1, 1, 2, 2];
        let mut codes = vec![
            Some("1551".to_string()),
            None,
            Some("1451".to_string()),
            None,
            Some("1551".to_string()),
        ];
        let filled = forward_fill_codes(&groups, &mut codes);
        assert_eq!(filled, 1);
        assert_eq!(codes[1].as_deref(), Some("1551"));
        assert_eq!(codes[3], None);
    }
}
