#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::PbpError;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = PbpError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self).map_err(|_| {
                    PbpError::InvalidPayload(format!(
                        "{} is not a valid {}",
                        s,
                        stringify!($name)
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Upstream game identifier, e.g. `2023020001` (season, game type, number).
    GameId
);
numeric_id!(
    /// Upstream player identifier.
    PlayerId
);
numeric_id!(TeamId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: PlayerId = " 8471214 ".parse().unwrap();
        assert_eq!(id, PlayerId::new(8471214));
        assert_eq!(id.to_string(), "8471214");
        assert!("abc".parse::<TeamId>().is_err());
    }
}
