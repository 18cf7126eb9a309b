//! Fixed-width primary key codes.
//!
//! Every id is minted by a stored procedure on the server. The client only
//! ever reads them back from a result set or accepts them from an operator
//! who picked one out of a listing, so the types here carry no generator.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! fixed_code {
    ($(#[$meta:meta])* $name:ident, width = $width:expr, entity = $entity:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(String);

        impl $name {
            /// Number of characters in the code, matching the `CHAR(n)` column.
            pub const WIDTH: usize = $width;

            /// Wraps a code exactly as the database returned it, minus `CHAR` padding.
            pub fn from_db(code: impl AsRef<str>) -> Self {
                Self(code.as_ref().trim_end().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let code = s.trim();
                if code.chars().count() != Self::WIDTH {
                    return Err(CoreError::InvalidId {
                        entity: $entity,
                        width: Self::WIDTH,
                        value: s.to_string(),
                    });
                }
                Ok(Self(code.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

fixed_code!(
    /// Primary key of `Ciudad`.
    CityId, width = 3, entity = "city"
);
fixed_code!(
    /// Primary key of `Estadistica`.
    StatId, width = 2, entity = "statistic"
);
fixed_code!(
    /// Primary key of `Equipo`.
    TeamId, width = 3, entity = "team"
);
fixed_code!(
    /// Primary key of `Jugador`.
    PlayerId, width = 5, entity = "player"
);
fixed_code!(
    /// Primary key of `Juego`.
    GameId, width = 5, entity = "game"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_of_the_declared_width() {
        let city: CityId = " 007 ".parse().unwrap();
        assert_eq!(city.as_str(), "007");

        let player: PlayerId = "00042".parse().unwrap();
        assert_eq!(player.to_string(), "00042");
    }

    #[test]
    fn rejects_codes_of_the_wrong_width() {
        let err = "1234".parse::<TeamId>().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidId {
                entity: "team",
                width: 3,
                value: "1234".to_string(),
            }
        );
        assert!("".parse::<StatId>().is_err());
        assert!("123456".parse::<GameId>().is_err());
    }

    #[test]
    fn from_db_strips_char_padding() {
        assert_eq!(StatId::from_db("7 ").as_str(), "7");
        assert_eq!(GameId::from_db("00001").as_str(), "00001");
    }
}
