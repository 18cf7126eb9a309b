use crate::error::CoreError;
use crate::ids::{CityId, GameId, PlayerId, StatId, TeamId};
use crate::validation::{check_date, check_name, check_non_negative};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Records, as listed by the repositories
// ==============================================================================

/// A row of `Ciudad`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

/// A row of `Estadistica`: a kind of play and the points it is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StatDefinition {
    pub id: StatId,
    pub description: String,
    pub value: i32,
}

/// A row of `Equipo` joined with its city's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub city_id: CityId,
    #[sqlx(rename = "Ciudad")]
    pub city: String,
}

/// A row of `Jugador` joined with its city's and team's names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub city_id: CityId,
    #[sqlx(rename = "Ciudad")]
    pub city: String,
    pub birth_date: NaiveDate,
    pub jersey_number: i32,
    pub team_id: TeamId,
    #[sqlx(rename = "Equipo")]
    pub team: String,
}

/// A row of `Juego`. The description is maintained by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: GameId,
    pub description: String,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub played_at: NaiveDateTime,
}

/// A recorded statistic, joined with the statistic's description and the player's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GameStat {
    pub game_id: GameId,
    pub stat_id: StatId,
    #[sqlx(rename = "Estadistica")]
    pub stat: String,
    pub player_id: PlayerId,
    #[sqlx(rename = "Jugador")]
    pub player: String,
    pub quantity: i32,
}

// ==============================================================================
// Field sets, as supplied to insert and update
// ==============================================================================
// Updates always carry the full set; there is no partial update.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityFields {
    pub name: String,
}

impl CityFields {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_name("city name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDefinitionFields {
    pub description: String,
    pub value: i32,
}

impl StatDefinitionFields {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_name("statistic description", &self.description)?;
        check_non_negative("statistic value", self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFields {
    pub name: String,
    pub city_id: CityId,
}

impl TeamFields {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_name("team name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFields {
    pub name: String,
    pub city_id: CityId,
    pub birth_date: NaiveDate,
    pub jersey_number: i32,
    pub team_id: TeamId,
}

impl PlayerFields {
    pub fn validate(&self, today: NaiveDate) -> Result<(), CoreError> {
        check_name("player name", &self.name)?;
        check_date("birth date", self.birth_date, today)?;
        check_non_negative("jersey number", self.jersey_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFields {
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub played_at: NaiveDateTime,
}

impl GameFields {
    pub fn validate(&self, today: NaiveDate) -> Result<(), CoreError> {
        check_date("game date", self.played_at.date(), today)
    }
}

/// One recorded quantity of a statistic for a player in a game. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatEntry {
    pub game_id: GameId,
    pub stat_id: StatId,
    pub player_id: PlayerId,
    pub quantity: i32,
}

impl GameStatEntry {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_non_negative("recorded quantity", self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn player() -> PlayerFields {
        PlayerFields {
            name: "Ana Gómez".to_string(),
            city_id: "001".parse().unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1998, 3, 14).unwrap(),
            jersey_number: 7,
            team_id: "002".parse().unwrap(),
        }
    }

    #[test]
    fn valid_player_passes() {
        assert!(player().validate(today()).is_ok());
    }

    #[test]
    fn player_checks_each_field() {
        let mut p = player();
        p.jersey_number = -3;
        assert!(matches!(
            p.validate(today()),
            Err(CoreError::InvalidInput("jersey number", _))
        ));

        let mut p = player();
        p.birth_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(matches!(
            p.validate(today()),
            Err(CoreError::InvalidInput("birth date", _))
        ));

        let mut p = player();
        p.name = " ".to_string();
        assert!(matches!(
            p.validate(today()),
            Err(CoreError::InvalidInput("player name", _))
        ));
    }

    #[test]
    fn statistic_value_must_not_be_negative() {
        let fields = StatDefinitionFields {
            description: "Triple".to_string(),
            value: -1,
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn game_date_is_bounded() {
        let fields = GameFields {
            team_a_id: "001".parse().unwrap(),
            team_b_id: "002".parse().unwrap(),
            played_at: NaiveDate::from_ymd_opt(1899, 5, 1)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
        };
        assert!(fields.validate(today()).is_err());
    }

    #[test]
    fn records_serialize_ids_as_plain_strings() {
        let city = City {
            id: "014".parse().unwrap(),
            name: "Monterrey".to_string(),
        };
        let json = serde_json::to_string(&city).unwrap();
        assert_eq!(json, r#"{"id":"014","name":"Monterrey"}"#);
    }
}

