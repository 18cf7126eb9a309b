//! Per-entity data access plus the `DbRepository` facade that hands them out.

mod city;
mod game;
mod game_stat;
mod player;
mod stat;
mod team;

pub use city::CityRepo;
pub use game::GameRepo;
pub use game_stat::GameStatRepo;
pub use player::PlayerRepo;
pub use stat::StatDefinitionRepo;
pub use team::TeamRepo;

use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor::{Cell, Table};
use crate::report::{self, BoxScores, GameReport};
use async_trait::async_trait;
use core_types::GameId;
use std::fmt::Display;
use std::sync::Arc;

/// The uniform list / get / insert / update / delete contract shared by every
/// entity with a server-generated id.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Id: Send + Sync;
    type Fields: Send + Sync;
    type Record: Send;

    /// Singular entity name used in logs and `NotFound` errors.
    const ENTITY: &'static str;

    /// All rows, ordered by id ascending.
    async fn list(&self) -> Result<Vec<Self::Record>, DbError>;

    async fn get(&self, id: &Self::Id) -> Result<Self::Record, DbError>;

    /// Calls the entity's insert procedure and returns the id it generated.
    async fn insert(&self, fields: &Self::Fields) -> Result<Self::Id, DbError>;

    /// Overwrites every mutable field of the row.
    async fn update(&self, id: &Self::Id, fields: &Self::Fields) -> Result<(), DbError>;

    /// Removes the row. Rows that still reference it make the database refuse.
    async fn delete(&self, id: &Self::Id) -> Result<(), DbError>;
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the league database. It holds the shared connection provider and hands
/// out one repository per entity.
#[derive(Debug, Clone)]
pub struct DbRepository {
    provider: Arc<ConnectionProvider>,
}

impl DbRepository {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    pub fn cities(&self) -> CityRepo {
        CityRepo::new(self.provider.clone())
    }

    pub fn stats(&self) -> StatDefinitionRepo {
        StatDefinitionRepo::new(self.provider.clone())
    }

    pub fn teams(&self) -> TeamRepo {
        TeamRepo::new(self.provider.clone())
    }

    pub fn players(&self) -> PlayerRepo {
        PlayerRepo::new(self.provider.clone())
    }

    pub fn games(&self) -> GameRepo {
        GameRepo::new(self.provider.clone())
    }

    pub fn game_stats(&self) -> GameStatRepo {
        GameStatRepo::new(self.provider.clone())
    }

    /// Runs the box-score procedure for one game.
    pub async fn get_game_statistics(&self, game_id: &GameId) -> Result<BoxScores, DbError> {
        report::get_game_statistics(&self.provider, game_id).await
    }

    /// The game row, both team names and the box scores, ready to print.
    pub async fn game_report(&self, game_id: &GameId) -> Result<GameReport, DbError> {
        let game = self.games().get(game_id).await?;
        let home_team = self.teams().get(&game.team_a_id).await?.name;
        let away_team = self.teams().get(&game.team_b_id).await?.name;
        let scores = self.get_game_statistics(game_id).await?;

        Ok(GameReport {
            game,
            home_team,
            away_team,
            scores,
        })
    }
}

/// Reads the id an insert procedure handed back in its output parameter.
pub(crate) fn generated_id(table: &Table, procedure: &'static str) -> Result<String, DbError> {
    table
        .first_value()
        .and_then(Cell::as_text)
        .map(str::trim_end)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(DbError::MissingId(procedure))
}

/// Turns "no row matched" into `NotFound` for updates and deletes.
pub(crate) fn expect_affected(
    rows_affected: u64,
    entity: &'static str,
    id: &impl Display,
) -> Result<(), DbError> {
    if rows_affected == 0 {
        return Err(not_found(entity, id));
    }
    Ok(())
}

pub(crate) fn not_found(entity: &'static str, id: &impl Display) -> DbError {
    DbError::NotFound {
        entity,
        id: id.to_string(),
    }
}

/// Maps a missing single row to `NotFound`, leaving other errors classified as usual.
pub(crate) fn row_or_not_found<T>(
    result: Result<T, sqlx::Error>,
    entity: &'static str,
    id: &impl Display,
) -> Result<T, DbError> {
    result.map_err(|e| match e {
        sqlx::Error::RowNotFound => not_found(entity, id),
        other => other.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(value: Cell) -> Table {
        Table::from_rows(vec!["p_idjuego".to_string()], vec![vec![value]])
    }

    #[test]
    fn generated_id_is_trimmed_of_char_padding() {
        let id = generated_id(&output(Cell::Text("00042".to_string())), "JuegoInsert").unwrap();
        assert_eq!(id, "00042");

        let id = generated_id(&output(Cell::Text("07 ".to_string())), "EstadisticaInsert").unwrap();
        assert_eq!(id, "07");
    }

    #[test]
    fn missing_or_null_id_is_reported() {
        assert!(matches!(
            generated_id(&Table::default(), "CiudadInsert"),
            Err(DbError::MissingId("CiudadInsert"))
        ));
        assert!(matches!(
            generated_id(&output(Cell::Null), "CiudadInsert"),
            Err(DbError::MissingId(_))
        ));
        assert!(matches!(
            generated_id(&output(Cell::Text("   ".to_string())), "CiudadInsert"),
            Err(DbError::MissingId(_))
        ));
    }

    #[test]
    fn zero_rows_affected_is_not_found() {
        assert!(expect_affected(1, "team", &"001").is_ok());
        let err = expect_affected(0, "team", &"001").unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "team", ref id } if id == "001"));
        assert!(err.is_data_access());
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = row_or_not_found::<()>(Err(sqlx::Error::RowNotFound), "game", &"00001")
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "game", .. }));

        let err = row_or_not_found::<()>(Err(sqlx::Error::PoolClosed), "game", &"00001")
            .unwrap_err();
        assert!(err.is_connection());
    }
}
