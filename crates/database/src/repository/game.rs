use super::{CrudRepository, expect_affected, generated_id, row_or_not_found};
use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor::{self, Param};
use async_trait::async_trait;
use core_types::{Game, GameFields, GameId};
use std::sync::Arc;

const LIST: &str = r#"
    SELECT IdJuego AS id, DescripcionJuego AS description,
           IdEquipoA AS team_a_id, IdEquipoB AS team_b_id, FechaYHoraJuego AS played_at
    FROM Juego
    ORDER BY IdJuego
"#;

const GET: &str = r#"
    SELECT IdJuego AS id, DescripcionJuego AS description,
           IdEquipoA AS team_a_id, IdEquipoB AS team_b_id, FechaYHoraJuego AS played_at
    FROM Juego
    WHERE IdJuego = $1
"#;

const INSERT: &str = "CALL JuegoInsert($1, $2, $3, NULL)";

// The description follows the teams in the same statement.
const UPDATE: &str = r#"
    UPDATE Juego
    SET IdEquipoA = $1,
        IdEquipoB = $2,
        FechaYHoraJuego = $3,
        DescripcionJuego = (
            SELECT rtrim(a.NomEquipo) || ' vs ' || rtrim(b.NomEquipo)
            FROM Equipo a
            JOIN Equipo b ON a.IdEquipo = $1 AND b.IdEquipo = $2
        )
    WHERE IdJuego = $4
"#;

const DELETE: &str = "DELETE FROM Juego WHERE IdJuego = $1";

/// Games between a home team (A) and an away team (B).
#[derive(Debug, Clone)]
pub struct GameRepo {
    provider: Arc<ConnectionProvider>,
}

impl GameRepo {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CrudRepository for GameRepo {
    type Id = GameId;
    type Fields = GameFields;
    type Record = Game;

    const ENTITY: &'static str = "game";

    async fn list(&self) -> Result<Vec<Game>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let games = sqlx::query_as::<_, Game>(LIST)
            .fetch_all(&mut *conn)
            .await?;
        Ok(games)
    }

    async fn get(&self, id: &GameId) -> Result<Game, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let result = sqlx::query_as::<_, Game>(GET)
            .bind(id)
            .fetch_one(&mut *conn)
            .await;
        row_or_not_found(result, Self::ENTITY, id)
    }

    async fn insert(&self, fields: &GameFields) -> Result<GameId, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[
            (&fields.team_a_id).into(),
            (&fields.team_b_id).into(),
            fields.played_at.into(),
        ];
        let table = executor::fetch(&mut conn, INSERT, params).await?;
        let id = GameId::from_db(generated_id(&table, "JuegoInsert")?);
        tracing::info!(
            game_id = %id,
            home = %fields.team_a_id,
            away = %fields.team_b_id,
            "Game created."
        );
        Ok(id)
    }

    async fn update(&self, id: &GameId, fields: &GameFields) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[
            (&fields.team_a_id).into(),
            (&fields.team_b_id).into(),
            fields.played_at.into(),
            id.into(),
        ];
        let affected = executor::execute(&mut conn, UPDATE, params).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(game_id = %id, "Game updated.");
        Ok(())
    }

    async fn delete(&self, id: &GameId) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let affected = executor::execute(&mut conn, DELETE, &[id.into()]).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(game_id = %id, "Game deleted.");
        Ok(())
    }
}
