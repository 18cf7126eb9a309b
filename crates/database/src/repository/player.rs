use super::{CrudRepository, expect_affected, generated_id, row_or_not_found};
use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor::{self, Param};
use async_trait::async_trait;
use core_types::{Player, PlayerFields, PlayerId, TeamId};
use std::sync::Arc;

/// Players joined with their city's and team's names; callers append the filter and order.
macro_rules! select_players {
    ($tail:literal) => {
        concat!(
            r#"
    SELECT j.IdJugador AS id, j.NomJugador AS name,
           j.IdCiudad AS city_id, c.NomCiudad AS "Ciudad",
           j.FechaNacimiento AS birth_date, j.NumJugador AS jersey_number,
           j.IdEquipo AS team_id, e.NomEquipo AS "Equipo"
    FROM Jugador j
    JOIN Ciudad c ON c.IdCiudad = j.IdCiudad
    JOIN Equipo e ON e.IdEquipo = j.IdEquipo
    "#,
            $tail
        )
    };
}

const LIST: &str = select_players!("ORDER BY j.IdJugador");
const LIST_BY_TEAM: &str = select_players!("WHERE j.IdEquipo = $1 ORDER BY j.IdJugador");
const GET: &str = select_players!("WHERE j.IdJugador = $1");

const INSERT: &str = "CALL JugadorInsert($1, $2, $3, $4, $5, NULL)";
const UPDATE: &str = r#"
    UPDATE Jugador
    SET NomJugador = $1, IdCiudad = $2, FechaNacimiento = $3, NumJugador = $4, IdEquipo = $5
    WHERE IdJugador = $6
"#;
const DELETE: &str = "DELETE FROM Jugador WHERE IdJugador = $1";

#[derive(Debug, Clone)]
pub struct PlayerRepo {
    provider: Arc<ConnectionProvider>,
}

impl PlayerRepo {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// The roster of one team, ordered by player id.
    pub async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Player>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let players = sqlx::query_as::<_, Player>(LIST_BY_TEAM)
            .bind(team_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(players)
    }
}

fn field_params(fields: &PlayerFields) -> Vec<Param> {
    vec![
        fields.name.trim().into(),
        (&fields.city_id).into(),
        fields.birth_date.into(),
        fields.jersey_number.into(),
        (&fields.team_id).into(),
    ]
}

#[async_trait]
impl CrudRepository for PlayerRepo {
    type Id = PlayerId;
    type Fields = PlayerFields;
    type Record = Player;

    const ENTITY: &'static str = "player";

    async fn list(&self) -> Result<Vec<Player>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let players = sqlx::query_as::<_, Player>(LIST)
            .fetch_all(&mut *conn)
            .await?;
        Ok(players)
    }

    async fn get(&self, id: &PlayerId) -> Result<Player, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let result = sqlx::query_as::<_, Player>(GET)
            .bind(id)
            .fetch_one(&mut *conn)
            .await;
        row_or_not_found(result, Self::ENTITY, id)
    }

    async fn insert(&self, fields: &PlayerFields) -> Result<PlayerId, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let table = executor::fetch(&mut conn, INSERT, &field_params(fields)).await?;
        let id = PlayerId::from_db(generated_id(&table, "JugadorInsert")?);
        tracing::info!(player_id = %id, team_id = %fields.team_id, "Player created.");
        Ok(id)
    }

    async fn update(&self, id: &PlayerId, fields: &PlayerFields) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let mut params = field_params(fields);
        params.push(id.into());
        let affected = executor::execute(&mut conn, UPDATE, &params).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(player_id = %id, "Player updated.");
        Ok(())
    }

    async fn delete(&self, id: &PlayerId) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let affected = executor::execute(&mut conn, DELETE, &[id.into()]).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(player_id = %id, "Player deleted.");
        Ok(())
    }
}
