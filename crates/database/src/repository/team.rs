use super::{CrudRepository, expect_affected, generated_id, row_or_not_found};
use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor::{self, Param};
use async_trait::async_trait;
use core_types::{Team, TeamFields, TeamId};
use std::sync::Arc;

const LIST: &str = r#"
    SELECT e.IdEquipo AS id, e.NomEquipo AS name, e.IdCiudad AS city_id, c.NomCiudad AS "Ciudad"
    FROM Equipo e
    JOIN Ciudad c ON c.IdCiudad = e.IdCiudad
    ORDER BY e.IdEquipo
"#;

const GET: &str = r#"
    SELECT e.IdEquipo AS id, e.NomEquipo AS name, e.IdCiudad AS city_id, c.NomCiudad AS "Ciudad"
    FROM Equipo e
    JOIN Ciudad c ON c.IdCiudad = e.IdCiudad
    WHERE e.IdEquipo = $1
"#;

const INSERT: &str = "CALL EquipoInsert($1, $2, NULL)";
const UPDATE: &str = "UPDATE Equipo SET NomEquipo = $1, IdCiudad = $2 WHERE IdEquipo = $3";
const DELETE: &str = "DELETE FROM Equipo WHERE IdEquipo = $1";

#[derive(Debug, Clone)]
pub struct TeamRepo {
    provider: Arc<ConnectionProvider>,
}

impl TeamRepo {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CrudRepository for TeamRepo {
    type Id = TeamId;
    type Fields = TeamFields;
    type Record = Team;

    const ENTITY: &'static str = "team";

    /// Teams with their city's name alongside the city id.
    async fn list(&self) -> Result<Vec<Team>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let teams = sqlx::query_as::<_, Team>(LIST)
            .fetch_all(&mut *conn)
            .await?;
        Ok(teams)
    }

    async fn get(&self, id: &TeamId) -> Result<Team, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let result = sqlx::query_as::<_, Team>(GET)
            .bind(id)
            .fetch_one(&mut *conn)
            .await;
        row_or_not_found(result, Self::ENTITY, id)
    }

    async fn insert(&self, fields: &TeamFields) -> Result<TeamId, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[fields.name.trim().into(), (&fields.city_id).into()];
        let table = executor::fetch(&mut conn, INSERT, params).await?;
        let id = TeamId::from_db(generated_id(&table, "EquipoInsert")?);
        tracing::info!(team_id = %id, city_id = %fields.city_id, "Team created.");
        Ok(id)
    }

    async fn update(&self, id: &TeamId, fields: &TeamFields) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[
            fields.name.trim().into(),
            (&fields.city_id).into(),
            id.into(),
        ];
        let affected = executor::execute(&mut conn, UPDATE, params).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(team_id = %id, "Team updated.");
        Ok(())
    }

    async fn delete(&self, id: &TeamId) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let affected = executor::execute(&mut conn, DELETE, &[id.into()]).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(team_id = %id, "Team deleted.");
        Ok(())
    }
}
