use super::{CrudRepository, expect_affected, generated_id, row_or_not_found};
use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor::{self, Param};
use async_trait::async_trait;
use core_types::{StatDefinition, StatDefinitionFields, StatId};
use std::sync::Arc;

const LIST: &str = r#"
    SELECT IdEstadistica AS id, DescripcionEstadistica AS description, Valor AS value
    FROM Estadistica
    ORDER BY IdEstadistica
"#;

const GET: &str = r#"
    SELECT IdEstadistica AS id, DescripcionEstadistica AS description, Valor AS value
    FROM Estadistica
    WHERE IdEstadistica = $1
"#;

const INSERT: &str = "CALL EstadisticaInsert($1, $2, NULL)";
const UPDATE: &str =
    "UPDATE Estadistica SET DescripcionEstadistica = $1, Valor = $2 WHERE IdEstadistica = $3";
const DELETE: &str = "DELETE FROM Estadistica WHERE IdEstadistica = $1";

/// Statistic kinds (a basket, a free throw, ...) and the points each is worth.
#[derive(Debug, Clone)]
pub struct StatDefinitionRepo {
    provider: Arc<ConnectionProvider>,
}

impl StatDefinitionRepo {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CrudRepository for StatDefinitionRepo {
    type Id = StatId;
    type Fields = StatDefinitionFields;
    type Record = StatDefinition;

    const ENTITY: &'static str = "statistic";

    async fn list(&self) -> Result<Vec<StatDefinition>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let stats = sqlx::query_as::<_, StatDefinition>(LIST)
            .fetch_all(&mut *conn)
            .await?;
        Ok(stats)
    }

    async fn get(&self, id: &StatId) -> Result<StatDefinition, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let result = sqlx::query_as::<_, StatDefinition>(GET)
            .bind(id)
            .fetch_one(&mut *conn)
            .await;
        row_or_not_found(result, Self::ENTITY, id)
    }

    async fn insert(&self, fields: &StatDefinitionFields) -> Result<StatId, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[fields.description.trim().into(), fields.value.into()];
        let table = executor::fetch(&mut conn, INSERT, params).await?;
        let id = StatId::from_db(generated_id(&table, "EstadisticaInsert")?);
        tracing::info!(stat_id = %id, value = fields.value, "Statistic created.");
        Ok(id)
    }

    async fn update(&self, id: &StatId, fields: &StatDefinitionFields) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[
            fields.description.trim().into(),
            fields.value.into(),
            id.into(),
        ];
        let affected = executor::execute(&mut conn, UPDATE, params).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(stat_id = %id, "Statistic updated.");
        Ok(())
    }

    async fn delete(&self, id: &StatId) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let affected = executor::execute(&mut conn, DELETE, &[id.into()]).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(stat_id = %id, "Statistic deleted.");
        Ok(())
    }
}
