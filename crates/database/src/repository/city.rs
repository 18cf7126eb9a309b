use super::{CrudRepository, expect_affected, generated_id, row_or_not_found};
use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor;
use async_trait::async_trait;
use core_types::{City, CityFields, CityId};
use std::sync::Arc;

const LIST: &str = r#"
    SELECT IdCiudad AS id, NomCiudad AS name
    FROM Ciudad
    ORDER BY IdCiudad
"#;

const GET: &str = r#"
    SELECT IdCiudad AS id, NomCiudad AS name
    FROM Ciudad
    WHERE IdCiudad = $1
"#;

const INSERT: &str = "CALL CiudadInsert($1, NULL)";
const UPDATE: &str = "UPDATE Ciudad SET NomCiudad = $1 WHERE IdCiudad = $2";
const DELETE: &str = "DELETE FROM Ciudad WHERE IdCiudad = $1";

#[derive(Debug, Clone)]
pub struct CityRepo {
    provider: Arc<ConnectionProvider>,
}

impl CityRepo {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CrudRepository for CityRepo {
    type Id = CityId;
    type Fields = CityFields;
    type Record = City;

    const ENTITY: &'static str = "city";

    async fn list(&self) -> Result<Vec<City>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let cities = sqlx::query_as::<_, City>(LIST)
            .fetch_all(&mut *conn)
            .await?;
        Ok(cities)
    }

    async fn get(&self, id: &CityId) -> Result<City, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let result = sqlx::query_as::<_, City>(GET)
            .bind(id)
            .fetch_one(&mut *conn)
            .await;
        row_or_not_found(result, Self::ENTITY, id)
    }

    async fn insert(&self, fields: &CityFields) -> Result<CityId, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let table = executor::fetch(&mut conn, INSERT, &[fields.name.trim().into()]).await?;
        let id = CityId::from_db(generated_id(&table, "CiudadInsert")?);
        tracing::info!(city_id = %id, "City created.");
        Ok(id)
    }

    async fn update(&self, id: &CityId, fields: &CityFields) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let affected =
            executor::execute(&mut conn, UPDATE, &[fields.name.trim().into(), id.into()]).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(city_id = %id, "City updated.");
        Ok(())
    }

    async fn delete(&self, id: &CityId) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let affected = executor::execute(&mut conn, DELETE, &[id.into()]).await?;
        expect_affected(affected, Self::ENTITY, id)?;
        tracing::info!(city_id = %id, "City deleted.");
        Ok(())
    }
}
