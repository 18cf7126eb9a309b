//! Fixtures shared by the database integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use core_types::{
    CityFields, CityId, GameFields, GameId, PlayerFields, PlayerId, StatDefinitionFields, StatId,
    TeamFields, TeamId,
};
use database::{ConnectionProvider, CrudRepository, DbRepository};
use sqlx::PgPool;
use sqlx::postgres::PgConnectOptions;
use std::sync::Arc;

/// A repository on its own connection to the test database behind `pool`.
pub fn repository(pool: &PgPool) -> DbRepository {
    let options = PgConnectOptions::clone(&pool.connect_options());
    DbRepository::new(Arc::new(ConnectionProvider::new(options)))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub async fn city(repo: &DbRepository, name: &str) -> anyhow::Result<CityId> {
    let fields = CityFields {
        name: name.to_string(),
    };
    Ok(repo.cities().insert(&fields).await?)
}

pub async fn stat(repo: &DbRepository, description: &str, value: i32) -> anyhow::Result<StatId> {
    let fields = StatDefinitionFields {
        description: description.to_string(),
        value,
    };
    Ok(repo.stats().insert(&fields).await?)
}

pub async fn team(repo: &DbRepository, name: &str, city_id: &CityId) -> anyhow::Result<TeamId> {
    let fields = TeamFields {
        name: name.to_string(),
        city_id: city_id.clone(),
    };
    Ok(repo.teams().insert(&fields).await?)
}

pub async fn player(
    repo: &DbRepository,
    name: &str,
    city_id: &CityId,
    team_id: &TeamId,
    number: i32,
) -> anyhow::Result<PlayerId> {
    let fields = PlayerFields {
        name: name.to_string(),
        city_id: city_id.clone(),
        birth_date: date(1999, 4, 2),
        jersey_number: number,
        team_id: team_id.clone(),
    };
    Ok(repo.players().insert(&fields).await?)
}

pub async fn game(repo: &DbRepository, home: &TeamId, away: &TeamId) -> anyhow::Result<GameId> {
    let fields = GameFields {
        team_a_id: home.clone(),
        team_b_id: away.clone(),
        played_at: at(2024, 5, 1, 18, 30),
    };
    Ok(repo.games().insert(&fields).await?)
}
