//! Round trips through every repository against a throwaway database.
//!
//! Run with `cargo test -p database -- --ignored` and `DATABASE_URL` set.

mod common;

use anyhow::Result;
use common::{at, date};
use core_types::{
    CityFields, GameFields, GameStatEntry, PlayerFields, StatDefinitionFields, TeamFields,
};
use database::{CrudRepository, DbError};
use sqlx::PgPool;
use std::collections::HashSet;

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn city_round_trip_leaves_the_set_unchanged(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let cities = repo.cities();
    common::city(&repo, "Monterrey").await?;
    let before = cities.list().await?;

    let id = cities
        .insert(&CityFields {
            name: "  Saltillo ".to_string(),
        })
        .await?;
    let listed = cities.list().await?;
    assert_eq!(listed.len(), before.len() + 1);
    assert!(before.iter().all(|c| c.id != id));
    let inserted = listed.iter().find(|c| c.id == id).unwrap();
    assert_eq!(inserted.name, "Saltillo");

    cities
        .update(
            &id,
            &CityFields {
                name: "Torreón".to_string(),
            },
        )
        .await?;
    assert_eq!(cities.get(&id).await?.name, "Torreón");

    cities.delete(&id).await?;
    assert_eq!(cities.list().await?, before);

    let err = cities.delete(&id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "city", .. }));
    assert!(err.is_data_access());
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn generated_ids_are_distinct_and_fixed_width(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let mut seen = HashSet::new();
    for name in ["Monterrey", "Saltillo", "Monclova", "Torreón"] {
        let id = common::city(&repo, name).await?;
        assert_eq!(id.as_str().len(), 3);
        assert!(seen.insert(id));
    }

    let stat = common::stat(&repo, "Canasta", 2).await?;
    assert_eq!(stat.as_str().len(), 2);
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn statistic_update_and_delete(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let stats = repo.stats();

    let id = common::stat(&repo, "Tiro libre", 1).await?;
    stats
        .update(
            &id,
            &StatDefinitionFields {
                description: "Triple".to_string(),
                value: 3,
            },
        )
        .await?;
    let updated = stats.get(&id).await?;
    assert_eq!(updated.description, "Triple");
    assert_eq!(updated.value, 3);

    stats.delete(&id).await?;
    assert!(stats.list().await?.is_empty());
    assert!(matches!(
        stats.get(&id).await,
        Err(DbError::NotFound { entity: "statistic", .. })
    ));
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn teams_are_listed_with_their_city(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let mty = common::city(&repo, "Monterrey").await?;
    let slw = common::city(&repo, "Saltillo").await?;
    let id = common::team(&repo, "Halcones", &mty).await?;

    let listed = repo.teams().list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].city_id, mty);
    assert_eq!(listed[0].city, "Monterrey");

    repo.teams()
        .update(
            &id,
            &TeamFields {
                name: "Halcones Rojos".to_string(),
                city_id: slw.clone(),
            },
        )
        .await?;
    let team = repo.teams().get(&id).await?;
    assert_eq!(team.name, "Halcones Rojos");
    assert_eq!(team.city_id, slw);
    assert_eq!(team.city, "Saltillo");
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn referenced_rows_cannot_be_deleted(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let mty = common::city(&repo, "Monterrey").await?;
    common::team(&repo, "Halcones", &mty).await?;

    let err = repo.cities().delete(&mty).await.unwrap_err();
    assert!(matches!(err, DbError::DataAccessError(_)));
    assert_eq!(repo.cities().list().await?.len(), 1);
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn players_round_trip_and_filter_by_team(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let mty = common::city(&repo, "Monterrey").await?;
    let home = common::team(&repo, "Halcones", &mty).await?;
    let away = common::team(&repo, "Toros", &mty).await?;
    let ana = common::player(&repo, "Ana", &mty, &home, 7).await?;
    let eva = common::player(&repo, "Eva", &mty, &away, 11).await?;

    let roster = repo.players().list_by_team(&home).await?;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, ana);
    assert_eq!(roster[0].team, "Halcones");
    assert_eq!(roster[0].city, "Monterrey");

    let fields = PlayerFields {
        name: "Eva Ruiz".to_string(),
        city_id: mty.clone(),
        birth_date: date(2001, 12, 24),
        jersey_number: 23,
        team_id: home.clone(),
    };
    repo.players().update(&eva, &fields).await?;
    let moved = repo.players().get(&eva).await?;
    assert_eq!(moved.name, "Eva Ruiz");
    assert_eq!(moved.birth_date, date(2001, 12, 24));
    assert_eq!(moved.jersey_number, 23);
    assert_eq!(moved.team_id, home);
    assert!(repo.players().list_by_team(&away).await?.is_empty());

    repo.players().delete(&eva).await?;
    let remaining: Vec<_> = repo.players().list().await?.into_iter().map(|p| p.id).collect();
    assert_eq!(remaining, vec![ana]);
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn game_description_follows_its_teams(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let mty = common::city(&repo, "Monterrey").await?;
    let halcones = common::team(&repo, "Halcones", &mty).await?;
    let toros = common::team(&repo, "Toros", &mty).await?;
    let leones = common::team(&repo, "Leones", &mty).await?;

    let id = common::game(&repo, &halcones, &toros).await?;
    let game = repo.games().get(&id).await?;
    assert_eq!(game.description, "Halcones vs Toros");
    assert_eq!(game.played_at, at(2024, 5, 1, 18, 30));

    repo.games()
        .update(
            &id,
            &GameFields {
                team_a_id: leones.clone(),
                team_b_id: halcones.clone(),
                played_at: at(2024, 6, 2, 20, 0),
            },
        )
        .await?;
    let game = repo.games().get(&id).await?;
    assert_eq!(game.description, "Leones vs Halcones");
    assert_eq!(game.team_a_id, leones);
    assert_eq!(game.team_b_id, halcones);
    assert_eq!(game.played_at, at(2024, 6, 2, 20, 0));

    repo.games().delete(&id).await?;
    assert!(repo.games().list().await?.is_empty());
    assert!(repo.games().delete(&id).await.unwrap_err().is_data_access());
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn game_stats_are_appended_and_listed_per_game(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    let mty = common::city(&repo, "Monterrey").await?;
    let home = common::team(&repo, "Halcones", &mty).await?;
    let away = common::team(&repo, "Toros", &mty).await?;
    let ana = common::player(&repo, "Ana", &mty, &home, 7).await?;
    let canasta = common::stat(&repo, "Canasta", 2).await?;
    let triple = common::stat(&repo, "Triple", 3).await?;
    let game = common::game(&repo, &home, &away).await?;

    for (stat, quantity) in [(&triple, 2), (&canasta, 5)] {
        repo.game_stats()
            .insert(&GameStatEntry {
                game_id: game.clone(),
                stat_id: stat.clone(),
                player_id: ana.clone(),
                quantity,
            })
            .await?;
    }

    let recorded = repo.game_stats().list_for_game(&game).await?;
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].stat_id, canasta);
    assert_eq!(recorded[0].stat, "Canasta");
    assert_eq!(recorded[0].quantity, 5);
    assert_eq!(recorded[1].stat_id, triple);
    assert_eq!(recorded[1].player, "Ana");

    let unknown_player = GameStatEntry {
        game_id: game.clone(),
        stat_id: canasta.clone(),
        player_id: "99999".parse()?,
        quantity: 1,
    };
    let err = repo.game_stats().insert(&unknown_player).await.unwrap_err();
    assert!(matches!(err, DbError::DataAccessError(_)));
    Ok(())
}

#[sqlx::test(migrations = "tests/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn fetch_returns_named_columns_in_server_order(pool: PgPool) -> Result<()> {
    let repo = common::repository(&pool);
    common::city(&repo, "Monterrey").await?;
    common::city(&repo, "Saltillo").await?;

    let mut conn = pool.acquire().await?;
    let table = database::fetch(
        &mut conn,
        "SELECT IdCiudad, NomCiudad FROM Ciudad WHERE NomCiudad <> $1 ORDER BY IdCiudad DESC",
        &["Nadie".into()],
    )
    .await?;

    assert_eq!(table.columns(), ["idciudad", "nomciudad"]);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.value(0, "NomCiudad").and_then(database::Cell::as_text),
        Some("Saltillo")
    );

    let affected = database::execute(
        &mut conn,
        "UPDATE Ciudad SET NomCiudad = $1 WHERE IdCiudad = $2",
        &["Monterrey NL".into(), "001".into()],
    )
    .await?;
    assert_eq!(affected, 1);
    Ok(())
}
