mod cli;
mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{
    CityCommand, Cli, Commands, GameArgs, GameCommand, GameStatCommand, PlayerArgs,
    PlayerCommand, StatCommand, TeamCommand,
};
use configuration::Settings;
use core_types::{
    CityFields, GameFields, GameId, GameStatEntry, PlayerFields, StatDefinitionFields, TeamFields,
};
use database::{ConnectionProvider, CrudRepository, DbRepository};
use render::{Output, Tabular};
use std::fmt::Display;
use std::process::ExitCode;
use std::sync::Arc;

/// The main entry point for the league command-line tool.
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments first so --help works without configuration.
    let cli = Cli::parse();

    let settings = match configuration::load_config().context("Failed to load configuration") {
        Ok(settings) => settings,
        Err(e) => return fail(&e),
    };
    // Held until exit so the file writer flushes.
    let _log_guard = match configuration::init_tracing(&settings.logging)
        .context("Failed to initialise logging")
    {
        Ok(guard) => guard,
        Err(e) => return fail(&e),
    };

    match run(cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e:#}");
            fail(&e)
        }
    }
}

fn fail(error: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {error:#}");
    ExitCode::FAILURE
}

async fn run(cli: Cli, settings: &Settings) -> Result<()> {
    let provider = ConnectionProvider::from_settings(&settings.database)?;
    let repo = DbRepository::new(Arc::new(provider));
    let out = Output::new(cli.json);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::City(command) => handle_city(command, &repo, out).await,
        Commands::Stat(command) => handle_stat(command, &repo, out).await,
        Commands::Team(command) => handle_team(command, &repo, out).await,
        Commands::Player(command) => handle_player(command, &repo, out, today).await,
        Commands::Game(command) => handle_game(command, &repo, out, today).await,
        Commands::GameStat(command) => handle_game_stat(command, &repo, out).await,
        Commands::Report { game } => handle_report(&game, &repo, out).await,
    }
}

// ==============================================================================
// Entity Commands
// ==============================================================================
// Field sets are validated here, before any database call.

async fn handle_city(command: CityCommand, repo: &DbRepository, out: Output) -> Result<()> {
    let cities = repo.cities();
    match command {
        CityCommand::List => list(&cities, out).await,
        CityCommand::Show { id } => show(&cities, &id, out).await,
        CityCommand::Add { name } => {
            let fields = CityFields { name };
            fields.validate()?;
            create(&cities, &fields, out).await
        }
        CityCommand::Update { id, name } => {
            let fields = CityFields { name };
            fields.validate()?;
            update(&cities, &id, &fields, out).await
        }
        CityCommand::Delete { id } => remove(&cities, &id, out).await,
    }
}

async fn handle_stat(command: StatCommand, repo: &DbRepository, out: Output) -> Result<()> {
    let stats = repo.stats();
    match command {
        StatCommand::List => list(&stats, out).await,
        StatCommand::Show { id } => show(&stats, &id, out).await,
        StatCommand::Add { description, value } => {
            let fields = StatDefinitionFields { description, value };
            fields.validate()?;
            create(&stats, &fields, out).await
        }
        StatCommand::Update {
            id,
            description,
            value,
        } => {
            let fields = StatDefinitionFields { description, value };
            fields.validate()?;
            update(&stats, &id, &fields, out).await
        }
        StatCommand::Delete { id } => remove(&stats, &id, out).await,
    }
}

async fn handle_team(command: TeamCommand, repo: &DbRepository, out: Output) -> Result<()> {
    let teams = repo.teams();
    match command {
        TeamCommand::List => list(&teams, out).await,
        TeamCommand::Show { id } => show(&teams, &id, out).await,
        TeamCommand::Add { name, city } => {
            let fields = TeamFields {
                name,
                city_id: city,
            };
            fields.validate()?;
            create(&teams, &fields, out).await
        }
        TeamCommand::Update { id, name, city } => {
            let fields = TeamFields {
                name,
                city_id: city,
            };
            fields.validate()?;
            update(&teams, &id, &fields, out).await
        }
        TeamCommand::Delete { id } => remove(&teams, &id, out).await,
    }
}

async fn handle_player(
    command: PlayerCommand,
    repo: &DbRepository,
    out: Output,
    today: NaiveDate,
) -> Result<()> {
    let players = repo.players();
    match command {
        PlayerCommand::List { team: None } => list(&players, out).await,
        PlayerCommand::List { team: Some(team) } => {
            let roster = players
                .list_by_team(&team)
                .await
                .with_context(|| format!("Failed to list the players of team {team}"))?;
            out.records(&roster)
        }
        PlayerCommand::Show { id } => show(&players, &id, out).await,
        PlayerCommand::Add(args) => {
            let fields = player_fields(args);
            fields.validate(today)?;
            create(&players, &fields, out).await
        }
        PlayerCommand::Update { id, fields } => {
            let fields = player_fields(fields);
            fields.validate(today)?;
            update(&players, &id, &fields, out).await
        }
        PlayerCommand::Delete { id } => remove(&players, &id, out).await,
    }
}

fn player_fields(args: PlayerArgs) -> PlayerFields {
    PlayerFields {
        name: args.name,
        city_id: args.city,
        birth_date: args.birth_date,
        jersey_number: args.number,
        team_id: args.team,
    }
}

async fn handle_game(
    command: GameCommand,
    repo: &DbRepository,
    out: Output,
    today: NaiveDate,
) -> Result<()> {
    let games = repo.games();
    match command {
        GameCommand::List => list(&games, out).await,
        GameCommand::Show { id } => show(&games, &id, out).await,
        GameCommand::Add(args) => {
            let fields = game_fields(args);
            fields.validate(today)?;
            create(&games, &fields, out).await
        }
        GameCommand::Update { id, fields } => {
            let fields = game_fields(fields);
            fields.validate(today)?;
            update(&games, &id, &fields, out).await
        }
        GameCommand::Delete { id } => remove(&games, &id, out).await,
    }
}

fn game_fields(args: GameArgs) -> GameFields {
    GameFields {
        team_a_id: args.team_a,
        team_b_id: args.team_b,
        played_at: args.at,
    }
}

async fn handle_game_stat(
    command: GameStatCommand,
    repo: &DbRepository,
    out: Output,
) -> Result<()> {
    let game_stats = repo.game_stats();
    match command {
        GameStatCommand::List { game } => {
            let recorded = game_stats
                .list_for_game(&game)
                .await
                .with_context(|| format!("Failed to list the statistics of game {game}"))?;
            out.records(&recorded)
        }
        GameStatCommand::Add {
            game,
            stat,
            player,
            quantity,
        } => {
            let entry = GameStatEntry {
                game_id: game,
                stat_id: stat,
                player_id: player,
                quantity,
            };
            entry.validate()?;
            game_stats
                .insert(&entry)
                .await
                .with_context(|| format!("Failed to record statistic {}", entry.stat_id))?;
            out.done("recorded", "statistic", &entry.stat_id)
        }
    }
}

async fn handle_report(game: &GameId, repo: &DbRepository, out: Output) -> Result<()> {
    let report = repo
        .game_report(game)
        .await
        .with_context(|| format!("Failed to build the report for game {game}"))?;
    out.report(&report)
}

// ==============================================================================
// Shared CRUD Plumbing
// ==============================================================================

async fn list<R>(repo: &R, out: Output) -> Result<()>
where
    R: CrudRepository,
    R::Record: Tabular,
{
    let records = repo
        .list()
        .await
        .with_context(|| format!("Failed to list {} rows", R::ENTITY))?;
    out.records(&records)
}

async fn show<R>(repo: &R, id: &R::Id, out: Output) -> Result<()>
where
    R: CrudRepository,
    R::Id: Display,
    R::Record: Tabular,
{
    let record = repo
        .get(id)
        .await
        .with_context(|| format!("Failed to read {} {id}", R::ENTITY))?;
    out.record(&record)
}

async fn create<R>(repo: &R, fields: &R::Fields, out: Output) -> Result<()>
where
    R: CrudRepository,
    R::Id: Display,
{
    let id = repo
        .insert(fields)
        .await
        .with_context(|| format!("Failed to create {}", R::ENTITY))?;
    out.done("created", R::ENTITY, &id)
}

async fn update<R>(repo: &R, id: &R::Id, fields: &R::Fields, out: Output) -> Result<()>
where
    R: CrudRepository,
    R::Id: Display,
{
    repo.update(id, fields)
        .await
        .with_context(|| format!("Failed to update {} {id}", R::ENTITY))?;
    out.done("updated", R::ENTITY, id)
}

async fn remove<R>(repo: &R, id: &R::Id, out: Output) -> Result<()>
where
    R: CrudRepository,
    R::Id: Display,
{
    repo.delete(id)
        .await
        .with_context(|| format!("Failed to delete {} {id}", R::ENTITY))?;
    out.done("deleted", R::ENTITY, id)
}
