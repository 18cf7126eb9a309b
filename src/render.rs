use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::{City, Game, GameStat, Player, StatDefinition, Team};
use database::{FinalScore, GameReport};
use serde::Serialize;
use std::fmt::Display;

/// A record that can be shown as one row of a table.
pub trait Tabular: Serialize {
    const HEADER: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl Tabular for City {
    const HEADER: &'static [&'static str] = &["Id", "Name"];

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

impl Tabular for StatDefinition {
    const HEADER: &'static [&'static str] = &["Id", "Description", "Value"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description.clone(),
            self.value.to_string(),
        ]
    }
}

impl Tabular for Team {
    const HEADER: &'static [&'static str] = &["Id", "Name", "City Id", "City"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.city_id.to_string(),
            self.city.clone(),
        ]
    }
}

impl Tabular for Player {
    const HEADER: &'static [&'static str] =
        &["Id", "Name", "City", "Birth Date", "Number", "Team Id", "Team"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.city.clone(),
            self.birth_date.format("%Y-%m-%d").to_string(),
            self.jersey_number.to_string(),
            self.team_id.to_string(),
            self.team.clone(),
        ]
    }
}

impl Tabular for Game {
    const HEADER: &'static [&'static str] = &["Id", "Description", "Team A", "Team B", "Date"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description.clone(),
            self.team_a_id.to_string(),
            self.team_b_id.to_string(),
            self.played_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl Tabular for GameStat {
    const HEADER: &'static [&'static str] =
        &["Player Id", "Player", "Stat Id", "Statistic", "Quantity"];

    fn row(&self) -> Vec<String> {
        vec![
            self.player_id.to_string(),
            self.player.clone(),
            self.stat_id.to_string(),
            self.stat.clone(),
            self.quantity.to_string(),
        ]
    }
}

/// What a finished mutation reports back.
#[derive(Debug, Serialize)]
struct Done<'a> {
    action: &'a str,
    entity: &'a str,
    id: String,
}

/// The report as printed with `--json`.
#[derive(Debug, Serialize)]
struct ReportView<'a> {
    #[serde(flatten)]
    report: &'a GameReport,
    #[serde(flatten)]
    score: FinalScore,
    winner: &'a str,
}

/// Writes command results to stdout as tables or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn records<T: Tabular>(&self, records: &[T]) -> Result<()> {
        if self.json {
            return print_json(&records);
        }
        let mut table = grid(T::HEADER);
        for record in records {
            table.add_row(record.row());
        }
        println!("{table}");
        Ok(())
    }

    pub fn record<T: Tabular>(&self, record: &T) -> Result<()> {
        if self.json {
            return print_json(record);
        }
        let mut table = grid(T::HEADER);
        table.add_row(record.row());
        println!("{table}");
        Ok(())
    }

    pub fn done(&self, action: &str, entity: &str, id: &impl Display) -> Result<()> {
        if self.json {
            return print_json(&Done {
                action,
                entity,
                id: id.to_string(),
            });
        }
        println!("{} {entity} {id}.", capitalize(action));
        Ok(())
    }

    pub fn report(&self, report: &GameReport) -> Result<()> {
        let score = report.final_score()?;
        let winner = score.winner(&report.home_team, &report.away_team);

        if self.json {
            return print_json(&ReportView {
                report,
                score,
                winner,
            });
        }

        let game = &report.game;
        println!(
            "Game {}: {} ({})",
            game.id,
            game.description,
            game.played_at.format("%Y-%m-%d %H:%M")
        );
        println!("\nHome: {}", report.home_team);
        println!("{}", result_grid(&report.scores.home));
        println!("\nAway: {}", report.away_team);
        println!("{}", result_grid(&report.scores.away));
        println!("\n{}", scoreline(report, &score));
        println!("Winner: {winner}");
        Ok(())
    }
}

fn scoreline(report: &GameReport, score: &FinalScore) -> String {
    format!(
        "{} {} – {} {}",
        report.home_team, score.home_points, score.away_points, report.away_team
    )
}

fn grid(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn result_grid(result: &database::Table) -> Table {
    let header: Vec<&str> = result.columns().iter().map(String::as_str).collect();
    let mut table = grid(&header);
    for row in result.rows() {
        table.add_row(row.iter().map(ToString::to_string).collect::<Vec<_>>());
    }
    table
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
