//! The per-game box score report.
//!
//! `sp_EstadisticasDelJuego` returns two result sets, the home team's box
//! score and then the away team's, each with a player column, a points column
//! and a closing `Total` row. The procedure hands them back as cursors, which
//! are read one after the other inside a single transaction.

use crate::connection::ConnectionProvider;
use crate::error::{DbError, ScoreError};
use crate::executor::{self, Cell, Table};
use core_types::{Game, GameId};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Row};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

pub const PLAYER_COLUMN: &str = "Jugador";
pub const POINTS_COLUMN: &str = "Puntos";
/// Value of the player column on the row carrying a team's total.
pub const TOTAL_SENTINEL: &str = "Total";
/// Shown in place of a winner when both totals are equal.
pub const TIE_LABEL: &str = "Empate";

const PROCEDURE: &str = "sp_EstadisticasDelJuego";
const CALL: &str = "CALL sp_EstadisticasDelJuego($1, NULL, NULL)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Tie,
}

/// Both teams' box scores for one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxScores {
    pub home: Table,
    pub away: Table,
}

impl BoxScores {
    /// Pairs the first result set with the second.
    ///
    /// When the second set is absent, or came back without rows, the away
    /// table is empty and borrows the home table's column names.
    pub fn assemble(home: Table, away: Option<Table>) -> Self {
        let away = match away {
            Some(table) if !table.columns().is_empty() => table,
            Some(_) => Table::new(home.columns().to_vec()),
            None => {
                tracing::warn!("Second result set missing; using an empty away box score.");
                Table::new(home.columns().to_vec())
            }
        };
        Self { home, away }
    }

    pub fn final_score(&self) -> Result<FinalScore, ScoreError> {
        Ok(FinalScore {
            home_points: total_points(&self.home, Side::Home)?,
            away_points: total_points(&self.away, Side::Away)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub home_points: Decimal,
    pub away_points: Decimal,
}

impl FinalScore {
    pub fn outcome(&self) -> Outcome {
        match self.home_points.cmp(&self.away_points) {
            Ordering::Greater => Outcome::HomeWin,
            Ordering::Less => Outcome::AwayWin,
            Ordering::Equal => Outcome::Tie,
        }
    }

    /// The winning team's name, or [`TIE_LABEL`].
    pub fn winner<'a>(&self, home_team: &'a str, away_team: &'a str) -> &'a str {
        match self.outcome() {
            Outcome::HomeWin => home_team,
            Outcome::AwayWin => away_team,
            Outcome::Tie => TIE_LABEL,
        }
    }
}

/// A game with its team names and box scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReport {
    pub game: Game,
    pub home_team: String,
    pub away_team: String,
    pub scores: BoxScores,
}

impl GameReport {
    pub fn final_score(&self) -> Result<FinalScore, ScoreError> {
        self.scores.final_score()
    }

    pub fn winner(&self) -> Result<&str, ScoreError> {
        Ok(self
            .final_score()?
            .winner(&self.home_team, &self.away_team))
    }
}

/// Calls the box score procedure and reads both of its result sets.
pub async fn get_game_statistics(
    provider: &ConnectionProvider,
    game_id: &GameId,
) -> Result<BoxScores, DbError> {
    let mut conn = provider.get_connection().await?;
    // Cursors only live until the end of the transaction that opened them.
    let mut tx = conn.begin().await?;

    let mut sets = ResultSets::open(&mut tx, game_id).await?;
    let home = sets
        .next_set(&mut tx)
        .await?
        .ok_or(DbError::MissingResultSet(PROCEDURE))?;
    let away = sets.next_set(&mut tx).await?;

    tx.commit().await?;
    tracing::debug!(
        game_id = %game_id,
        home_rows = home.len(),
        away_rows = away.as_ref().map(Table::len),
        "Box scores read."
    );
    Ok(BoxScores::assemble(home, away))
}

/// The cursors a procedure call left open, consumed in the order it returned them.
struct ResultSets {
    cursors: VecDeque<Option<String>>,
}

impl ResultSets {
    async fn open(conn: &mut PgConnection, game_id: &GameId) -> Result<Self, DbError> {
        let row = sqlx::query(CALL)
            .bind(game_id)
            .fetch_one(&mut *conn)
            .await?;

        let mut cursors = VecDeque::with_capacity(row.len());
        for index in 0..row.len() {
            // refcursor has no driver mapping; its value is the portal name as text.
            cursors.push_back(row.try_get_unchecked::<Option<String>, _>(index)?);
        }
        Ok(Self { cursors })
    }

    /// Reads the next result set, or `None` once the procedure has none left.
    async fn next_set(&mut self, conn: &mut PgConnection) -> Result<Option<Table>, DbError> {
        let Some(Some(cursor)) = self.cursors.pop_front() else {
            return Ok(None);
        };
        let statement = format!("FETCH ALL FROM {}", quote_ident(&cursor));
        // Portal names repeat across calls, so the statement is not cached.
        let query = sqlx::query(&statement).persistent(false);
        executor::collect_table(query, conn).await.map(Some)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn total_points(table: &Table, side: Side) -> Result<Decimal, ScoreError> {
    // Only the away fallback may be empty; an empty home set has no Total row.
    if table.is_empty() {
        return match side {
            Side::Away => Ok(Decimal::ZERO),
            Side::Home => Err(ScoreError::MissingTotal(side)),
        };
    }

    let player = table
        .column_index(PLAYER_COLUMN)
        .ok_or(ScoreError::MissingColumn {
            side,
            column: PLAYER_COLUMN,
        })?;
    let points = table
        .column_index(POINTS_COLUMN)
        .ok_or(ScoreError::MissingColumn {
            side,
            column: POINTS_COLUMN,
        })?;

    let totals: Vec<&Vec<Cell>> = table
        .rows()
        .iter()
        .filter(|row| {
            row.get(player)
                .and_then(Cell::as_text)
                .is_some_and(|name| name.trim() == TOTAL_SENTINEL)
        })
        .collect();

    let total = match totals.as_slice() {
        [] => return Err(ScoreError::MissingTotal(side)),
        [total] => total,
        several => {
            return Err(ScoreError::DuplicateTotal {
                side,
                count: several.len(),
            });
        }
    };

    match total.get(points) {
        None | Some(Cell::Null) => Ok(Decimal::ZERO),
        Some(cell) => cell.as_decimal().ok_or_else(|| ScoreError::NotNumeric {
            side,
            value: cell.to_string(),
        }),
    }
}
