//! Runs arbitrary parameterized statements and returns their rows as a
//! [`Table`] of dynamically typed [`Cell`]s.
//!
//! The repositories use this for procedure calls, whose output shape is only
//! known at runtime, and for statements that return no rows.

use crate::error::DbError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_types::{CityId, GameId, PlayerId, StatId, TeamId};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgConnection, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};
use std::fmt;

/// A value bound to a statement placeholder. Caller data never reaches the
/// statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i32),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<NaiveDate> for Param {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Param {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

macro_rules! id_param {
    ($($id:ty),+) => {
        $(
            impl From<&$id> for Param {
                fn from(value: &$id) -> Self {
                    Self::Text(value.as_str().to_string())
                }
            }
        )+
    };
}

id_param!(CityId, StatId, TeamId, PlayerId, GameId);

/// A single value read from a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Any numeric cell, widened to a decimal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(v) => Some(Decimal::from(*v)),
            Self::Decimal(v) => Some(*v),
            Self::Float(v) => Decimal::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Column names plus rows, in the order the server sent them.
///
/// Column names are only observable through rows, so a result set with no
/// rows yields a table with no columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// An empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, ignoring ASCII case since the server folds unquoted labels.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// First column of the first row: where procedures put their output parameter.
    pub fn first_value(&self) -> Option<&Cell> {
        self.rows.first().and_then(|row| row.first())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }
}

/// Runs a read statement and collects every row.
pub async fn fetch(
    conn: &mut PgConnection,
    statement: &str,
    params: &[Param],
) -> Result<Table, DbError> {
    collect_table(bind_all(sqlx::query(statement), params), conn).await
}

/// Runs a statement that returns no rows and reports how many rows it touched.
pub async fn execute(
    conn: &mut PgConnection,
    statement: &str,
    params: &[Param],
) -> Result<u64, DbError> {
    let result = bind_all(sqlx::query(statement), params)
        .execute(&mut *conn)
        .await?;
    tracing::debug!(rows_affected = result.rows_affected(), "Statement executed.");
    Ok(result.rows_affected())
}

pub(crate) async fn collect_table(
    query: Query<'_, Postgres, PgArguments>,
    conn: &mut PgConnection,
) -> Result<Table, DbError> {
    let mut table = Table::default();
    let mut rows = query.fetch(&mut *conn);

    while let Some(row) = rows.try_next().await? {
        if table.rows.is_empty() {
            table.columns = row
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect();
        }
        table.rows.push(decode_row(&row)?);
    }

    tracing::debug!(rows = table.len(), "Result set read.");
    Ok(table)
}

fn bind_all<'q>(
    query: Query<'q, Postgres, PgArguments>,
    params: &[Param],
) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(query, |query, param| match param {
        Param::Text(v) => query.bind(v.clone()),
        Param::Int(v) => query.bind(*v),
        Param::Date(v) => query.bind(*v),
        Param::Timestamp(v) => query.bind(*v),
    })
}

fn decode_row(row: &PgRow) -> Result<Vec<Cell>, DbError> {
    (0..row.len()).map(|index| decode_cell(row, index)).collect()
}

fn decode_cell(row: &PgRow, index: usize) -> Result<Cell, DbError> {
    let column = row.column(index);
    let type_name = column.type_info().name().to_ascii_uppercase();

    let cell = match type_name.as_str() {
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Cell::Bool),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)?
            .map(|v| Cell::Int(v.into())),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)?
            .map(|v| Cell::Int(v.into())),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Cell::Int),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)?
            .map(|v| Cell::Float(v.into())),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Cell::Float),
        "NUMERIC" => row.try_get::<Option<Decimal>, _>(index)?.map(Cell::Decimal),
        "DATE" => row.try_get::<Option<NaiveDate>, _>(index)?.map(Cell::Date),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(Cell::Timestamp),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|v| Cell::Timestamp(v.naive_utc())),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => row
            .try_get::<Option<String>, _>(index)?
            .map(Cell::Text),
        // Cursor names travel as text but the driver has no mapping for the type.
        "REFCURSOR" => row
            .try_get_unchecked::<Option<String>, _>(index)?
            .map(Cell::Text),
        _ => {
            return Err(DbError::UnsupportedColumn {
                column: column.name().to_string(),
                type_name,
            });
        }
    };

    Ok(cell.unwrap_or(Cell::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_score() -> Table {
        Table::from_rows(
            vec!["jugador".to_string(), "Puntos".to_string()],
            vec![
                vec![Cell::Text("Ana".to_string()), Cell::Int(30)],
                vec![Cell::Text("Total".to_string()), Cell::Int(30)],
            ],
        )
    }

    #[test]
    fn column_lookup_ignores_case() {
        let table = box_score();
        assert_eq!(table.column_index("Jugador"), Some(0));
        assert_eq!(table.column_index("PUNTOS"), Some(1));
        assert_eq!(table.column_index("Equipo"), None);
        assert_eq!(table.value(1, "JUGADOR"), Some(&Cell::Text("Total".to_string())));
        assert_eq!(table.value(2, "Jugador"), None);
    }

    #[test]
    fn first_value_is_the_output_parameter_slot() {
        let table = Table::from_rows(
            vec!["p_idciudad".to_string()],
            vec![vec![Cell::Text("007".to_string())]],
        );
        assert_eq!(table.first_value().and_then(Cell::as_text), Some("007"));
        assert_eq!(Table::default().first_value(), None);
    }

    #[test]
    fn numeric_cells_widen_to_decimal() {
        assert_eq!(Cell::Int(80).as_decimal(), Some(Decimal::from(80)));
        assert_eq!(
            Cell::Decimal(Decimal::new(755, 1)).as_decimal(),
            Some(Decimal::new(755, 1))
        );
        assert_eq!(Cell::Float(2.5).as_decimal(), Some(Decimal::new(25, 1)));
        assert_eq!(Cell::Text("80".to_string()).as_decimal(), None);
        assert_eq!(Cell::Null.as_decimal(), None);
    }

    #[test]
    fn cells_display_as_plain_values() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(Cell::Timestamp(at).to_string(), "2024-05-01 18:30:00");
        assert_eq!(Cell::Date(at.date()).to_string(), "2024-05-01");
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Text("Total".to_string()).to_string(), "Total");
    }

    #[test]
    fn ids_bind_as_text() {
        let id: GameId = "00012".parse().unwrap();
        assert_eq!(Param::from(&id), Param::Text("00012".to_string()));
        assert_eq!(Param::from(7), Param::Int(7));
    }
}
