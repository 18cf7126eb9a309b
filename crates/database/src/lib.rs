//! # Liga Database Crate
//!
//! This crate is the data-access layer of the league system. Everything that
//! talks to the database lives here; the rest of the application only sees
//! typed records, [`Table`]s and [`DbError`]s.
//!
//! ## Architectural Principles
//!
//! - **One Connection:** A [`ConnectionProvider`] opens a single connection on
//!   first use and keeps it for the life of the process. Calls take turns on it.
//! - **Server-Side Rules:** Ids are minted by insert procedures and
//!   referential integrity is enforced by the database. This crate never
//!   invents an id or cascades a delete.
//! - **Bound Parameters Only:** Caller values are always bound to
//!   placeholders, never spliced into statement text.
//!
//! ## Public API
//!
//! - `ConnectionProvider`: lazily opened shared connection, built from `DatabaseSettings`.
//! - `fetch` / `execute`: run any parameterized statement, returning a `Table` or a row count.
//! - `CrudRepository`: the list / get / insert / update / delete contract, implemented by
//!   `CityRepo`, `StatDefinitionRepo`, `TeamRepo`, `PlayerRepo` and `GameRepo`.
//! - `GameStatRepo`: append-only game statistics.
//! - `DbRepository`: hands out the repositories and runs the game report.
//! - `DbError` / `ScoreError`: the errors this crate can return.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod executor;
pub mod report;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{ConnectionProvider, connect_options};
pub use error::{DbError, ScoreError};
pub use executor::{Cell, Param, Table, execute, fetch};
pub use report::{BoxScores, FinalScore, GameReport, Outcome, Side, TIE_LABEL};
pub use repository::{
    CityRepo, CrudRepository, DbRepository, GameRepo, GameStatRepo, PlayerRepo,
    StatDefinitionRepo, TeamRepo,
};
