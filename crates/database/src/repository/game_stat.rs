use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::executor::{self, Param};
use core_types::{GameId, GameStat, GameStatEntry};
use std::sync::Arc;

const INSERT: &str = r#"
    INSERT INTO EstadisticaJuego (IdJuego, IdEstadistica, IdJugador, CantEstadisticaRegistrada)
    VALUES ($1, $2, $3, $4)
"#;

const LIST_FOR_GAME: &str = r#"
    SELECT ej.IdJuego AS game_id,
           ej.IdEstadistica AS stat_id, e.DescripcionEstadistica AS "Estadistica",
           ej.IdJugador AS player_id, j.NomJugador AS "Jugador",
           ej.CantEstadisticaRegistrada AS quantity
    FROM EstadisticaJuego ej
    JOIN Estadistica e ON e.IdEstadistica = ej.IdEstadistica
    JOIN Jugador j ON j.IdJugador = ej.IdJugador
    WHERE ej.IdJuego = $1
    ORDER BY ej.IdJugador, ej.IdEstadistica
"#;

/// Statistics recorded during games. Rows are only ever appended.
#[derive(Debug, Clone)]
pub struct GameStatRepo {
    provider: Arc<ConnectionProvider>,
}

impl GameStatRepo {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    pub async fn insert(&self, entry: &GameStatEntry) -> Result<(), DbError> {
        let mut conn = self.provider.get_connection().await?;
        let params: &[Param] = &[
            (&entry.game_id).into(),
            (&entry.stat_id).into(),
            (&entry.player_id).into(),
            entry.quantity.into(),
        ];
        executor::execute(&mut conn, INSERT, params).await?;
        tracing::info!(
            game_id = %entry.game_id,
            stat_id = %entry.stat_id,
            player_id = %entry.player_id,
            quantity = entry.quantity,
            "Game statistic recorded."
        );
        Ok(())
    }

    /// Everything recorded for one game, by player then statistic.
    pub async fn list_for_game(&self, game_id: &GameId) -> Result<Vec<GameStat>, DbError> {
        let mut conn = self.provider.get_connection().await?;
        let stats = sqlx::query_as::<_, GameStat>(LIST_FOR_GAME)
            .bind(game_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(stats)
    }
}
