pub mod error;
pub mod ids;
pub mod structs;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use ids::{CityId, GameId, PlayerId, StatId, TeamId};
pub use structs::{
    City, CityFields, Game, GameFields, GameStat, GameStatEntry, Player, PlayerFields,
    StatDefinition, StatDefinitionFields, Team, TeamFields,
};
