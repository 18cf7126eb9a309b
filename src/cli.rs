use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use core_types::{CityId, GameId, PlayerId, StatId, TeamId};

/// Manage a basketball league: cities, teams, players, games and box scores.
#[derive(Parser, Debug)]
#[command(name = "liga", author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cities that teams and players come from.
    #[command(subcommand)]
    City(CityCommand),

    /// Kinds of statistic and the points each is worth.
    #[command(subcommand)]
    Stat(StatCommand),

    #[command(subcommand)]
    Team(TeamCommand),

    #[command(subcommand)]
    Player(PlayerCommand),

    #[command(subcommand)]
    Game(GameCommand),

    /// Statistics recorded for players during a game.
    #[command(subcommand)]
    GameStat(GameStatCommand),

    /// Show both box scores of a game and who won.
    Report {
        #[arg(long)]
        game: GameId,
    },
}

#[derive(Subcommand, Debug)]
pub enum CityCommand {
    List,
    Show {
        #[arg(long)]
        id: CityId,
    },
    Add {
        #[arg(long)]
        name: String,
    },
    Update {
        #[arg(long)]
        id: CityId,
        #[arg(long)]
        name: String,
    },
    Delete {
        #[arg(long)]
        id: CityId,
    },
}

#[derive(Subcommand, Debug)]
pub enum StatCommand {
    List,
    Show {
        #[arg(long)]
        id: StatId,
    },
    Add {
        #[arg(long)]
        description: String,
        /// Points awarded each time the statistic is recorded.
        #[arg(long)]
        value: i32,
    },
    Update {
        #[arg(long)]
        id: StatId,
        #[arg(long)]
        description: String,
        #[arg(long)]
        value: i32,
    },
    Delete {
        #[arg(long)]
        id: StatId,
    },
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    List,
    Show {
        #[arg(long)]
        id: TeamId,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: CityId,
    },
    Update {
        #[arg(long)]
        id: TeamId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: CityId,
    },
    Delete {
        #[arg(long)]
        id: TeamId,
    },
}

/// Every field a player carries; shared by `add` and `update`.
#[derive(clap::Args, Debug)]
pub struct PlayerArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub city: CityId,
    /// Format: YYYY-MM-DD.
    #[arg(long)]
    pub birth_date: NaiveDate,
    /// Jersey number.
    #[arg(long)]
    pub number: i32,
    #[arg(long)]
    pub team: TeamId,
}

#[derive(Subcommand, Debug)]
pub enum PlayerCommand {
    List {
        /// Only list this team's roster.
        #[arg(long)]
        team: Option<TeamId>,
    },
    Show {
        #[arg(long)]
        id: PlayerId,
    },
    Add(PlayerArgs),
    Update {
        #[arg(long)]
        id: PlayerId,
        #[command(flatten)]
        fields: PlayerArgs,
    },
    Delete {
        #[arg(long)]
        id: PlayerId,
    },
}

/// The two teams and the tip-off time; shared by `add` and `update`.
#[derive(clap::Args, Debug)]
pub struct GameArgs {
    /// The home team.
    #[arg(long)]
    pub team_a: TeamId,
    /// The away team.
    #[arg(long)]
    pub team_b: TeamId,
    /// Format: "YYYY-MM-DD HH:MM".
    #[arg(long, value_parser = parse_datetime)]
    pub at: NaiveDateTime,
}

#[derive(Subcommand, Debug)]
pub enum GameCommand {
    List,
    Show {
        #[arg(long)]
        id: GameId,
    },
    Add(GameArgs),
    Update {
        #[arg(long)]
        id: GameId,
        #[command(flatten)]
        fields: GameArgs,
    },
    Delete {
        #[arg(long)]
        id: GameId,
    },
}

#[derive(Subcommand, Debug)]
pub enum GameStatCommand {
    List {
        #[arg(long)]
        game: GameId,
    },
    Add {
        #[arg(long)]
        game: GameId,
        #[arg(long)]
        stat: StatId,
        #[arg(long)]
        player: PlayerId,
        #[arg(long)]
        quantity: i32,
    },
}

/// Accepts "YYYY-MM-DD HH:MM", with optional seconds and an optional `T` separator.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| format!("expected \"YYYY-MM-DD HH:MM\", got '{value}'"))
}
