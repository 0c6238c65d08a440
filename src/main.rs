//! Command-line entry point for the Padel Ladder league
//!
//! Every invocation loads the league from its JSON data file, performs one
//! operation and writes the file back.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use padel_ladder::config::AppConfig;
use padel_ladder::{JsonFileLeagueStore, League, LeagueError, MatchInput, PlayerId, TournamentId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Padel Ladder - ratings and tournament standings for a padel league
#[derive(Parser)]
#[command(
    name = "padel-ladder",
    version,
    about = "Track players, doubles matches and tournaments for a padel league",
    long_about = "Padel Ladder keeps a team-average Elo rating for every player, scaled by the \
                 score margin of each match, and cumulative points tables for tournaments \
                 recomputed from their game logs."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Data file override
    #[arg(long, value_name = "FILE", help = "Override the league data file")]
    data_file: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without touching the league")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a player to the roster
    AddPlayer { name: String },
    /// Remove a player who has no recorded results
    RemovePlayer { name: String },
    /// List all players
    Players,
    /// Record a rated match: two players per team, then both scores
    RecordMatch {
        #[arg(long, num_args = 2, value_names = ["PLAYER", "PLAYER"])]
        team1: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["PLAYER", "PLAYER"])]
        team2: Vec<String>,
        #[arg(long)]
        score1: String,
        #[arg(long)]
        score2: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a rated match and reverse its rating effect
    DeleteMatch { id: uuid::Uuid },
    /// List rated matches, newest first
    Matches,
    /// Show the rating table
    Ranking,
    /// Start a new tournament
    CreateTournament { name: String },
    /// Record a tournament game
    RecordGame {
        tournament: TournamentId,
        #[arg(long, num_args = 2, value_names = ["PLAYER", "PLAYER"])]
        team1: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["PLAYER", "PLAYER"])]
        team2: Vec<String>,
        #[arg(long)]
        score1: String,
        #[arg(long)]
        score2: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a tournament game
    DeleteGame { id: uuid::Uuid },
    /// Close a tournament and award the winner bonus
    MarkWinner { tournament: TournamentId, player: String },
    /// Show a tournament's points table
    Standings { tournament: TournamentId },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data_file) = &args.data_file {
        config.service.data_file = data_file.clone();
    }

    padel_ladder::config::validate_config(&config)?;
    Ok(config)
}

/// Resolve a player by display name
fn player_id(league: &League, name: &str) -> Result<PlayerId> {
    league
        .find_player(name)?
        .map(|p| p.id)
        .ok_or_else(|| anyhow!("No player named '{}'", name))
}

fn match_input(
    league: &League,
    team1: &[String],
    team2: &[String],
    score1: String,
    score2: String,
    date: Option<NaiveDate>,
) -> Result<MatchInput> {
    let slot = |names: &[String], i: usize| -> Result<Option<PlayerId>> {
        names.get(i).map(|name| player_id(league, name)).transpose()
    };

    Ok(MatchInput {
        team1: [slot(team1, 0)?, slot(team1, 1)?],
        team2: [slot(team2, 0)?, slot(team2, 1)?],
        team1_score: Some(score1),
        team2_score: Some(score2),
        date,
    })
}

fn run(league: &League, command: Command) -> Result<()> {
    match command {
        Command::AddPlayer { name } => {
            let player = league.add_player(&name)?;
            println!("Added {} ({})", player.name, player.id);
        }
        Command::RemovePlayer { name } => {
            let id = player_id(league, &name)?;
            let player = league.remove_player(id)?;
            println!("Removed {}", player.name);
        }
        Command::Players => {
            for player in league.players()? {
                println!("{:<20} {:>5}  {}", player.name, player.rating, player.id);
            }
        }
        Command::RecordMatch {
            team1,
            team2,
            score1,
            score2,
            date,
        } => {
            let input = match_input(league, &team1, &team2, score1, score2, date)?;
            let record = league.record_match(&input)?;
            for change in &record.rating_changes {
                let name = league.player(change.player_id)?.name;
                println!("{:<20} {:+}", name, change.delta);
            }
            println!("Match {}", record.id);
        }
        Command::DeleteMatch { id } => {
            league.delete_match(id)?;
            println!("Deleted match {}", id);
        }
        Command::Matches => {
            let players = league.players()?;
            let name = |id: &PlayerId| {
                players
                    .iter()
                    .find(|p| &p.id == id)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?")
            };
            for record in league.matches()? {
                let r = &record.result;
                println!(
                    "{}  {} & {}  {}-{}  {} & {}  ({} won)",
                    record.id,
                    name(&r.team1[0]),
                    name(&r.team1[1]),
                    r.team1_score,
                    r.team2_score,
                    name(&r.team2[0]),
                    name(&r.team2[1]),
                    r.winner
                );
            }
        }
        Command::Ranking => {
            for (position, player) in league.ranking()?.iter().enumerate() {
                println!(
                    "{:>2}. {:<20} {:>5}  {}W-{}L  {:>3}% matches  {:>3}% games",
                    position + 1,
                    player.name,
                    player.rating,
                    player.stats.wins,
                    player.stats.losses,
                    player.stats.win_rate(),
                    player.stats.game_win_rate()
                );
            }
        }
        Command::CreateTournament { name } => {
            let tournament = league.create_tournament(&name)?;
            println!("Created {} ({})", tournament.name, tournament.id);
        }
        Command::RecordGame {
            tournament,
            team1,
            team2,
            score1,
            score2,
            date,
        } => {
            let input = match_input(league, &team1, &team2, score1, score2, date)?;
            let game = league.record_game(tournament, &input)?;
            println!("Game {}", game.id);
        }
        Command::DeleteGame { id } => {
            league.delete_game(id)?;
            println!("Deleted game {}", id);
        }
        Command::MarkWinner { tournament, player } => {
            let id = player_id(league, &player)?;
            let tournament = league.mark_winner(tournament, id)?;
            println!("{} won {}", player, tournament.name);
        }
        Command::Standings { tournament } => {
            for (position, row) in league.standings(tournament)?.iter().enumerate() {
                println!(
                    "{:>2}. {:<20} {:>4} pts  {} played  {} won  {} scored",
                    position + 1,
                    row.name,
                    row.standing.total_points,
                    row.standing.games_played,
                    row.standing.games_won,
                    row.standing.total_scored
                );
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        match LeagueError::classify(&e) {
            Some(reason @ LeagueError::ConfigurationError { .. }) => eprintln!("{}", reason),
            _ => eprintln!("Configuration error: {:#}", e),
        }
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        info!("   Data file: {}", config.service.data_file.display());
        info!("   Rating: K={} initial={}", config.rating.k_factor, config.rating.initial_rating);
        info!("   Reversal: {:?}", config.rating.reversal);
        return Ok(());
    }

    let Some(command) = args.command else {
        eprintln!("No command given; see --help");
        std::process::exit(2);
    };

    let store = Arc::new(JsonFileLeagueStore::new(config.service.data_file.clone()));
    let league = League::new(store, config);

    if let Err(e) = run(&league, command) {
        match LeagueError::classify(&e) {
            Some(LeagueError::Validation(reason)) => eprintln!("Rejected: {}", reason),
            Some(LeagueError::Integrity(reason)) => eprintln!("Not allowed: {}", reason),
            _ => error!("Operation failed: {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}
