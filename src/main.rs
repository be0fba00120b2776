use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fgc_dashboard::api::state::AppState;
use fgc_dashboard::api::Pagination;
use fgc_dashboard::config::AppConfig;
use fgc_dashboard::models::find_game;
use fgc_dashboard::pipeline::{load_players, load_tournaments};
use fgc_dashboard::startgg::{StartggClient, TournamentSource};

#[derive(Parser)]
#[command(name = "fgc-dashboard")]
#[command(about = "Fighting game tournament dashboard backed by start.gg")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Print recent tournaments for a game
    Tournaments {
        /// Game slug, e.g. sf6
        game: String,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the player ranking across all configured games
    Players {
        /// Number of players to show
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List configured games
    Games {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn build_source(config: &AppConfig) -> Result<Arc<dyn TournamentSource>> {
    let client = StartggClient::new(&config.startgg, config.startgg.token_from_env())?;
    if !client.has_token() {
        tracing::warn!(
            "{} is not set; start.gg requests will fail",
            config.startgg.token_env
        );
    }
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting fgc-dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("loading {}", cli.config))?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState {
                source: build_source(&config)?,
                config: Arc::new(config),
            };

            let mut app = fgc_dashboard::api::build_router(state);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Tournaments {
            game,
            page,
            per_page,
            json,
        } => {
            let Some(game) = find_game(&config.games, &game) else {
                let known: Vec<&str> = config.games.iter().map(|g| g.slug.as_str()).collect();
                anyhow::bail!("Unknown game {} (configured: {})", game, known.join(", "));
            };
            let source = build_source(&config)?;
            let tournaments = load_tournaments(
                source.as_ref(),
                game,
                Pagination::new(page, per_page),
                config.startgg.standings_per_event,
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tournaments)?);
            } else if tournaments.is_empty() {
                println!("No tournaments found.");
            } else {
                for t in &tournaments {
                    let date = t
                        .starts_at()
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "----------".to_string());
                    let winner = t.winner().map(|p| p.name.as_str()).unwrap_or("-");
                    println!(
                        "{}  {:<48} {:>5} entrants  winner: {}",
                        date, t.name, t.num_attendees, winner
                    );
                }
            }
        }
        Commands::Players {
            limit,
            page,
            per_page,
            json,
        } => {
            let source = build_source(&config)?;
            let limit = limit.unwrap_or(config.aggregate.top_n).max(1);
            let players = load_players(
                source.as_ref(),
                &config.games,
                Pagination::new(page, per_page),
                config.startgg.standings_per_event,
                &config.aggregate,
                limit,
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&players)?);
            } else if players.is_empty() {
                println!("No player data available.");
            } else {
                println!(
                    "{:<4} {:<24} {:>5} {:>5} {:>7} {:>10}",
                    "#", "Player", "Wins", "Evts", "Win %", "Est. $"
                );
                for (i, p) in players.iter().enumerate() {
                    println!(
                        "{:<4} {:<24} {:>5} {:>5} {:>7.1} {:>10}",
                        i + 1,
                        p.name,
                        p.wins,
                        p.tournaments,
                        p.win_rate,
                        p.estimated_earnings
                    );
                }
            }
        }
        Commands::Games { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config.games)?);
                return Ok(());
            }
            for game in &config.games {
                match &game.videogame_id {
                    Some(id) => println!("{:<10} {} (videogame {})", game.slug, game.name, id),
                    None => println!("{:<10} {} (looked up by name)", game.slug, game.name),
                }
            }
        }
    }

    Ok(())
}
