use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use player_scout::aggregate::{
    AggregateError, FaceitAggregator, FaceitReport, PlayerReport, SteamAggregator, SteamReport,
};
use player_scout::config::AppConfig;
use player_scout::fetch::FetchError;
use player_scout::models::{PlayerMatchSummary, SteamId};

#[derive(Parser)]
#[command(name = "player-scout")]
#[command(about = "FACEIT and Steam player history with windowed match statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// FACEIT profile, bans and match statistics
    Faceit {
        /// FACEIT nickname
        nickname: String,
    },

    /// Steam profile, library and friend metrics
    Steam {
        /// SteamID64
        steam_id: String,
    },

    /// FACEIT and Steam together
    Report {
        /// FACEIT nickname
        nickname: String,

        /// SteamID64; defaults to the account linked on FACEIT
        #[arg(long)]
        steam_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    // Initialize tracing; logs go to stderr so stdout stays parseable
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    let json_layer = cli.json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!cli.json_logs)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting player-scout v{}", env!("CARGO_PKG_VERSION"));

    let mut report = PlayerReport::default();

    match cli.command {
        Commands::Faceit { nickname } => {
            let aggregator = FaceitAggregator::from_config(&config)?;
            let stats = aggregator.load(&nickname).await.map_err(user_facing)?;
            report.faceit = Some(FaceitReport::from_stats(&stats));
        }

        Commands::Steam { steam_id } => {
            let steam_id = parse_steam_id(&steam_id)?;
            let aggregator = SteamAggregator::from_config(&config)?;
            let stats = aggregator.load(steam_id).await.map_err(user_facing)?;
            report.steam = Some(SteamReport::from_stats(&stats));
        }

        Commands::Report { nickname, steam_id } => {
            let faceit = FaceitAggregator::from_config(&config)?;
            let steam = SteamAggregator::from_config(&config)?;

            let mut steam_id = steam_id.as_deref().map(parse_steam_id).transpose()?;

            match faceit.load(&nickname).await {
                Ok(stats) => {
                    if steam_id.is_none() {
                        steam_id = stats.linked_steam_id();
                    }
                    report.faceit = Some(FaceitReport::from_stats(&stats));
                }
                Err(e) => report.errors.push(user_facing(e).to_string()),
            }

            match steam_id {
                Some(id) => match steam.load(id).await {
                    Ok(stats) => report.steam = Some(SteamReport::from_stats(&stats)),
                    Err(e) => report.errors.push(user_facing(e).to_string()),
                },
                None => report
                    .errors
                    .push("No Steam account linked; pass --steam-id".to_string()),
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn parse_steam_id(raw: &str) -> Result<SteamId> {
    raw.parse::<SteamId>()
        .with_context(|| format!("Invalid SteamID64: {}", raw))
}

/// Turn transport failures into messages fit for the terminal.
fn user_facing(err: AggregateError) -> anyhow::Error {
    match err {
        AggregateError::Fetch(FetchError::Timeout(_) | FetchError::Connection(_)) => {
            anyhow::anyhow!("Network error, please try again later. ({})", err)
        }
        AggregateError::Fetch(FetchError::HttpStatus { status: 401 | 403, .. }) => {
            anyhow::anyhow!("Request was rejected; check your API key. ({})", err)
        }
        other => other.into(),
    }
}

fn print_summary(summary: &PlayerMatchSummary) {
    let s = &summary.stats;
    println!("\n--- {} ({} matches) ---", summary.window, summary.matches);
    println!("Kills:            {:.2}", s.avg_kills);
    println!("K/D:              {:.2}", s.avg_kd_ratio);
    println!("K/R:              {:.2}", s.avg_kr_ratio);
    println!("Headshots:        {:.2}%", s.avg_hsp);
    println!(
        "Multi-kills:      {:.2} / {:.2} / {:.2} / {:.2}",
        s.avg_2_kills, s.avg_3_kills, s.avg_4_kills, s.avg_5_kills
    );
    println!("Win rate:         {:.2}%", s.perc_winrate);
    println!("Score diff:       {:+.2}", s.avg_score_diff);
}

fn print_report(report: &PlayerReport) {
    if let Some(faceit) = &report.faceit {
        let p = &faceit.profile;
        println!("=== FACEIT: {} ===", p.nickname);
        println!("Player ID:        {}", p.player_id);
        println!("Level / Elo:      {} / {}", p.skill_level, p.elo);
        println!("Verified:         {}", p.is_verified);
        println!("Friends:          {}", p.num_friends);
        if let Some(age) = &p.account_age {
            println!("Account age:      {}", age);
        }
        if let Some(games) = p.num_games {
            println!("Matches:          {}", games);
        }
        if let Some(bans) = &faceit.bans {
            println!(
                "Bans:             {} (smurf: {})",
                bans.num_bans, bans.is_smurf
            );
        }
        for summary in &faceit.summaries {
            print_summary(summary);
        }
        for err in &faceit.errors {
            println!("  - {}", err);
        }
    }

    if let Some(steam) = &report.steam {
        let p = &steam.profile;
        println!("\n=== Steam: {} ({}) ===", steam.persona_name, p.steam_id);
        println!("Private profile:  {}", p.is_private);
        println!("Private games:    {}", p.is_private_gamedata);
        if let Some(created) = p.created_at {
            println!("Created:          {}", created);
        }
        if let Some(games) = &steam.games {
            println!("Games owned:      {}", games.num_games);
            println!("Target playtime:  {} min", games.playtime_target_mins);
            println!(
                "Share of total:   {:.2}%",
                games.perc_target_playtime_all_games
            );
            println!(
                "Share of age:     {:.2}%",
                games.perc_target_playtime_account_age
            );
            println!("Playtime stdev:   {:.2}", games.playtime_all_games_stdev);
        }
        if let Some(num) = steam.friends.as_ref().and_then(|f| f.num_friends) {
            println!("Friends:          {}", num);
        }
        for err in &steam.errors {
            println!("  - {}", err);
        }
    }

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for err in &report.errors {
            println!("  - {}", err);
        }
    }
}
