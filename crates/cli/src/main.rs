use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tiptrip_agents::{AgentSettings, ConversationalAgent};
use tiptrip_catalog::{PlaceCatalog, RecommendationEngine, ReferencePlaceResolver};
use tiptrip_core::{GeoPoint, DEFAULT_RADIUS_KM};
use tiptrip_observability::{init_tracing, AppMetrics};
use tiptrip_oracle::OpenAiOracle;
use tiptrip_storage::Store;

#[derive(Debug, Parser)]
#[command(name = "tiptrip")]
#[command(about = "Tip Trip tourist assistant CLI")]
struct Cli {
    /// CSV dataset of places.
    #[arg(long, env = "TIPTRIP_DATASET")]
    dataset: PathBuf,

    /// SQLite URL for stored user locations; in-memory when absent.
    #[arg(long, env = "TIPTRIP_DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat {
        #[arg(long, default_value_t = 1)]
        user_id: i64,
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius: i64,
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
    Ask {
        question: String,
        #[arg(long, default_value_t = 1)]
        user_id: i64,
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius: i64,
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM as f64)]
        radius: f64,
        #[arg(long)]
        category: Option<String>,
    },
    Resolve {
        text: String,
    },
    Locate {
        #[arg(long)]
        user_id: i64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

type Agent = ConversationalAgent<OpenAiOracle, Store>;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("tiptrip_cli");
    let cli = Cli::parse();

    let catalog = Arc::new(load_catalog(&cli.dataset)?);
    let store = open_store(cli.database_url.as_deref()).await?;

    match cli.command {
        Command::Chat {
            user_id,
            radius,
            lat,
            lon,
        } => {
            seed_location(&store, user_id, lat.zip(lon)).await?;
            let agent = build_agent(catalog, store)?;
            run_chat(&agent, user_id, radius).await?;
        }
        Command::Ask {
            question,
            user_id,
            radius,
            lat,
            lon,
        } => {
            seed_location(&store, user_id, lat.zip(lon)).await?;
            let agent = build_agent(catalog, store)?;
            let reply = agent.consult(&question, user_id, radius).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::Nearby {
            lat,
            lon,
            radius,
            category,
        } => {
            let origin = GeoPoint::new(lat, lon);
            if !origin.is_valid() {
                bail!("invalid coordinates: {lat}, {lon}");
            }
            let places = RecommendationEngine::new(catalog).recommend(origin, radius, category.as_deref());
            println!("{}", serde_json::to_string_pretty(&places)?);
        }
        Command::Resolve { text } => {
            let place = ReferencePlaceResolver::default().resolve(&text, &catalog);
            println!("{}", serde_json::to_string_pretty(&place)?);
        }
        Command::Locate { user_id, lat, lon } => {
            if cli.database_url.is_none() {
                bail!("locate needs --database-url (or TIPTRIP_DATABASE_URL) to persist locations");
            }
            seed_location(&store, user_id, Some((lat, lon))).await?;
            println!("stored location for user {user_id}");
        }
    }

    Ok(())
}

async fn run_chat(agent: &Agent, user_id: i64, radius: i64) -> Result<()> {
    println!("Tip Trip chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        match agent.consult(message, user_id, radius).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(err) => eprintln!("\n{:#}\n", anyhow::Error::new(err)),
        }
    }

    println!("{}", serde_json::to_string_pretty(&agent.metrics().snapshot())?);
    Ok(())
}

fn load_catalog(path: &Path) -> Result<PlaceCatalog> {
    PlaceCatalog::from_csv_path(path)
        .with_context(|| format!("failed loading place dataset from {}", path.display()))
}

async fn open_store(database_url: Option<&str>) -> Result<Store> {
    match database_url {
        Some(database_url) => Store::sqlite(database_url).await,
        None => Ok(Store::memory()),
    }
}

async fn seed_location(store: &Store, user_id: i64, coords: Option<(f64, f64)>) -> Result<()> {
    let Some((lat, lon)) = coords else {
        return Ok(());
    };

    let location = GeoPoint::new(lat, lon);
    if !location.is_valid() {
        bail!("invalid coordinates: {lat}, {lon}");
    }
    store.upsert_location(user_id, location).await
}

fn build_agent(catalog: Arc<PlaceCatalog>, store: Store) -> Result<Agent> {
    let oracle = OpenAiOracle::from_env().context("oracle is not available")?;

    Ok(ConversationalAgent::new(
        catalog,
        Arc::new(oracle),
        Arc::new(store),
        AgentSettings::from_env(),
        AppMetrics::shared(),
    ))
}
