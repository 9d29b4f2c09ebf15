use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use market_algo::config::{LoggingSettings, Settings};
use market_algo::error::AppError;
use market_algo::models::{
    Envelope, PriceQuoteRequest, RankListingsRequest, RankListingsResponse, RankRequest,
    RankResponse, RankingOptions,
};

#[derive(Parser)]
#[command(name = "market-algo", version, about = "Vendor ranking and price recommendation")]
struct Cli {
    /// Settings file (defaults to config/default.toml + config/local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate vendors from a JSON request
    Rank {
        /// Request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
    /// Rank marketplace listings from a JSON request
    RankListings {
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
    /// Recommend a listing price
    Price {
        /// JSON request file; flags below are ignored when set
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        base_price: Option<f64>,
        #[arg(long)]
        grade: Option<f64>,
        #[arg(long)]
        demand: Option<f64>,
        #[arg(long)]
        supply: Option<f64>,
        #[arg(long)]
        material: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
    },
}

fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    // Logging needs the settings, so a load failure is reported on stderr
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(&settings.logging);

    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);
    let _guard = span.enter();

    if let Err(e) = run(cli.command, &settings, run_id) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout carries the results, so logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn run(command: Commands, settings: &Settings, run_id: Uuid) -> Result<(), AppError> {
    match command {
        Commands::Rank { input } => {
            let request: RankRequest = read_json(&input)?;
            let options = with_configured_defaults(request.options, settings);
            let ranker = settings.ranker().with_overrides(&request.weights);

            info!(candidates = request.candidates.len(), "Ranking candidates");

            let results = ranker.rank(&request.candidates, &options);
            let response = RankResponse {
                total_candidates: request.candidates.len(),
                eligible_candidates: results.len(),
                results,
            };

            info!(
                "Ranked {} of {} candidates",
                response.eligible_candidates, response.total_candidates
            );

            write_json(&Envelope::new(run_id, response))
        }
        Commands::RankListings { input } => {
            let request: RankListingsRequest = read_json(&input)?;
            let options = with_configured_defaults(request.options, settings);
            let ranker = settings.ranker().with_overrides(&request.weights);

            let listings = ranker.rank_listings(&request.listings, &options);

            info!("Ranked {} of {} listings", listings.len(), request.listings.len());

            write_json(&Envelope::new(run_id, RankListingsResponse { listings }))
        }
        Commands::Price {
            input,
            base_price,
            grade,
            demand,
            supply,
            material,
            quantity,
        } => {
            let request = match input {
                Some(path) => read_json(&path)?,
                None => PriceQuoteRequest {
                    material_type: material,
                    quantity_kg: quantity,
                    quality_grade: grade,
                    base_market_price: base_price.unwrap_or(f64::NAN),
                    demand_index: demand,
                    supply_index: supply,
                },
            };

            let quote = settings
                .price_recommender()
                .quote(&request, &settings.market_signals);

            info!(
                material = ?quote.material_type,
                price = quote.recommendation.recommended_price,
                confidence = quote.recommendation.confidence,
                "Price recommended"
            );

            write_json(&Envelope::new(run_id, quote))
        }
    }
}

/// Fill options the request left unset from the configured defaults
fn with_configured_defaults(options: RankingOptions, settings: &Settings) -> RankingOptions {
    let market_signals = match options.market_signals {
        Some(signals) => Some(signals),
        None if !settings.market_signals.is_empty() => Some(settings.market_signals.clone()),
        None => None,
    };

    RankingOptions {
        required_availability: options
            .required_availability
            .or(settings.ranking.required_availability),
        market_signals,
        ..options
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(serde_json::from_str(&buffer)?);
    }

    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
