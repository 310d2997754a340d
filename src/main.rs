use std::net::SocketAddr;
use std::path::PathBuf;

use budget_engine::api::{AppState, create_router};
use budget_engine::calculation::BudgetCalculator;
use budget_engine::config::ConfigLoader;
use budget_engine::models::BudgetInput;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "budget-engine")]
#[command(about = "Monthly household budget engine")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Schedule directory
        #[arg(long, default_value = "./config/ph_monthly")]
        config: PathBuf,

        /// Server bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(long, default_value = "8080")]
        port: u16,
    },
    /// Compute one budget and print it as JSON
    Compute {
        /// Monthly basic salary; commas are allowed
        #[arg(long, default_value = "0")]
        basic_salary: String,

        /// Monthly non-taxable allowance; commas are allowed
        #[arg(long, default_value = "0")]
        allowance: String,

        /// Keep fractional allocation amounts
        #[arg(long)]
        precise: bool,

        /// Schedule directory; the built-in schedule is used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Date used to select the schedule version (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("budget_engine={}", default_level))
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Serve { config, host, port } => {
            let loader = ConfigLoader::load(&config)?;
            let app = create_router(AppState::new(loader));

            let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
            info!("Budget engine listening on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Command::Compute {
            basic_salary,
            allowance,
            precise,
            config,
            as_of,
        } => {
            let calculator = match config {
                Some(dir) => {
                    let loader = ConfigLoader::load(&dir)?;
                    let date = as_of.unwrap_or_else(|| Utc::now().date_naive());
                    loader.version_for(date)?.calculator().clone()
                }
                None => BudgetCalculator::default(),
            };

            let input = BudgetInput::parse(&basic_salary, &allowance, precise);
            let result = calculator.compute(
                input.basic_salary(),
                input.non_taxable_allowance(),
                input.precise(),
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
