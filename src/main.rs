use clap::{Parser, Subcommand};
use resale_watch::{
    cmd::{CheckArgs, SubscribersArgs, check, subscribers},
    config::AppConfig,
    supervisor::Supervisor,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding `app.yaml`. Defaults to `configs`.
    #[arg(long, global = true, env = "RESALE_WATCH_CONFIG_DIR")]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs one monitoring cycle: chat commands, fetch, evaluation and
    /// notifications.
    Run {
        /// Print the cycle report as JSON when done.
        #[arg(long)]
        report: bool,
    },
    /// Fetches and evaluates the event once and prints the result.
    Check(CheckArgs),
    /// Lists the registered chat subscribers.
    Subscribers(SubscribersArgs),
}

#[tokio::main]
#[tracing::instrument(level = "info")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config_dir = cli.config_dir.as_deref();

    match cli.command {
        Commands::Run { report } => run_cycle(config_dir, report).await?,
        Commands::Check(args) => check::execute(args, config_dir).await?,
        Commands::Subscribers(args) => subscribers::execute(args, config_dir).await?,
    }

    Ok(())
}

async fn run_cycle(config_dir: Option<&str>, report: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(config_dir)?;
    tracing::debug!(
        event = %config.event.label,
        registry = ?config.registry,
        strategies = config.fetch.strategies.len(),
        "Configuration loaded."
    );

    let supervisor = Supervisor::builder().config(config).build().await?;
    tracing::info!("Supervisor initialized, running cycle...");

    let cycle = supervisor.run_cycle().await?;
    if report {
        println!("{}", serde_json::to_string_pretty(&cycle)?);
    }

    Ok(())
}
