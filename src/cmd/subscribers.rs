//! `subscribers`: print the registered notification targets.

use clap::Parser;
use thiserror::Error;

use crate::{
    config::AppConfig,
    models::Subscriber,
    persistence::{PersistenceError, open_registry},
};

/// Errors that abort the `subscribers` command.
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Registry error: {0}")]
    Registry(#[from] PersistenceError),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments of the `subscribers` command.
#[derive(Parser, Debug)]
pub struct SubscribersArgs {
    /// Print the subscribers as a JSON array.
    #[arg(long)]
    json: bool,
}

/// Runs the `subscribers` command.
pub async fn execute(args: SubscribersArgs, config_dir: Option<&str>) -> Result<(), Error> {
    let config = AppConfig::new(config_dir)?;
    let registry = open_registry(&config.registry).await?;
    let subscribers = registry.subscribers().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&subscribers)?);
    } else {
        print!("{}", render_table(&subscribers));
    }
    Ok(())
}

fn render_table(subscribers: &[Subscriber]) -> String {
    let mut out = format!("{} subscriber(s)\n", subscribers.len());
    for subscriber in subscribers {
        let since = subscriber
            .registered_at
            .map_or_else(|| "-".to_string(), |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string());
        out.push_str(&format!("{:<20} {}\n", subscriber.id, since));
    }
    out
}
