//! `check`: fetch and evaluate the event once, without commands or dispatch.

use clap::Parser;
use thiserror::Error;

use crate::{
    config::AppConfig,
    supervisor::{EventCheck, SupervisorError},
};

/// Errors that abort the `check` command.
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Setup error: {0}")]
    Setup(#[from] SupervisorError),
    #[error("No fetch strategy named '{0}'")]
    UnknownStrategy(String),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments of the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Only try the strategy with this name.
    #[arg(short, long)]
    strategy: Option<String>,
    /// Overrides the configured pacing factor (0 disables delays).
    #[arg(long)]
    pacing_factor: Option<f64>,
    /// Print compact JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,
}

/// Runs the `check` command.
pub async fn execute(args: CheckArgs, config_dir: Option<&str>) -> Result<(), Error> {
    let mut config = AppConfig::new(config_dir)?;
    apply_overrides(&mut config, &args)?;

    let outcome = EventCheck::from_config(&config)?.run().await?;

    let output = if args.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{output}");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &CheckArgs) -> Result<(), Error> {
    if let Some(name) = &args.strategy {
        config.fetch.strategies.retain(|s| &s.name == name);
        if config.fetch.strategies.is_empty() {
            return Err(Error::UnknownStrategy(name.clone()));
        }
    }
    if let Some(factor) = args.pacing_factor {
        config.fetch.pacing_factor = factor.max(0.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_event;

    fn args(strategy: Option<&str>, pacing_factor: Option<f64>) -> CheckArgs {
        CheckArgs { strategy: strategy.map(String::from), pacing_factor, compact: false }
    }

    #[test]
    fn test_strategy_filter_keeps_only_named_strategy() {
        let mut config = AppConfig::builder(test_event("https://tickets.example")).build();
        let name = config.fetch.strategies[1].name.clone();

        apply_overrides(&mut config, &args(Some(&name), Some(-2.0))).unwrap();

        assert_eq!(config.fetch.strategies.len(), 1);
        assert_eq!(config.fetch.strategies[0].name, name);
        assert_eq!(config.fetch.pacing_factor, 0.0);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let mut config = AppConfig::builder(test_event("https://tickets.example")).build();
        let result = apply_overrides(&mut config, &args(Some("nope"), None));
        assert!(matches!(result, Err(Error::UnknownStrategy(name)) if name == "nope"));
    }
}
