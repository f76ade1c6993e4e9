//! `vow`: command line tools for the VOW bonding protocol.

mod simulate;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use vow_bond::EngineConfig;
use vow_types::Identity;
use vow_utils::LogFormat;

#[derive(Parser)]
#[command(name = "vow", about = "VOW bonding protocol tools")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "VOW_CONFIG")]
    config: Option<PathBuf>,

    /// Application id hashed into the propose/accept action domains.
    #[arg(long, env = "VOW_APP_ID")]
    app_id: Option<String>,

    /// Identity the engine mints as.
    #[arg(long, env = "VOW_MINTER")]
    minter: Option<Identity>,

    /// Log output format: "human" or "json".
    #[arg(long, env = "VOW_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOW_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the order-independent key for a pair of identities.
    PairKey { a: Identity, b: Identity },

    /// Print the proof signal derived from an identity.
    Signal { identity: Identity },

    /// Print the action id for an action under the configured app id.
    ActionId { action: String },

    /// Print the effective configuration as TOML.
    Config,

    /// Run a scripted bond lifecycle against in-memory collaborators and
    /// print the outcome as JSON.
    Simulate {
        /// Accrual periods to let pass before claiming yield.
        #[arg(long, default_value_t = 100)]
        accrual_periods: u64,

        /// Milestone periods after bond formation before the anniversary check.
        #[arg(long, default_value_t = 3)]
        milestone_periods: u64,

        /// Highest anniversary period the simulated issuer has metadata for.
        #[arg(long, default_value_t = 4)]
        schedule_ceiling: u32,
    },
}

fn effective_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(app_id) = &cli.app_id {
        config.params.app_id = app_id.clone();
    }
    if let Some(minter) = cli.minter {
        config.minter = minter;
    }
    if let Some(format) = cli.log_format {
        config.log_format = match format {
            LogFormat::Human => "human".into(),
            LogFormat::Json => "json".into(),
        };
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;
    let format: LogFormat = config.log_format.parse()?;
    vow_utils::init_logging(format, &config.log_level);

    match cli.command {
        Command::PairKey { a, b } => println!("{}", vow_crypto::pair_key(&a, &b)),
        Command::Signal { identity } => println!("{}", vow_crypto::signal_for(&identity)),
        Command::ActionId { action } => {
            println!("{}", vow_crypto::action_id(&config.params.app_id, &action))
        }
        Command::Config => print!("{}", config.to_toml_string()?),
        Command::Simulate {
            accrual_periods,
            milestone_periods,
            schedule_ceiling,
        } => {
            let script = simulate::Script {
                accrual_periods,
                milestone_periods,
                schedule_ceiling,
            };
            tracing::info!(accrual_periods, milestone_periods, schedule_ceiling, "running simulation");
            let report = simulate::run(&config, &script)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
