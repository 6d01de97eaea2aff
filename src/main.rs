use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tf_codedeploy::aws::client::DeployClient;
use tf_codedeploy::config::ProviderConfig;
use tf_codedeploy::resource::{deployment_config, deployment_config_schema, ResourceData};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage CodeDeploy deployment configs from a JSON state file
#[derive(Parser, Debug)]
#[command(name = "tf-codedeploy", version, about, long_about = None)]
struct Args {
    /// AWS region to use
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Shared credentials/config profile
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// CodeDeploy endpoint override
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resource schema as JSON
    Schema,
    /// Create a deployment config from a JSON attribute file
    Create {
        /// Attribute file, e.g. {"deployment_config_name": "...", ...}
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Refresh the state file from AWS
    Read {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Delete the deployment config tracked by the state file
    Delete {
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Adopt an existing deployment config by name
    Import {
        id: String,
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Save region/profile/endpoint/timeout flags as defaults
    Configure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tf-codedeploy started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tf-codedeploy").join("tf-codedeploy.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tf-codedeploy").join("tf-codedeploy.log");
    }
    PathBuf::from("tf-codedeploy.log")
}

fn load_state(path: &Path) -> Result<ResourceData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse state file {:?}", path))
}

fn save_state(path: &Path, data: &ResourceData) -> Result<()> {
    let content = serde_json::to_string_pretty(data)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write state file {:?}", path))
}

fn remove_state(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove state file {:?}", path))?;
    }
    Ok(())
}

fn print_state(data: &ResourceData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let overrides = ProviderConfig {
        region: args.region.clone(),
        profile: args.profile.clone(),
        endpoint: args.endpoint.clone(),
        timeout_secs: args.timeout,
    };
    let config = ProviderConfig::load().merge(&overrides);

    match args.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&deployment_config_schema())?);
        }
        Command::Configure => {
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Create { config: file, state } => {
            if load_state(&state).is_ok_and(|d| !d.is_gone()) {
                anyhow::bail!("State file {:?} already tracks a deployment config", state);
            }

            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let attributes: Map<String, Value> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {:?}", file))?;

            let client = DeployClient::new(&config.client_settings()).await?;
            let mut data = ResourceData::from_config(attributes);
            let result = deployment_config::create(&client, &mut data).await;

            // The remote object exists once an id is assigned; keep tracking it
            if !data.is_gone() {
                save_state(&state, &data)?;
            }
            result?;
            print_state(&data)?;
        }
        Command::Read { state } => {
            let mut data = load_state(&state)?;
            let client = DeployClient::new(&config.client_settings()).await?;
            deployment_config::read(&client, &mut data).await?;

            if data.is_gone() {
                eprintln!("Deployment config no longer exists; removing {:?}", state);
                remove_state(&state)?;
            } else {
                save_state(&state, &data)?;
                print_state(&data)?;
            }
        }
        Command::Delete { state } => {
            let data = load_state(&state)?;
            let client = DeployClient::new(&config.client_settings()).await?;
            deployment_config::delete(&client, &data).await?;
            remove_state(&state)?;
        }
        Command::Import { id, state } => {
            let client = DeployClient::new(&config.client_settings()).await?;
            let mut data = deployment_config::import(&id);
            deployment_config::read(&client, &mut data).await?;

            if data.is_gone() {
                anyhow::bail!("Cannot import non-existent remote object ({})", id);
            }
            save_state(&state, &data)?;
            print_state(&data)?;
        }
    }

    Ok(())
}
