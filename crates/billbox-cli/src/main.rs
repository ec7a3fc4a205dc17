//! billbox: encrypted bill scanning CLI
//!
//! Usage:
//!   billbox [--config billbox.toml] scan <file> [--bill-type mobile]
//!   billbox ingest <file>
//!   billbox analyze <id> [--bill-type mobile] [--provider NAME]
//!   billbox purge <id>
//!   billbox sweep
//!   billbox config show
//!
//! The master secret comes from BILLBOX_SECRET, or the configured secret
//! file, or an ephemeral per-process secret (containers then do not survive
//! a restart).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use billbox_analysis::PatternAnalyzer;
use billbox_core::{BillboxConfig, DocumentId};
use billbox_pipeline::{DocumentPipeline, Utf8Extractor};

#[derive(Parser, Debug)]
#[command(name = "billbox", version, about = "Encrypted bill scanning pipeline")]
struct Cli {
    /// Path to billbox.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "BILLBOX_CONFIG",
        default_value = "/etc/billbox/config.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BILLBOX_LOG", default_value = "info")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "BILLBOX_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full cycle: ingest, analyze, purge the container, print the report
    Scan {
        /// Document file (text bill/statement)
        file: PathBuf,
        /// Bill category (mobile, internet, utility, credit_card, cable_tv,
        /// insurance); detected from the text when omitted
        #[arg(long)]
        bill_type: Option<String>,
        /// Service provider override (otherwise detected from the text)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Encrypt and persist a document, printing its ID
    Ingest {
        /// Document file to ingest
        file: PathBuf,
    },

    /// Analyze a previously ingested document (container stays persisted)
    Analyze {
        /// Document ID from `billbox ingest`
        id: String,
        /// Bill category; detected from the text when omitted
        #[arg(long)]
        bill_type: Option<String>,
        #[arg(long)]
        provider: Option<String>,
    },

    /// Delete a persisted container
    Purge {
        /// Document ID to purge
        id: String,
    },

    /// Remove containers older than the configured retention window
    Sweep,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, &cli.log_format);

    let config = load_config(&cli.config).await?;

    match cli.command {
        Commands::Scan {
            file,
            bill_type,
            provider,
        } => {
            let pipeline = build_pipeline(&config, bill_type.as_deref(), provider).await?;
            let cancel = cancel_on_ctrl_c();

            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let id = pipeline.ingest(&bytes).await?;
            let report = pipeline.scan(id, &cancel).await?;
            pipeline.purge(id).await?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Ingest { file } => {
            let pipeline = build_pipeline(&config, None, None).await?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let id = pipeline.ingest(&bytes).await?;
            println!("{id}");
        }
        Commands::Analyze {
            id,
            bill_type,
            provider,
        } => {
            let pipeline = build_pipeline(&config, bill_type.as_deref(), provider).await?;
            let cancel = cancel_on_ctrl_c();
            let id = DocumentId::from_str(&id).context("invalid document ID")?;
            let report = pipeline.scan(id, &cancel).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Purge { id } => {
            let pipeline = build_pipeline(&config, None, None).await?;
            let id = DocumentId::from_str(&id).context("invalid document ID")?;
            pipeline.purge(id).await?;
            info!(id = %id, "container purged");
        }
        Commands::Sweep => {
            let pipeline = build_pipeline(&config, None, None).await?;
            let removed = pipeline.sweep_expired().await?;
            info!(removed, "retention sweep complete");
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => println!("{}", toml::to_string_pretty(&config)?),
        },
    }

    Ok(())
}

async fn build_pipeline(
    config: &BillboxConfig,
    bill_type: Option<&str>,
    provider: Option<String>,
) -> Result<DocumentPipeline> {
    let secret = billbox_crypto::secret::provision(config.crypto.secret_file.as_deref())?;
    let analyzer = Arc::new(PatternAnalyzer::new(bill_type, provider));
    let pipeline =
        DocumentPipeline::new(config, secret, Arc::new(Utf8Extractor), analyzer).await?;
    Ok(pipeline)
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let child = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            child.cancel();
        }
    });
    cancel
}

async fn load_config(path: &PathBuf) -> Result<BillboxConfig> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", path.display()))
    } else {
        tracing::warn!(
            "config file not found: {}  (using defaults)",
            path.display()
        );
        Ok(BillboxConfig::default())
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}
