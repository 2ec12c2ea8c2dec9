use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spool_core::impls::TracingLogger;
use spool_core::{Runner, SpoolConfig, WorkQueue};

/// Drain file-backed work queues through external commands.
#[derive(Debug, Parser)]
#[command(name = "spool", version)]
struct Cli {
    /// Path to the TOML config.
    #[arg(long, short, env = "SPOOL_CONFIG", default_value = "spool.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drain every configured queue once, in order.
    Run,

    /// Append payloads to the back of a queue.
    Enqueue {
        queue: String,
        #[arg(required = true)]
        payloads: Vec<String>,
    },

    /// Print the contents of every queue.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spool_cli=info,spool_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = SpoolConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let runner = Runner::from_config(&config, Arc::new(TracingLogger::new())).await?;

    match cli.command {
        Command::Run => {
            let reports = runner.run().await?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Enqueue { queue, payloads } => {
            let Some(target) = runner.queue(&queue) else {
                bail!(
                    "unknown queue {queue} (configured: {})",
                    runner.queue_names().join(", ")
                );
            };
            let count = payloads.len();
            target.enqueue_multiple(payloads).await?;
            tracing::info!(queue = %queue, count, "enqueued");
        }
        Command::Status => {
            let mut queues = Vec::new();
            for name in runner.queue_names() {
                if let Some(queue) = runner.queue(name) {
                    queues.push(json!({
                        "queue": name,
                        "items": queue.items().await?,
                    }));
                }
            }
            println!("{}", serde_json::to_string_pretty(&queues)?);
        }
    }

    Ok(())
}
