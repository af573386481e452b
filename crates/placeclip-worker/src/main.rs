//! Place extraction worker binary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use placeclip_extract::fallback_takeaways;
use placeclip_worker::{reconcile_response, ExtractionJob, FusedInput, WorkerConfig};

#[derive(Parser, Debug)]
#[command(name = "placeclip-worker")]
#[command(about = "Extract places from short-form video text")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full extraction job (generator, enrichment, summary)
    Extract {
        /// Speech transcript file
        #[arg(long)]
        speech: Option<PathBuf>,
        /// On-screen text file
        #[arg(long)]
        ocr: Option<PathBuf>,
        /// Caption file
        #[arg(long)]
        caption: Option<PathBuf>,
        /// Already fused text file
        #[arg(long)]
        text: Option<PathBuf>,
        /// Where to write the served JSON
        #[arg(long)]
        out: PathBuf,
        /// Where to write the full reconciled result
        #[arg(long)]
        rich_out: Option<PathBuf>,
    },
    /// Reconcile a saved generator response offline
    Reconcile {
        #[arg(long)]
        response: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        rich_out: Option<PathBuf>,
    },
    /// Print fallback keywords for a text file
    Keywords {
        #[arg(long)]
        input: PathBuf,
        #[arg(short, long, default_value_t = placeclip_extract::DEFAULT_KEYWORD_COUNT)]
        k: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Already installed is fine.
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    init_tracing()?;

    let args = Args::parse();
    let config = WorkerConfig::from_env();

    match args.command {
        Command::Extract {
            speech,
            ocr,
            caption,
            text,
            out,
            rich_out,
        } => {
            let input = FusedInput {
                speech: read_optional(speech.as_deref())?,
                ocr: read_optional(ocr.as_deref())?,
                caption: read_optional(caption.as_deref())?,
                extra: read_optional(text.as_deref())?,
            };
            if input.is_empty() {
                bail!("no input text: pass at least one of --speech, --ocr, --caption, --text");
            }

            info!("Worker config: {:?}", config);
            let job = ExtractionJob::from_config(config)?;
            let output = job.run(&input).await;
            output.write_to(&out, rich_out.as_deref())?;
        }
        Command::Reconcile {
            response,
            out,
            rich_out,
        } => {
            let text = read_file(&response)?;
            let output = reconcile_response(&text, &config);
            output.write_to(&out, rich_out.as_deref())?;
        }
        Command::Keywords { input, k } => {
            let text = read_file(&input)?;
            for keyword in fallback_takeaways(&text, k) {
                println!("{}", keyword);
            }
        }
    }

    Ok(())
}

/// Colored output for dev, JSON when `LOG_FORMAT=json`.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("placeclip_worker=info".parse()?)
        .add_directive("placeclip_extract=info".parse()?);

    // Logs go to stderr; stdout carries command output.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_optional(path: Option<&Path>) -> anyhow::Result<String> {
    path.map(read_file).transpose().map(Option::unwrap_or_default)
}
