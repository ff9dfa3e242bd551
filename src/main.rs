use anyhow::Result;
use clap::{Parser, Subcommand};
use pdf_digest::{Config, DigestClient, DigestError, FailureResponse};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Summarize PDFs and compare documents with an LLM.
#[derive(Parser, Debug)]
#[command(name = "pdf-digest", version, long_version = LONG_VERSION, about)]
struct Cli {
    /// Path to a config.toml file (defaults to the platform config directory).
    #[arg(long, env = "PDF_DIGEST_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Model identifier, overriding the configured one.
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF and summarize it.
    Summarize {
        /// PDF file to summarize.
        pdf: PathBuf,
    },
    /// Compare two texts given on the command line.
    Compare { text1: String, text2: String },
    /// Compare the contents of two text files.
    CompareFiles { file1: PathBuf, file2: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the JSON result, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<DigestError>() {
                Some(digest_err) if digest_err.is_user_error() => {
                    tracing::warn!("{}", digest_err.to_user_string())
                }
                _ => tracing::error!("{:#}", err),
            }

            let failure = FailureResponse::new(err.to_string(), format!("{:?}", err));
            match to_json(&failure) {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("Failed to serialize error response: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    let client = DigestClient::new(config)?;

    match cli.command {
        Command::Summarize { pdf } => to_json(&client.summarize_pdf(&pdf).await?),
        Command::Compare { text1, text2 } => to_json(&client.compare_texts(&text1, &text2).await?),
        Command::CompareFiles { file1, file2 } => {
            to_json(&client.compare_files(&file1, &file2).await?)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, DigestError> {
    let Some(path) = path else {
        return Config::new();
    };

    let mut config = Config::from_file(path)?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
