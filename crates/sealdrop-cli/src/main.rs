//! Sealdrop - encrypted remote attachments from the command line

use clap::{Parser, Subcommand};
use sealdrop_cli::{commands, CliConfig};
use sealdrop_client::AttachmentClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sealdrop")]
#[command(about = "Encrypt files onto public IPFS storage and share them by descriptor")]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true, env = "SEALDROP_DEBUG")]
    debug: bool,

    /// HTTP timeout in seconds for uploads and downloads
    #[arg(long, global = true, env = "SEALDROP_HTTP_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Accept plain http:// descriptor URLs (for local gateways only!)
    #[arg(long, global = true, env = "SEALDROP_ALLOW_INSECURE_HTTP")]
    allow_insecure_http: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt and upload a file, printing its descriptor
    Upload {
        /// File to send
        file: PathBuf,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,

        /// Write the descriptor here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Fetch, verify and decrypt the file a descriptor points at
    Download {
        /// Descriptor JSON file
        descriptor: PathBuf,

        /// Directory to save into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Skip the SHA-256 check of the fetched ciphertext
        #[arg(long)]
        skip_digest_check: bool,
    },

    /// Print the non-secret fields of a descriptor
    Inspect {
        /// Descriptor JSON file
        descriptor: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "sealdrop={0},sealdrop_cli={0},sealdrop_client={0},sealdrop_storage={0}",
                log_level
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = CliConfig {
        timeout_secs: args.timeout_secs,
        allow_insecure_http: args.allow_insecure_http,
    };

    match args.command {
        Command::Upload { file, mime, out } => {
            let client = AttachmentClient::new(cli.client_config())?;
            let descriptor = commands::upload(&client, &file, mime.as_deref(), out.as_deref()).await?;
            if out.is_none() {
                println!("{}", descriptor.to_json()?);
            }
        }
        Command::Download {
            descriptor,
            out,
            skip_digest_check,
        } => {
            let policy = commands::verification_policy(skip_digest_check);
            let client = AttachmentClient::new(cli.client_config())?
                .allow_insecure_http(cli.allow_insecure_http);
            let written = commands::download(&client, &descriptor, &out, policy).await?;
            println!("{}", written.display());
        }
        Command::Inspect { descriptor } => {
            println!("{}", commands::inspect(&descriptor).await?);
        }
    }

    Ok(())
}
