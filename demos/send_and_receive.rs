//! Send a file through real storage providers and read it back
//!
//! Needs PINATA_API_KEY/PINATA_API_SECRET or WEB3_STORAGE_TOKEN in the
//! environment (or a `.env` file).
//!
//! Run with: cargo run --example send_and_receive -- path/to/file

use sealdrop_client::{AttachmentClient, Config, VerificationPolicy};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("usage: send_and_receive <file>"))?;

    println!("🚀 Sealdrop - Send and Receive\n");

    let client = AttachmentClient::new(Config::from_env())?;

    println!("📤 Uploading {}...", path.display());
    let descriptor = client.upload_file(&path, None).await?;
    println!("   ✅ Stored at {}", descriptor.url);
    println!("\n📋 Descriptor (contains the decryption secret!):");
    println!("{}", descriptor.to_json()?);

    println!("\n📥 Fetching it back...");
    let attachment = client.load(&descriptor, VerificationPolicy::Verify).await?;
    println!(
        "   ✅ {} ({}, {} bytes)",
        attachment.filename,
        attachment.mime_type,
        attachment.data.len()
    );

    Ok(())
}
