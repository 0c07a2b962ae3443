//! Offline round trip through the in-memory backend
//!
//! This example demonstrates:
//! - Encrypting and "uploading" random bytes
//! - The descriptor that would travel to the recipient
//! - Loading with and without the digest check
//! - What tampering looks like
//!
//! Run with: cargo run --example offline_roundtrip

use bytes::Bytes;
use rand::RngCore;
use sealdrop_client::{AttachmentClient, BackendChain, MemoryBackend, VerificationPolicy};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("🔐 Sealdrop - Offline Round Trip\n");

    let memory = Arc::new(MemoryBackend::new());
    let client = AttachmentClient::with_parts(
        BackendChain::new().with_shared_backend(memory.clone()),
        memory.clone(),
    );

    let mut data = vec![0u8; 64 * 1024];
    rand::thread_rng().fill_bytes(&mut data);

    // ==================== Produce ====================

    println!("📤 Uploading 64 KiB of random bytes as 'random.bin'...");
    let descriptor = client
        .upload(&data, "random.bin", "application/octet-stream")
        .await?;
    println!("   ✅ Stored at {}", descriptor.url);
    println!("\n📋 Public summary:");
    println!("{}", serde_json::to_string_pretty(&descriptor.summary())?);

    // ==================== Consume ====================

    println!("\n📥 Loading with digest verification...");
    let attachment = client.load(&descriptor, VerificationPolicy::Verify).await?;
    assert_eq!(attachment.data, data);
    println!("   ✅ {} bytes match", attachment.data.len());

    // ==================== Tampering ====================

    println!("\n🧪 Flipping one bit of the stored ciphertext...");
    if let Some(stored) = memory.get(&descriptor.url) {
        let mut corrupted = stored.to_vec();
        corrupted[0] ^= 0x01;
        memory.overwrite(&descriptor.url, Bytes::from(corrupted));
    }

    match client.load(&descriptor, VerificationPolicy::Verify).await {
        Ok(_) => println!("   ❌ Tampering went unnoticed"),
        Err(e) => println!("   ✅ Verify: {}", e),
    }
    match client.load(&descriptor, VerificationPolicy::SkipDigestCheck).await {
        Ok(_) => println!("   ❌ Tampering went unnoticed"),
        Err(e) => println!("   ✅ SkipDigestCheck: {}", e),
    }

    Ok(())
}
