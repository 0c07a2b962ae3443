//! Subcommand implementations

use anyhow::{Context, Result};
use sealdrop_client::{AttachmentClient, RemoteAttachment, VerificationPolicy};
use std::path::{Path, PathBuf};
use tracing::info;

/// Encrypt and upload a file; the descriptor is written to `out` when given
pub async fn upload(
    client: &AttachmentClient,
    path: &Path,
    mime_type: Option<&str>,
    out: Option<&Path>,
) -> Result<RemoteAttachment> {
    let descriptor = client
        .upload_file(path, mime_type)
        .await
        .with_context(|| format!("failed to upload {}", path.display()))?;

    if let Some(out) = out {
        tokio::fs::write(out, descriptor.to_json()?)
            .await
            .with_context(|| format!("failed to write descriptor to {}", out.display()))?;
        info!(path = %out.display(), "descriptor written");
    }

    Ok(descriptor)
}

/// Map the `--skip-digest-check` flag onto a policy; the client logs the skip
pub fn verification_policy(skip_digest_check: bool) -> VerificationPolicy {
    if skip_digest_check {
        VerificationPolicy::SkipDigestCheck
    } else {
        VerificationPolicy::Verify
    }
}

/// Fetch, verify and decrypt the attachment a descriptor file points at
pub async fn download(
    client: &AttachmentClient,
    descriptor_path: &Path,
    out_dir: &Path,
    policy: VerificationPolicy,
) -> Result<PathBuf> {
    let descriptor = read_descriptor(descriptor_path).await?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let written = client
        .load_to_dir(&descriptor, policy, out_dir)
        .await
        .with_context(|| format!("failed to download {}", descriptor.url))?;

    info!(path = %written.display(), "attachment saved");
    Ok(written)
}

/// Render the non-secret fields of a descriptor file as JSON
pub async fn inspect(descriptor_path: &Path) -> Result<String> {
    let descriptor = read_descriptor(descriptor_path).await?;
    Ok(serde_json::to_string_pretty(&descriptor.summary())?)
}

/// Read and parse a descriptor file
pub async fn read_descriptor(path: &Path) -> Result<RemoteAttachment> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    RemoteAttachment::from_json(&json)
        .with_context(|| format!("{} is not a valid descriptor", path.display()))
}
