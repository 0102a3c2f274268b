use anyhow::Context;
use tracing::info;

use crate::init::state::ServerState;
use crate::util::image::process_uploaded_images::format_size;

/// Uploads a processed object to the public blob bucket and returns its
/// public URL. Keys are prefixed per upload kind (`wall/`, `proof/`).
pub async fn upload_public_object(
    state: &ServerState,
    key: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> anyhow::Result<String> {
    let bucket = state.get_blob_bucket();
    let size_bytes = bytes.len();

    let s3_client = aws_sdk_s3::Client::new(state.get_blob_config());

    s3_client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .body(aws_sdk_s3::primitives::ByteStream::from(bytes))
        .send()
        .await
        .with_context(|| format!("Failed to upload object to bucket {bucket} at {key}"))?;

    let region = state
        .get_blob_config()
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "us-west-1".to_string());

    let object_url = format!("https://{bucket}.s3.{region}.amazonaws.com/{key}");

    info!(
        bucket = bucket,
        key = key,
        size_bytes,
        size_human = %format_size(size_bytes),
        "Uploaded object to blob storage"
    );

    Ok(object_url)
}
