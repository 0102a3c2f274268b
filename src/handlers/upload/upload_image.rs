use std::sync::Arc;

use axum::{
    Extension,
    extract::{Multipart, Query, State},
    response::IntoResponse,
};
use serde_derive::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    dto::responses::{response_data::http_resp, upload::upload_response::UploadResponse},
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::ServerState,
    util::{
        image::process_uploaded_images::{
            IMAGE_ENCODING_EXTENSION, IMAGE_ENCODING_MIME, WallImageType, format_size,
            process_uploaded_image,
        },
        storage::blob_storage::upload_public_object,
        time::now::tokio_now,
    },
};

const MAX_UPLOAD_SIZE: usize = 1024 * 1024 * 20; // 20MB

const ALLOWED_MIME_TYPES: [&str; 6] = [
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/avif",
    "image/heic",
];

#[derive(Deserialize)]
pub struct UploadImageQuery {
    /// "post" (default) or "proof".
    pub kind: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(content_type = "multipart/form-data"),
    params(("kind" = Option<String>, Query, description = "post (default) or proof")),
    responses(
        (status = 200, description = "Image stored, public URL returned", body = UploadResponse),
        (status = 400, description = "Invalid upload payload", body = CodeErrorResp),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 422, description = "Image could not be processed", body = CodeErrorResp),
        (status = 502, description = "Blob storage unavailable", body = CodeErrorResp)
    )
)]
pub async fn upload_image(
    Extension(user_id): Extension<Uuid>,
    State(state): State<Arc<ServerState>>,
    Query(query): Query<UploadImageQuery>,
    mut multipart: Multipart,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let image_type = match query.kind.as_deref() {
        Some("proof") => WallImageType::ProofDocument,
        Some("post") | None => WallImageType::PostImage,
        Some(other) => {
            return Err(code_err(
                CodeError::FILE_UPLOAD_ERROR,
                format!("Unknown upload kind '{other}'"),
            ));
        }
    };

    let mut uploaded_file: Vec<u8> = Vec::new();
    let mut mime: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!(error = ?e, user_id = %user_id, "Failed to fetch next multipart field");
        code_err(CodeError::FILE_UPLOAD_ERROR, e)
    })? {
        let name = field.name().map(str::to_owned);

        match name.as_deref() {
            Some("file") | None => {
                if uploaded_file.is_empty() {
                    // The browser's MIME claim wins; fall back to a guess
                    // from the filename when it sends none.
                    mime = field.content_type().map(|mime| mime.to_string()).or_else(|| {
                        field
                            .file_name()
                            .map(|name| mime_guess::from_path(name).first_or_octet_stream())
                            .map(|mime| mime.essence_str().to_string())
                    });

                    if !mime
                        .as_ref()
                        .map(|m| ALLOWED_MIME_TYPES.contains(&m.as_str()))
                        .unwrap_or(false)
                    {
                        error!(
                            user_id = %user_id,
                            mime = ?mime,
                            "Unsupported image type; rejecting upload"
                        );
                        return Err(code_err(
                            CodeError::FILE_UPLOAD_ERROR,
                            "Unsupported image type!",
                        ));
                    }
                }

                let bytes = field.bytes().await.map_err(|e| {
                    error!(error = ?e, user_id = %user_id, "Failed reading multipart field bytes");
                    code_err(CodeError::FILE_UPLOAD_ERROR, e)
                })?;
                uploaded_file.extend_from_slice(&bytes);

                if uploaded_file.len() > MAX_UPLOAD_SIZE {
                    error!(
                        user_id = %user_id,
                        size_bytes = uploaded_file.len(),
                        "Upload exceeds the size cap"
                    );
                    return Err(code_err(CodeError::FILE_UPLOAD_ERROR, "File too large!"));
                }
            }
            Some(other) => {
                error!(user_id = %user_id, field = other, "Unexpected multipart field");
            }
        }
    }

    if uploaded_file.is_empty() {
        return Err(code_err(CodeError::FILE_UPLOAD_ERROR, "File is empty!"));
    }

    info!(
        user_id = %user_id,
        kind = image_type.as_str(),
        original_size_bytes = uploaded_file.len(),
        original_size_human = %format_size(uploaded_file.len()),
        "Received uploaded image bytes"
    );

    let key_prefix = image_type.key_prefix();

    let processed_image = process_uploaded_image(uploaded_file, image_type)
        .await
        .map_err(|e| {
            error!(error = ?e, user_id = %user_id, "Failed to process uploaded image");
            code_err(CodeError::COULD_NOT_PROCESS_IMAGE, e)
        })?;

    let object_key = format!("{key_prefix}/{}.{IMAGE_ENCODING_EXTENSION}", Uuid::new_v4());

    let object_url = upload_public_object(&state, &object_key, IMAGE_ENCODING_MIME, processed_image)
        .await
        .map_err(|e| {
            error!(
                error = ?e,
                user_id = %user_id,
                key = %object_key,
                "Failed to store processed image"
            );
            code_err(CodeError::BLOB_STORAGE_ERROR, e)
        })?;

    Ok(http_resp(UploadResponse { url: object_url }, (), start))
}
