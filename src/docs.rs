//! OpenAPI documentation registration for Swagger UI.
//!
//! Important: Utoipa only exposes operations you list in `#[openapi(paths(...))]`.
//! Handler functions still need their own `#[utoipa::path(...)]` attributes.

use utoipa::OpenApi;

// ---- handlers (for `paths(...)`) ----
use crate::handlers::{
    admin::approve_verification,
    moderation::report_content,
    posts::{create_post, get_feed, read_post},
    server::healthcheck,
    social::submit_comment,
    upload::upload_image,
    verification::{auto_verify, submit_request},
};

// ---- schemas (for `components(schemas(...))`) ----
use crate::domain::{
    auth::role::RoleType,
    moderation::report::{Report, ReportStatus},
    user::User,
    verification::manual_verification::{ManualVerification, VerificationStatus},
    wall::{
        comment::{Comment, CommentWithAuthor},
        post::{Post, PostAuthor, PostImage, PostWithDetails},
    },
};
use crate::dto::{
    requests::{
        moderation::report_request::ReportRequest,
        posts::create_post_request::CreatePostRequest,
        social::submit_comment_request::SubmitCommentRequest,
        verification::{
            auto_verify_request::AutoVerifyRequest, verification_request::VerificationRequest,
        },
    },
    responses::{
        posts::{create_post_response::CreatePostResponse, feed_response::GetFeedResponse},
        upload::upload_response::UploadResponse,
    },
};
use crate::errors::code_error::CodeErrorResp;
use crate::handlers::server::healthcheck::ServerHealthcheckResponse;

/// Central OpenAPI document for Swagger UI. Covers the main content
/// endpoints; the admin and session plumbing is intentionally not
/// annotated.
#[derive(OpenApi)]
#[openapi(
    paths(
        // --- server ---
        healthcheck::healthcheck,

        // --- posts ---
        get_feed::get_feed,
        read_post::read_post,
        create_post::create_post,

        // --- social ---
        submit_comment::submit_comment,

        // --- moderation ---
        report_content::report_content,

        // --- verification ---
        submit_request::submit_verification_request,
        auto_verify::auto_verify,

        // --- admin ---
        approve_verification::approve_verification,

        // --- upload ---
        upload_image::upload_image,
    ),
    components(
        schemas(
            // shared error response
            CodeErrorResp,

            // --- server ---
            ServerHealthcheckResponse,

            // --- posts ---
            CreatePostRequest,
            CreatePostResponse,
            GetFeedResponse,
            Post,
            PostImage,
            PostAuthor,
            PostWithDetails,

            // --- social ---
            SubmitCommentRequest,
            Comment,
            CommentWithAuthor,

            // --- moderation ---
            ReportRequest,
            Report,
            ReportStatus,

            // --- verification ---
            VerificationRequest,
            AutoVerifyRequest,
            ManualVerification,
            VerificationStatus,

            // --- upload ---
            UploadResponse,

            // --- domain models used in responses ---
            User,
            RoleType,
        )
    ),
    tags(
        (name = "server", description = "Server status endpoints"),
        (name = "posts", description = "Wall feed and post endpoints"),
        (name = "social", description = "Like and comment endpoints"),
        (name = "moderation", description = "Report endpoints"),
        (name = "verification", description = "Identity verification endpoints"),
        (name = "admin", description = "Admin review endpoints"),
        (name = "upload", description = "Image upload endpoints")
    )
)]
pub struct ApiDoc;
