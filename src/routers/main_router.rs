use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{
        admin::{
            approve_verification::approve_verification, list_users::list_users,
            list_verifications::list_verifications, pending_count::pending_count,
            reject_verification::reject_verification, set_user_verified::set_user_verified,
            update_user_role::update_user_role,
        },
        auth::{logout::logout, me::me_handler, session::create_session},
        moderation::{
            get_reports::get_reports, report_content::report_content,
            resolve_report::resolve_report,
        },
        posts::{
            create_post::create_post, delete_post::delete_post, get_feed::get_feed,
            read_post::read_post, update_post::update_post,
        },
        server::{fallback::fallback_handler, healthcheck::healthcheck},
        social::{
            delete_comment::delete_comment, get_comments::get_comments,
            submit_comment::submit_comment, toggle_like::toggle_like,
        },
        upload::upload_image::upload_image,
        verification::{
            auto_verify::auto_verify, my_status::my_verification_status,
            submit_request::submit_verification_request,
        },
        webhooks::identity::identity_webhook,
    },
    init::state::ServerState,
};

use super::middleware::{
    auth::auth_middleware, is_admin::is_admin_middleware, is_logged_in::is_logged_in_middleware,
    is_superadmin::is_superadmin_middleware, logging::log_middleware,
};

// Uploads re-encode to AVIF server-side, so the cap only has to fit one
// phone photo plus multipart overhead.
const MAX_REQUEST_SIZE: usize = 1024 * 1024 * 25; // 25MB

pub fn build_router(state: Arc<ServerState>) -> axum::Router {
    let auth_middleware = from_fn_with_state(state.clone(), auth_middleware);
    let log_middleware = from_fn_with_state(state.clone(), log_middleware);
    let is_logged_in_middleware = from_fn_with_state(state.clone(), is_logged_in_middleware);
    let compression_middleware = CompressionLayer::new().gzip(true);
    let cors_layer = CorsLayer::very_permissive();

    // No session required: health probe, session exchange, provider
    // webhooks (signature-verified instead of cookie-gated).
    let public_router = Router::new()
        .route("/api/healthcheck/server", get(healthcheck))
        .route("/api/auth/session", post(create_session))
        .route("/api/webhooks/identity", post(identity_webhook));

    // Everything on the wall requires a live session; the verified-flag
    // gate for writes lives in the handlers.
    let protected_router = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me_handler))
        .route("/api/posts", get(get_feed).post(create_post))
        .route(
            "/api/posts/{post_id}",
            get(read_post).patch(update_post).delete(delete_post),
        )
        .route("/api/posts/{post_id}/like", post(toggle_like))
        .route(
            "/api/posts/{post_id}/comments",
            get(get_comments).post(submit_comment),
        )
        .route("/api/comments/{comment_id}", delete(delete_comment))
        .route("/api/reports", post(report_content))
        .route(
            "/api/verification/requests",
            post(submit_verification_request),
        )
        .route("/api/verification/auto", post(auto_verify))
        .route("/api/verification/status", get(my_verification_status))
        .route("/api/upload", post(upload_image))
        .layer(auth_middleware.clone());

    let admin_router = Router::new()
        .route("/api/admin/reports", get(get_reports))
        .route("/api/admin/reports/{report_id}/resolve", post(resolve_report))
        .route("/api/admin/verifications", get(list_verifications))
        .route(
            "/api/admin/verifications/pending-count",
            get(pending_count),
        )
        .route(
            "/api/admin/verifications/{manual_verification_id}/approve",
            post(approve_verification),
        )
        .route(
            "/api/admin/verifications/{manual_verification_id}/reject",
            post(reject_verification),
        )
        .layer(from_fn(is_admin_middleware))
        .layer(auth_middleware.clone());

    // User management mirrors the original's stricter gate.
    let superadmin_router = Router::new()
        .route("/api/admin/users", get(list_users))
        .route(
            "/api/admin/users/{identity_user_id}/role",
            post(update_user_role),
        )
        .route(
            "/api/admin/users/{identity_user_id}/verified",
            post(set_user_verified),
        )
        .layer(from_fn(is_superadmin_middleware))
        .layer(auth_middleware);

    let api_router = public_router
        .merge(protected_router)
        .merge(admin_router)
        .merge(superadmin_router)
        .layer(is_logged_in_middleware)
        .layer(compression_middleware)
        .layer(log_middleware)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
        .layer(cors_layer)
        .with_state(state.clone());

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(fallback_handler)
}
