use mimalloc::MiMalloc;
use tracing::info;

use init::server_init::server_init_proc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// modules tree
pub mod build_info;
pub mod docs;
pub mod schema;

pub mod domain {
    pub mod user;
    pub mod auth {
        pub mod role;
    }
    pub mod moderation {
        pub mod report;
    }
    pub mod verification {
        pub mod manual_verification;
    }
    pub mod wall {
        pub mod comment;
        pub mod like;
        pub mod post;
    }
}
pub mod dto {
    pub mod requests {
        pub mod admin {
            pub mod set_verified_request;
            pub mod update_role_request;
        }
        pub mod auth {
            pub mod session_request;
        }
        pub mod moderation {
            pub mod report_request;
            pub mod resolve_report_request;
        }
        pub mod posts {
            pub mod create_post_request;
            pub mod get_feed_request;
            pub mod update_post_request;
        }
        pub mod social {
            pub mod submit_comment_request;
        }
        pub mod verification {
            pub mod auto_verify_request;
            pub mod verification_request;
        }
    }
    pub mod responses {
        pub mod response_data;
        pub mod response_meta;
        pub mod admin {
            pub mod pending_count_response;
            pub mod users_response;
        }
        pub mod auth {
            pub mod me_response;
        }
        pub mod moderation {
            pub mod reports_response;
        }
        pub mod posts {
            pub mod create_post_response;
            pub mod feed_response;
        }
        pub mod social {
            pub mod comments_response;
            pub mod toggle_like_response;
        }
        pub mod upload {
            pub mod upload_response;
        }
        pub mod verification {
            pub mod verification_status_response;
        }
    }
}
pub mod errors {
    pub mod code_error;
}
pub mod handlers {
    pub mod admin {
        pub mod approve_verification;
        pub mod list_users;
        pub mod list_verifications;
        pub mod pending_count;
        pub mod reject_verification;
        pub mod set_user_verified;
        pub mod update_user_role;
    }
    pub mod auth {
        pub mod logout;
        pub mod me;
        pub mod session;
    }
    pub mod moderation {
        pub mod get_reports;
        pub mod report_content;
        pub mod resolve_report;
    }
    pub mod posts {
        pub mod create_post;
        pub mod delete_post;
        pub mod get_feed;
        pub mod read_post;
        pub mod update_post;
    }
    pub mod server {
        pub mod fallback;
        pub mod healthcheck;
    }
    pub mod social {
        pub mod delete_comment;
        pub mod get_comments;
        pub mod submit_comment;
        pub mod toggle_like;
    }
    pub mod upload {
        pub mod upload_image;
    }
    pub mod verification {
        pub mod auto_verify;
        pub mod my_status;
        pub mod submit_request;
    }
    pub mod webhooks {
        pub mod identity;
    }
}
pub mod init {
    pub mod config;
    pub mod server_init;
    pub mod state;
}
pub mod jobs {
    pub mod auth {
        pub mod invalidate_sessions;
    }
    pub mod identity {
        pub mod reconcile_users;
    }
    pub mod job_funcs {
        pub mod every_day;
        pub mod every_hour;
        pub mod every_minute;
        pub mod init_scheduler;
    }
    pub mod verification {
        pub mod sync_pending_count;
    }
}
pub mod routers {
    pub mod main_router;
    pub mod middleware {
        pub mod auth;
        pub mod is_admin;
        pub mod is_logged_in;
        pub mod is_superadmin;
        pub mod logging;
    }
}
pub mod util {
    pub mod email {
        pub mod emails;
    }
    pub mod identity {
        pub mod identity_client;
        pub mod webhook_signature;
    }
    pub mod image {
        pub mod process_uploaded_images;
    }
    pub mod roster {
        pub mod roster_client;
    }
    pub mod storage {
        pub mod blob_storage;
    }
    pub mod string {
        pub mod validations;
    }
    pub mod time {
        pub mod duration_formatter;
        pub mod now;
    }
}

// main function
#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let start = tokio::time::Instant::now();
    tracing_subscriber::fmt().init();

    info!("Initializing server...");
    server_init_proc(start).await?;

    Ok(())
}
