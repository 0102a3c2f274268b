use std::sync::Arc;

use tracing::info;

use crate::{
    init::state::ServerState,
    jobs::{
        auth::invalidate_sessions::invalidate_sessions,
        identity::reconcile_users::reconcile_users,
        job_funcs::{
            every_day::schedule_task_every_day_at, every_hour::schedule_task_every_hour_at,
            every_minute::schedule_task_every_minute_at,
        },
        verification::sync_pending_count::sync_pending_count,
    },
};

pub async fn task_init(state: Arc<ServerState>) -> anyhow::Result<()> {
    info!("Task scheduler running...");

    let coroutine_state = Arc::clone(&state);
    tokio::spawn(async move {
        schedule_task_every_hour_at(
            coroutine_state,
            move |coroutine_state: Arc<ServerState>| async move {
                invalidate_sessions(coroutine_state).await
            },
            String::from("INVALIDATE_EXPIRED_SESSIONS"),
            30, // minutes
            00, // seconds
        )
        .await
    });

    let coroutine_state = Arc::clone(&state);
    tokio::spawn(async move {
        schedule_task_every_minute_at(
            coroutine_state,
            move |coroutine_state: Arc<ServerState>| async move {
                sync_pending_count(coroutine_state).await
            },
            String::from("SYNC_PENDING_VERIFICATIONS"),
            20, // seconds
        )
        .await
    });

    let coroutine_state = Arc::clone(&state);
    tokio::spawn(async move {
        schedule_task_every_day_at(
            coroutine_state,
            move |coroutine_state: Arc<ServerState>| async move {
                reconcile_users(coroutine_state).await
            },
            String::from("RECONCILE_IDENTITY_USERS"),
            4,  // hours
            15, // minutes
        )
        .await
    });

    Ok(())
}
