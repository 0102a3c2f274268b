use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::{error, info};

use crate::domain::user::{UserInsertable, UserProfileChangeset};
use crate::init::state::ServerState;
use crate::schema::users;

const RECONCILE_LIST_LIMIT: usize = 500;

/// Daily provider-to-local reconciliation. Webhooks are the normal sync
/// path; this picks up anything a dropped delivery left behind: missing
/// rows and stale profile fields. Local deletions are left to the
/// user.deleted webhook.
pub async fn reconcile_users(state: Arc<ServerState>) {
    let identity_users = match state.identity().list_users(RECONCILE_LIST_LIMIT).await {
        Ok(identity_users) => identity_users,
        Err(e) => {
            error!(error = ?e, "Reconciliation could not list identity provider users");
            return;
        }
    };

    let mut conn = match state.get_conn().await {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = ?e, "Reconciliation could not get a pool connection");
            return;
        }
    };

    let known_identity_ids: HashSet<String> = match users::table
        .select(users::user_identity_id)
        .load::<String>(&mut conn)
        .await
    {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            error!(error = ?e, "Reconciliation could not load local identity ids");
            return;
        }
    };

    let (mut inserted, mut refreshed, mut skipped) = (0usize, 0usize, 0usize);

    for identity_user in identity_users {
        let Some(email) = identity_user.primary_email() else {
            // A provider account without an email cannot hold a local row.
            skipped += 1;
            continue;
        };

        if known_identity_ids.contains(&identity_user.id) {
            let user_name = identity_user.display_name();
            let result =
                diesel::update(users::table.filter(users::user_identity_id.eq(&identity_user.id)))
                    .set(UserProfileChangeset {
                        user_name: &user_name,
                        user_avatar_url: identity_user.image_url.as_deref(),
                        user_updated_at: Utc::now(),
                    })
                    .execute(&mut conn)
                    .await;

            match result {
                Ok(_) => refreshed += 1,
                Err(e) => {
                    error!(
                        error = ?e,
                        identity_user_id = %identity_user.id,
                        "Reconciliation failed to refresh a local user"
                    );
                }
            }
            continue;
        }

        let user_name = identity_user.display_name();
        let result = diesel::insert_into(users::table)
            .values(UserInsertable::new(
                &identity_user.id,
                &user_name,
                email,
                identity_user.image_url.as_deref(),
            ))
            .on_conflict(users::user_identity_id)
            .do_nothing()
            .execute(&mut conn)
            .await;

        match result {
            Ok(_) => {
                inserted += 1;
                info!(
                    identity_user_id = %identity_user.id,
                    "Reconciliation recovered a user the webhooks missed"
                );
            }
            Err(e) => {
                error!(
                    error = ?e,
                    identity_user_id = %identity_user.id,
                    "Reconciliation failed to insert a local user"
                );
            }
        }
    }

    drop(conn);

    info!(
        inserted,
        refreshed, skipped, "Identity user reconciliation finished."
    );
}
