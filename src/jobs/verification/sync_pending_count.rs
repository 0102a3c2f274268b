use std::sync::Arc;

use tracing::error;

use crate::init::state::ServerState;

/// Minutely resync of the admin badge counter against the database.
/// Handlers adjust the counter inline; this covers drift from crashed
/// requests or out-of-band row changes.
pub async fn sync_pending_count(state: Arc<ServerState>) {
    if let Err(e) = state.sync_pending_verifications().await {
        error!(error = ?e, "Failed to sync pending verification counter");
    }
}
