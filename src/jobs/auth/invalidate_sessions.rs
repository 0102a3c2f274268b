use std::sync::Arc;

use tracing::info;

use crate::init::state::ServerState;

/// Hourly sweep of the in-memory session map. Sessions also fail the
/// expiry check at auth time; this just keeps the map from growing.
pub async fn invalidate_sessions(state: Arc<ServerState>) {
    let (pruned, remaining) = state.purge_expired_sessions().await;

    info!(
        pruned_sessions = pruned,
        remaining_sessions = remaining,
        "Purged expired sessions."
    );
}
