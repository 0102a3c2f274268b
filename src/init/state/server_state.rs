use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use diesel::ExpressionMethods;
use diesel::QueryDsl;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use tracing::info;
use uuid::Uuid;

use crate::domain::auth::role::RoleType;
use crate::domain::user::User;
use crate::domain::verification::manual_verification::VerificationStatus;
use crate::schema::manual_verifications;
use crate::util::identity::identity_client::IdentityClient;
use crate::util::identity::webhook_signature::WebhookVerifier;
use crate::util::roster::roster_client::RosterClient;
use crate::util::time::now::tokio_now;

use super::builder::ServerStateBuilder;
use super::deployment_environment::DeploymentEnvironment;
use super::session::{DEFAULT_SESSION_DURATION, Session};

pub struct ServerState {
    pub(crate) app_name_version: String,
    pub(crate) server_start_time: tokio::time::Instant,
    pub(crate) pool: Pool<AsyncPgConnection>,
    pub(crate) responses_handled: AtomicU64,
    pub(crate) email_client: AsyncSmtpTransport<Tokio1Executor>,
    pub(crate) email_from_address: String,
    pub(crate) session_map: scc::HashMap<Uuid, Session>, // read/write
    pub(crate) pending_verifications: AtomicI64,         // admin badge counter
    pub(crate) identity_client: IdentityClient,
    pub(crate) roster_client: RosterClient,
    pub(crate) webhook_verifier: WebhookVerifier,
    pub(crate) blob_config: aws_config::SdkConfig,
    pub(crate) blob_bucket: String,
    pub(crate) campus_email_domain: String,
    pub(crate) deployment_environment: DeploymentEnvironment,
}

impl ServerState {
    pub fn builder() -> ServerStateBuilder {
        ServerStateBuilder::default()
    }

    pub fn get_app_name_version(&self) -> String {
        self.app_name_version.clone()
    }

    pub fn get_uptime(&self) -> tokio::time::Duration {
        self.server_start_time.elapsed()
    }

    pub async fn get_conn(&self) -> anyhow::Result<PooledConnection<'_, AsyncPgConnection>> {
        Ok(self.pool.get().await?)
    }

    pub fn get_email_client(&self) -> &AsyncSmtpTransport<Tokio1Executor> {
        &self.email_client
    }

    pub fn get_email_from_address(&self) -> &str {
        &self.email_from_address
    }

    pub fn identity(&self) -> &IdentityClient {
        &self.identity_client
    }

    pub fn roster(&self) -> &RosterClient {
        &self.roster_client
    }

    pub fn webhook_verifier(&self) -> &WebhookVerifier {
        &self.webhook_verifier
    }

    pub fn get_blob_config(&self) -> &aws_config::SdkConfig {
        &self.blob_config
    }

    pub fn get_blob_bucket(&self) -> &str {
        &self.blob_bucket
    }

    pub fn get_campus_email_domain(&self) -> &str {
        &self.campus_email_domain
    }

    pub fn get_deployment_environment(&self) -> DeploymentEnvironment {
        self.deployment_environment
    }

    pub fn add_responses_handled(&self) {
        self.responses_handled.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_responses_handled(&self) -> u64 {
        self.responses_handled.load(Ordering::SeqCst)
    }

    // ---- sessions ----

    pub async fn new_session(
        &self,
        user: &User,
        role: RoleType,
        is_verified: bool,
        valid_for: Option<chrono::Duration>,
    ) -> anyhow::Result<Uuid> {
        let session_id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let expires_at = now + valid_for.unwrap_or(DEFAULT_SESSION_DURATION);

        match self
            .session_map
            .insert_async(
                session_id,
                Session {
                    session_id,
                    user_id: user.user_id,
                    identity_user_id: user.user_identity_id.clone(),
                    user_name: user.user_name.clone(),
                    user_email: user.user_email.clone(),
                    role,
                    is_verified,
                    created_at: now,
                    expires_at,
                },
            )
            .await
        {
            Ok(_) => Ok(session_id),
            Err(_) => Err(anyhow::anyhow!(
                "Failed to insert session into scc::HashMap; key already exists!"
            )),
        }
    }

    pub async fn get_session(&self, session_id: &Uuid) -> anyhow::Result<Session> {
        match self
            .session_map
            .read_async(session_id, |_, v| v.clone())
            .await
        {
            Some(session) => Ok(session),
            None => Err(anyhow::anyhow!("Session not found")),
        }
    }

    pub fn get_session_length(&self) -> usize {
        self.session_map.len()
    }

    pub async fn remove_session(&self, session_id: Uuid) -> anyhow::Result<(Uuid, usize)> {
        let cur_session_count = self.session_map.len();
        match self.session_map.remove_async(&session_id).await {
            Some((session_id, _)) => Ok((session_id, cur_session_count - 1)),
            None => Err(anyhow::anyhow!("Session map out of sync!")),
        }
    }

    pub async fn purge_expired_sessions(&self) -> (usize, usize) {
        let now = chrono::Utc::now();
        let (mut pruned, mut remaining): (usize, usize) = (0, 0);

        self.session_map
            .iter_mut_async(|entry| {
                if entry.expires_at < now {
                    pruned += 1;
                    let _ = entry.consume();
                } else {
                    remaining += 1;
                }
                true
            })
            .await;

        (pruned, remaining)
    }

    /// Rewrites the claims of every live session belonging to a user.
    /// Called after role or verified-flag changes so gates take effect
    /// without waiting for re-login.
    pub async fn refresh_sessions_for_user(
        &self,
        user_id: Uuid,
        role: Option<RoleType>,
        is_verified: Option<bool>,
    ) -> usize {
        let mut refreshed = 0usize;

        self.session_map
            .iter_mut_async(|mut entry| {
                if entry.user_id == user_id {
                    if let Some(role) = role {
                        entry.role = role;
                    }
                    if let Some(is_verified) = is_verified {
                        entry.is_verified = is_verified;
                    }
                    refreshed += 1;
                }
                true
            })
            .await;

        refreshed
    }

    /// Drops every live session of a user; used when the identity
    /// provider reports the account deleted.
    pub async fn remove_sessions_for_user(&self, user_id: Uuid) -> usize {
        let mut removed = 0usize;

        self.session_map
            .iter_mut_async(|entry| {
                if entry.user_id == user_id {
                    removed += 1;
                    let _ = entry.consume();
                }
                true
            })
            .await;

        removed
    }

    // ---- pending-verification badge counter ----

    pub fn get_pending_verifications(&self) -> i64 {
        self.pending_verifications.load(Ordering::SeqCst)
    }

    pub fn add_pending_verifications(&self, delta: i64) {
        self.pending_verifications.fetch_add(delta, Ordering::SeqCst);
    }

    /// Recounts pending requests from the database and resets the badge
    /// counter. Inline adjustments keep it fresh between syncs.
    pub async fn sync_pending_verifications(&self) -> anyhow::Result<i64> {
        let start = tokio_now();
        let mut conn = self.get_conn().await?;

        let pending: i64 = manual_verifications::table
            .filter(
                manual_verifications::manual_verification_status
                    .eq(VerificationStatus::Pending.as_str()),
            )
            .count()
            .get_result(&mut conn)
            .await?;

        drop(conn);

        self.pending_verifications.store(pending, Ordering::SeqCst);

        info!(
            elapsed = ?start.elapsed(),
            pending_verifications = %pending,
            "Synchronized pending verification counter."
        );

        Ok(pending)
    }
}
