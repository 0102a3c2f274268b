use std::sync::atomic::{AtomicI64, AtomicU64};

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::Pool;
use lettre::{AsyncSmtpTransport, Tokio1Executor};

use crate::init::config::{IdentityConfig, RosterConfig};
use crate::util::identity::identity_client::IdentityClient;
use crate::util::identity::webhook_signature::WebhookVerifier;
use crate::util::roster::roster_client::RosterClient;

use super::deployment_environment::DeploymentEnvironment;
use super::server_state::ServerState;

#[derive(Default)]
pub struct ServerStateBuilder {
    app_name_version: Option<String>,
    server_start_time: Option<tokio::time::Instant>,
    pool: Option<Pool<AsyncPgConnection>>,
    email_client: Option<AsyncSmtpTransport<Tokio1Executor>>,
    email_from_address: Option<String>,
}

impl ServerStateBuilder {
    pub fn app_name_version(mut self, app_name_version: String) -> Self {
        self.app_name_version = Some(app_name_version);
        self
    }

    pub fn server_start_time(mut self, server_start_time: tokio::time::Instant) -> Self {
        self.server_start_time = Some(server_start_time);
        self
    }

    pub fn pool(mut self, pool: Pool<AsyncPgConnection>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn email_client(mut self, email_client: AsyncSmtpTransport<Tokio1Executor>) -> Self {
        self.email_client = Some(email_client);
        self
    }

    pub fn email_from_address(mut self, email_from_address: String) -> Self {
        self.email_from_address = Some(email_from_address);
        self
    }

    pub async fn build(self) -> anyhow::Result<ServerState> {
        let blob_config = {
            use aws_config::BehaviorVersion;
            use aws_config::meta::region::RegionProviderChain;

            let aws_key = std::env::var("AWS_BLOB_UPLOAD_KEY")
                .map_err(|_| anyhow::anyhow!("AWS_BLOB_UPLOAD_KEY not set"))?;
            let aws_secret = std::env::var("AWS_BLOB_UPLOAD_SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("AWS_BLOB_UPLOAD_SECRET_KEY not set"))?;
            let credentials = aws_sdk_s3::config::Credentials::new(
                aws_key,
                aws_secret,
                None,                 // token
                None,                 // expiration
                "campus-wall-images", // provider name
            );
            let region_provider = RegionProviderChain::default_provider().or_else("us-west-1");
            aws_config::defaults(BehaviorVersion::latest())
                .region(region_provider)
                .credentials_provider(credentials)
                .load()
                .await
        };

        let blob_bucket = std::env::var("BLOB_BUCKET_NAME")
            .map_err(|_| anyhow::anyhow!("BLOB_BUCKET_NAME not set"))?;

        let campus_email_domain = std::env::var("CAMPUS_EMAIL_DOMAIN")
            .map_err(|_| anyhow::anyhow!("CAMPUS_EMAIL_DOMAIN not set"))?
            .trim_start_matches('@')
            .to_string();

        let identity_config = IdentityConfig::from_env()?;
        let roster_config = RosterConfig::from_env()?;

        let request_client = reqwest::Client::builder()
            .user_agent("campus-wall-backend")
            .build()?;

        Ok(ServerState {
            app_name_version: self
                .app_name_version
                .ok_or_else(|| anyhow::anyhow!("app_name_version is required"))?,
            server_start_time: self
                .server_start_time
                .ok_or_else(|| anyhow::anyhow!("server_start_time is required"))?,
            pool: self
                .pool
                .ok_or_else(|| anyhow::anyhow!("pool is required"))?,
            responses_handled: AtomicU64::new(0u64),
            email_client: self
                .email_client
                .ok_or_else(|| anyhow::anyhow!("email_client is required"))?,
            email_from_address: self
                .email_from_address
                .ok_or_else(|| anyhow::anyhow!("email_from_address is required"))?,
            session_map: scc::HashMap::new(),
            pending_verifications: AtomicI64::new(0),
            identity_client: IdentityClient::new(request_client.clone(), &identity_config),
            roster_client: RosterClient::new(request_client, &roster_config),
            webhook_verifier: WebhookVerifier::new(&identity_config.get_webhook_secret())?,
            blob_config,
            blob_bucket,
            campus_email_domain,
            deployment_environment: match std::env::var("CURR_ENV").as_deref() {
                Ok(s) => match s.to_ascii_lowercase().as_str() {
                    "local" | "localhost" => DeploymentEnvironment::Local,
                    "dev" | "develop" | "development" => DeploymentEnvironment::Dev,
                    "staging" | "stage" | "stg" => DeploymentEnvironment::Staging,
                    "prd" | "prod" | "production" => DeploymentEnvironment::Prod,
                    _ => DeploymentEnvironment::Local,
                },
                Err(_) => DeploymentEnvironment::Prod,
            },
        })
    }
}
