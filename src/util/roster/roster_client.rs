use anyhow::Context;
use serde_derive::{Deserialize, Serialize};

use crate::init::config::RosterConfig;

/// Client for the external campus-roster matching service used by the
/// automatic verification flow: one outbound call asking whether a real
/// name belongs to a campus email address.
pub struct RosterClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    real_name: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
pub struct MatchResponse {
    pub matched: bool,
}

impl RosterClient {
    pub fn new(http: reqwest::Client, config: &RosterConfig) -> Self {
        RosterClient {
            http,
            api_url: config.get_api_url(),
            api_key: config.get_api_key(),
        }
    }

    pub async fn matches(&self, real_name: &str, email: &str) -> anyhow::Result<bool> {
        let response = self
            .http
            .post(format!("{}/match", self.api_url))
            .header("x-api-key", &self.api_key)
            .json(&MatchRequest { real_name, email })
            .send()
            .await
            .context("Roster match request failed")?
            .error_for_status()
            .context("Roster match returned an error")?
            .json::<MatchResponse>()
            .await
            .context("Roster match payload did not match schema")?;

        Ok(response.matched)
    }
}
