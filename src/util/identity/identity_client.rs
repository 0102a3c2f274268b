use anyhow::{Context, anyhow};
use serde_derive::{Deserialize, Serialize};

use crate::init::config::IdentityConfig;

/// Thin client for the identity provider's management API. The provider
/// owns credentials and session mechanics; this side only verifies
/// session tokens, reads user profiles, and patches public metadata
/// (`role`, `verified`).
pub struct IdentityClient {
    http: reqwest::Client,
    api_base_url: String,
    api_secret_key: String,
}

#[derive(Deserialize)]
pub struct IdentitySessionInfo {
    pub user_id: String,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct IdentityEmail {
    pub email_address: String,
}

#[derive(Default, Deserialize, Serialize, Clone)]
pub struct PublicMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<IdentityEmail>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub public_metadata: PublicMetadata,
}

impl IdentityUser {
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|e| e.email_address.as_str())
    }

    /// "First Last" from the profile; falls back to the email local-part
    /// when the profile carries no name at all.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if !name.is_empty() {
            return name;
        }

        self.primary_email()
            .and_then(|email| email.split('@').next())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Merge-patch for public metadata; `None` fields are left untouched by
/// the provider, so role updates cannot clobber the verified flag and
/// vice versa.
#[derive(Serialize, Default)]
pub struct MetadataPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

#[derive(Serialize)]
struct VerifySessionBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct MetadataBody {
    public_metadata: MetadataPatch,
}

#[derive(Deserialize)]
struct UserListPage {
    data: Vec<IdentityUser>,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: &IdentityConfig) -> Self {
        IdentityClient {
            http,
            api_base_url: config.get_api_base_url(),
            api_secret_key: config.get_api_secret_key(),
        }
    }

    pub async fn verify_session_token(&self, token: &str) -> anyhow::Result<IdentitySessionInfo> {
        let response = self
            .http
            .post(format!("{}/v1/sessions/verify", self.api_base_url))
            .bearer_auth(&self.api_secret_key)
            .json(&VerifySessionBody { token })
            .send()
            .await
            .context("Identity provider session verification request failed")?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::NOT_FOUND
        {
            return Err(anyhow!("Session token rejected by identity provider"));
        }

        Ok(response
            .error_for_status()
            .context("Identity provider session verification returned an error")?
            .json::<IdentitySessionInfo>()
            .await
            .context("Identity provider session payload did not match schema")?)
    }

    pub async fn get_user(&self, identity_user_id: &str) -> anyhow::Result<IdentityUser> {
        Ok(self
            .http
            .get(format!("{}/v1/users/{}", self.api_base_url, identity_user_id))
            .bearer_auth(&self.api_secret_key)
            .send()
            .await
            .context("Identity provider user fetch failed")?
            .error_for_status()
            .context("Identity provider user fetch returned an error")?
            .json::<IdentityUser>()
            .await
            .context("Identity provider user payload did not match schema")?)
    }

    pub async fn list_users(&self, limit: usize) -> anyhow::Result<Vec<IdentityUser>> {
        let page = self
            .http
            .get(format!("{}/v1/users", self.api_base_url))
            .query(&[("limit", limit)])
            .bearer_auth(&self.api_secret_key)
            .send()
            .await
            .context("Identity provider user listing failed")?
            .error_for_status()
            .context("Identity provider user listing returned an error")?
            .json::<UserListPage>()
            .await
            .context("Identity provider user list did not match schema")?;

        Ok(page.data)
    }

    pub async fn update_public_metadata(
        &self,
        identity_user_id: &str,
        patch: MetadataPatch,
    ) -> anyhow::Result<()> {
        self.http
            .patch(format!(
                "{}/v1/users/{}/metadata",
                self.api_base_url, identity_user_id
            ))
            .bearer_auth(&self.api_secret_key)
            .json(&MetadataBody {
                public_metadata: patch,
            })
            .send()
            .await
            .context("Identity provider metadata update failed")?
            .error_for_status()
            .context("Identity provider metadata update returned an error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(first: Option<&str>, last: Option<&str>, email: &str) -> IdentityUser {
        IdentityUser {
            id: "idn_1".to_string(),
            email_addresses: vec![IdentityEmail {
                email_address: email.to_string(),
            }],
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            image_url: None,
            public_metadata: PublicMetadata::default(),
        }
    }

    #[test]
    fn display_name_prefers_the_profile_name() {
        let user = user_with(Some("Li"), Some("Hua"), "li.hua@hsefz.cn");
        assert_eq!(user.display_name(), "Li Hua");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        let user = user_with(None, None, "li.hua@hsefz.cn");
        assert_eq!(user.display_name(), "li.hua");
    }

    #[test]
    fn metadata_patch_omits_untouched_fields() {
        let patch = MetadataPatch {
            role: Some("admin".to_string()),
            verified: None,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"role":"admin"}"#);
    }
}
